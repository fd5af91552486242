use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::auth::AuthConfig;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Token signing configuration
    pub auth: AuthConfig,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::register,
        crate::handlers::users::login,
        crate::handlers::users::refresh,
        crate::handlers::users::user_list,
        crate::handlers::departments::list_departments,
        crate::handlers::departments::create_department,
        crate::handlers::courses::list_courses,
        crate::handlers::courses::create_course,
        crate::handlers::students::list_students,
        crate::handlers::students::create_student,
        crate::handlers::attendance::list_attendance,
        crate::handlers::attendance::create_attendance,
    ),
    components(
        schemas(
            ApiResponse<crate::handlers::users::UserResponse>,
            ApiResponse<Vec<crate::handlers::users::UserResponse>>,
            ApiResponse<crate::handlers::departments::DepartmentResponse>,
            ApiResponse<Vec<crate::handlers::departments::DepartmentResponse>>,
            ApiResponse<crate::handlers::courses::CourseResponse>,
            ApiResponse<Vec<crate::handlers::courses::CourseResponse>>,
            ApiResponse<crate::handlers::students::StudentResponse>,
            ApiResponse<Vec<crate::handlers::students::StudentResponse>>,
            ApiResponse<crate::handlers::attendance::AttendanceResponse>,
            ApiResponse<Vec<crate::handlers::attendance::AttendanceResponse>>,
            ErrorResponse,
            HealthResponse,
            crate::handlers::users::RegisterRequest,
            crate::handlers::users::LoginRequest,
            crate::handlers::users::RefreshRequest,
            crate::handlers::users::TokenPairResponse,
            crate::handlers::users::AccessTokenResponse,
            crate::handlers::users::UserResponse,
            crate::handlers::users::UserTypeDto,
            crate::handlers::departments::CreateDepartmentRequest,
            crate::handlers::departments::DepartmentResponse,
            crate::handlers::courses::CreateCourseRequest,
            crate::handlers::courses::CourseResponse,
            crate::handlers::students::CreateStudentRequest,
            crate::handlers::students::StudentResponse,
            crate::handlers::attendance::CreateAttendanceRequest,
            crate::handlers::attendance::AttendanceResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Registration, login and token refresh"),
        (name = "departments", description = "Department records"),
        (name = "courses", description = "Course records"),
        (name = "students", description = "Student records"),
        (name = "attendance", description = "Attendance records"),
    ),
    info(
        title = "Rollcall API",
        description = "Attendance management backend - departments, courses, students and attendance marks behind token authentication",
        version = "0.1.0",
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the bearer token scheme referenced by the protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
