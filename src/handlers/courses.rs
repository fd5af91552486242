use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use model::entities::{course, department};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::auth::policy::{authorize, Action, Resource};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Request body for creating a new course
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCourseRequest {
    /// Course name
    pub course_name: String,
    /// Id of the owning department
    pub department: i32,
    /// Semester in which the course runs
    pub semester: i32,
    /// Class the course is taught to
    pub class_name: String,
    /// Lecture hours per week
    pub lecture_hours: i32,
}

/// Course response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseResponse {
    pub id: i32,
    pub course_name: String,
    pub department: i32,
    pub semester: i32,
    pub class_name: String,
    pub lecture_hours: i32,
    pub submitted_by: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl From<course::Model> for CourseResponse {
    fn from(model: course::Model) -> Self {
        Self {
            id: model.id,
            course_name: model.course_name,
            department: model.department_id,
            semester: model.semester,
            class_name: model.class_name,
            lecture_hours: model.lecture_hours,
            submitted_by: model.submitted_by,
            updated_at: model.updated_at,
        }
    }
}

/// List all courses
#[utoipa::path(
    get,
    path = "/course/",
    tag = "courses",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Courses retrieved successfully", body = ApiResponse<Vec<CourseResponse>>),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn list_courses(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<ApiResponse<Vec<CourseResponse>>>, ApiError> {
    authorize(Some(&caller), Resource::Course, Action::List)?;

    let courses = course::Entity::find().all(&state.db).await?;
    debug!("Retrieved {} courses from database", courses.len());

    let data: Vec<CourseResponse> = courses.into_iter().map(CourseResponse::from).collect();

    Ok(Json(ApiResponse {
        data,
        message: "Courses retrieved successfully".to_string(),
        success: true,
    }))
}

/// Create a new course
#[utoipa::path(
    post,
    path = "/course/",
    tag = "courses",
    security(("bearer_token" = [])),
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created successfully", body = ApiResponse<CourseResponse>),
        (status = 400, description = "Invalid request or unknown department", body = crate::schemas::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 403, description = "Caller is not staff", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn create_course(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(request): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CourseResponse>>), ApiError> {
    authorize(Some(&caller), Resource::Course, Action::Create)?;

    if request.course_name.trim().is_empty() {
        return Err(ApiError::validation("course_name may not be blank."));
    }
    if request.class_name.trim().is_empty() {
        return Err(ApiError::validation("class_name may not be blank."));
    }

    // A course cannot exist without its department.
    let department_exists = department::Entity::find_by_id(request.department)
        .one(&state.db)
        .await?
        .is_some();
    if !department_exists {
        warn!("Department {} not found", request.department);
        return Err(ApiError::validation_with_code(
            "INVALID_DEPARTMENT_ID",
            format!("Department with id {} does not exist", request.department),
        ));
    }

    let new_course = course::ActiveModel {
        course_name: Set(request.course_name),
        department_id: Set(request.department),
        semester: Set(request.semester),
        class_name: Set(request.class_name),
        lecture_hours: Set(request.lecture_hours),
        submitted_by: Set(Some(caller.id)),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };

    // The existence check above can race with a department delete; the
    // foreign key still holds and surfaces as a validation error.
    let course_model = new_course.insert(&state.db).await.map_err(|e| {
        ApiError::from_insert(
            e,
            "INVALID_DEPARTMENT_ID",
            format!("Department with id {} does not exist", request.department),
        )
    })?;

    info!("Course created successfully with ID: {}", course_model.id);
    let response = ApiResponse {
        data: CourseResponse::from(course_model),
        message: "Course Created Successfully.".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}
