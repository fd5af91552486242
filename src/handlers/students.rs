use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use model::entities::{department, student};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::auth::policy::{authorize, Action, Resource};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Request body for creating a new student
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateStudentRequest {
    /// Full name of the student
    pub full_name: String,
    /// Id of the department the student belongs to
    pub department: i32,
    /// Class the student is enrolled in
    pub class_name: String,
}

/// Student response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    pub id: i32,
    pub full_name: String,
    pub department: i32,
    pub class_name: String,
    pub submitted_by: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl From<student::Model> for StudentResponse {
    fn from(model: student::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            department: model.department_id,
            class_name: model.class_name,
            submitted_by: model.submitted_by,
            updated_at: model.updated_at,
        }
    }
}

/// List all students
#[utoipa::path(
    get,
    path = "/student/",
    tag = "students",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Students retrieved successfully", body = ApiResponse<Vec<StudentResponse>>),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn list_students(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<ApiResponse<Vec<StudentResponse>>>, ApiError> {
    authorize(Some(&caller), Resource::Student, Action::List)?;

    let students = student::Entity::find().all(&state.db).await?;
    debug!("Retrieved {} students from database", students.len());

    let data: Vec<StudentResponse> = students.into_iter().map(StudentResponse::from).collect();

    Ok(Json(ApiResponse {
        data,
        message: "Students retrieved successfully".to_string(),
        success: true,
    }))
}

/// Create a new student
#[utoipa::path(
    post,
    path = "/student/",
    tag = "students",
    security(("bearer_token" = [])),
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created successfully", body = ApiResponse<StudentResponse>),
        (status = 400, description = "Invalid request or unknown department", body = crate::schemas::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn create_student(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(request): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StudentResponse>>), ApiError> {
    authorize(Some(&caller), Resource::Student, Action::Create)?;

    if request.full_name.trim().is_empty() {
        return Err(ApiError::validation("full_name may not be blank."));
    }
    if request.class_name.trim().is_empty() {
        return Err(ApiError::validation("class_name may not be blank."));
    }

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

    let new_student = student::ActiveModel {
        full_name: Set(request.full_name),
        department_id: Set(request.department),
        class_name: Set(request.class_name),
        submitted_by: Set(Some(caller.id)),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };

    let student_model = new_student.insert(&state.db).await.map_err(|e| {
        ApiError::from_insert(
            e,
            "INVALID_DEPARTMENT_ID",
            format!("Department with id {} does not exist", request.department),
        )
    })?;

    info!("Student created successfully with ID: {}", student_model.id);
    let response = ApiResponse {
        data: StudentResponse::from(student_model),
        message: "Student Details created Successfully.".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}
