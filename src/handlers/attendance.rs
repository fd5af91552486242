use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use model::entities::{attendance, course, student};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::auth::policy::{authorize, Action, Resource};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Request body for registering an attendance mark
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateAttendanceRequest {
    /// Id of the student the mark is for
    pub student: i32,
    /// Id of the course the mark is for
    pub course: i32,
    /// Whether the student was present (defaults to false)
    #[serde(default)]
    pub present: bool,
}

/// Attendance response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttendanceResponse {
    pub id: i32,
    pub student: i32,
    pub course: i32,
    pub present: bool,
    pub submitted_by: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl From<attendance::Model> for AttendanceResponse {
    fn from(model: attendance::Model) -> Self {
        Self {
            id: model.id,
            student: model.student_id,
            course: model.course_id,
            present: model.present,
            submitted_by: model.submitted_by,
            updated_at: model.updated_at,
        }
    }
}

/// List all attendance records
#[utoipa::path(
    get,
    path = "/attendance/",
    tag = "attendance",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Attendance records retrieved successfully", body = ApiResponse<Vec<AttendanceResponse>>),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn list_attendance(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<ApiResponse<Vec<AttendanceResponse>>>, ApiError> {
    authorize(Some(&caller), Resource::Attendance, Action::List)?;

    let records = attendance::Entity::find().all(&state.db).await?;
    debug!("Retrieved {} attendance records from database", records.len());

    let data: Vec<AttendanceResponse> = records.into_iter().map(AttendanceResponse::from).collect();

    Ok(Json(ApiResponse {
        data,
        message: "Attendance records retrieved successfully".to_string(),
        success: true,
    }))
}

/// Register an attendance mark
#[utoipa::path(
    post,
    path = "/attendance/",
    tag = "attendance",
    security(("bearer_token" = [])),
    request_body = CreateAttendanceRequest,
    responses(
        (status = 201, description = "Attendance registered successfully", body = ApiResponse<AttendanceResponse>),
        (status = 400, description = "Invalid request or unknown student/course", body = crate::schemas::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn create_attendance(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(request): Json<CreateAttendanceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AttendanceResponse>>), ApiError> {
    authorize(Some(&caller), Resource::Attendance, Action::Create)?;

    let student_exists = student::Entity::find_by_id(request.student)
        .one(&state.db)
        .await?
        .is_some();
    if !student_exists {
        warn!("Student {} not found", request.student);
        return Err(ApiError::validation_with_code(
            "INVALID_STUDENT_ID",
            format!("Student with id {} does not exist", request.student),
        ));
    }

    let course_exists = course::Entity::find_by_id(request.course)
        .one(&state.db)
        .await?
        .is_some();
    if !course_exists {
        warn!("Course {} not found", request.course);
        return Err(ApiError::validation_with_code(
            "INVALID_COURSE_ID",
            format!("Course with id {} does not exist", request.course),
        ));
    }

    let new_attendance = attendance::ActiveModel {
        student_id: Set(request.student),
        course_id: Set(request.course),
        present: Set(request.present),
        submitted_by: Set(Some(caller.id)),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };

    let attendance_model = new_attendance.insert(&state.db).await.map_err(|e| {
        ApiError::from_insert(
            e,
            "INVALID_REFERENCE",
            "Referenced student or course does not exist".to_string(),
        )
    })?;

    info!(
        "Attendance registered successfully with ID: {}",
        attendance_model.id
    );
    let response = ApiResponse {
        data: AttendanceResponse::from(attendance_model),
        message: "Student Attendance has been registered.".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}
