use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use model::entities::department;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::auth::policy::{authorize, Action, Resource};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Request body for creating a new department
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateDepartmentRequest {
    /// Department name
    pub department_name: String,
}

/// Department response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DepartmentResponse {
    pub id: i32,
    pub department_name: String,
    pub submitted_by: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl From<department::Model> for DepartmentResponse {
    fn from(model: department::Model) -> Self {
        Self {
            id: model.id,
            department_name: model.department_name,
            submitted_by: model.submitted_by,
            updated_at: model.updated_at,
        }
    }
}

/// List all departments
#[utoipa::path(
    get,
    path = "/departments/",
    tag = "departments",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Departments retrieved successfully", body = ApiResponse<Vec<DepartmentResponse>>),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn list_departments(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<ApiResponse<Vec<DepartmentResponse>>>, ApiError> {
    authorize(Some(&caller), Resource::Department, Action::List)?;

    let departments = department::Entity::find().all(&state.db).await?;
    debug!("Retrieved {} departments from database", departments.len());

    let data: Vec<DepartmentResponse> = departments
        .into_iter()
        .map(DepartmentResponse::from)
        .collect();

    Ok(Json(ApiResponse {
        data,
        message: "Departments retrieved successfully".to_string(),
        success: true,
    }))
}

/// Create a new department
#[utoipa::path(
    post,
    path = "/departments/",
    tag = "departments",
    security(("bearer_token" = [])),
    request_body = CreateDepartmentRequest,
    responses(
        (status = 201, description = "Department created successfully", body = ApiResponse<DepartmentResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 403, description = "Caller is not staff", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn create_department(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(request): Json<CreateDepartmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DepartmentResponse>>), ApiError> {
    authorize(Some(&caller), Resource::Department, Action::Create)?;

    if request.department_name.trim().is_empty() {
        return Err(ApiError::validation("department_name may not be blank."));
    }

    // submitted_by and updated_at are always server-assigned.
    let new_department = department::ActiveModel {
        department_name: Set(request.department_name),
        submitted_by: Set(Some(caller.id)),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };

    let department_model = new_department.insert(&state.db).await?;
    info!(
        "Department created successfully with ID: {}",
        department_model.id
    );

    let response = ApiResponse {
        data: DepartmentResponse::from(department_model),
        message: "Department created successfully.".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}
