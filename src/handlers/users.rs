use axum::{extract::State, http::StatusCode, response::Json};
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::ValidateEmail;

use crate::auth::policy::{authorize, Action, Resource};
use crate::auth::{self, AuthUser, TokenKind};
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Wire-level user role; mirrors `model::entities::user::UserType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserTypeDto {
    Student,
    Teacher,
    Admin,
}

impl From<UserTypeDto> for user::UserType {
    fn from(value: UserTypeDto) -> Self {
        match value {
            UserTypeDto::Student => user::UserType::Student,
            UserTypeDto::Teacher => user::UserType::Teacher,
            UserTypeDto::Admin => user::UserType::Admin,
        }
    }
}

impl From<user::UserType> for UserTypeDto {
    fn from(value: user::UserType) -> Self {
        match value {
            user::UserType::Student => UserTypeDto::Student,
            user::UserType::Teacher => UserTypeDto::Teacher,
            user::UserType::Admin => UserTypeDto::Admin,
        }
    }
}

/// Request body for registering a new user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    /// Email address (must be unique)
    pub email: String,
    /// Plaintext password; only its hash is stored
    pub password: String,
    /// Full name, alphabetic characters and spaces only
    pub full_name: String,
    /// Role of the account
    #[serde(rename = "type")]
    pub user_type: UserTypeDto,
    /// Optional username (must be unique when supplied)
    pub username: Option<String>,
}

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for minting a new access token
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Token pair returned by a successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

/// Fresh access token returned by the refresh endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access: String,
}

/// User response model; never carries the password hash
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    #[serde(rename = "type")]
    pub user_type: UserTypeDto,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub submitted_by: Option<i32>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            full_name: model.full_name,
            user_type: model.user_type.into(),
            is_staff: model.is_staff,
            is_superuser: model.is_superuser,
            is_active: model.is_active,
            submitted_by: model.submitted_by,
        }
    }
}

fn validate_registration(request: &RegisterRequest) -> Result<(), ApiError> {
    if request.email.trim().is_empty() {
        return Err(ApiError::validation("Email id required!"));
    }
    if !request.email.validate_email() {
        return Err(ApiError::validation_with_code(
            "INVALID_EMAIL",
            "Enter a valid email address.",
        ));
    }
    if request.password.is_empty() {
        return Err(ApiError::validation("Password is required."));
    }
    if request.full_name.trim().is_empty() {
        return Err(ApiError::validation("Full name is required."));
    }
    if !request
        .full_name
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c == ' ')
    {
        return Err(ApiError::validation_with_code(
            "INVALID_FULL_NAME",
            "Only alphabetic characters are allowed.",
        ));
    }
    if let Some(username) = &request.username {
        if username.trim().is_empty() {
            return Err(ApiError::validation("Username cannot be blank."));
        }
    }
    Ok(())
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/user/register",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid or duplicate registration data", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip_all, fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    debug!("Registering user");
    validate_registration(&request)?;

    // Friendly duplicate checks up front; the unique constraints still win
    // any concurrent race (see from_insert below).
    let email_taken = user::Entity::find()
        .filter(user::Column::Email.eq(request.email.as_str()))
        .one(&state.db)
        .await?
        .is_some();
    if email_taken {
        warn!("Registration rejected: email already exists");
        return Err(ApiError::validation_with_code(
            "EMAIL_ALREADY_EXISTS",
            "user with this email already exists.",
        ));
    }

    if let Some(username) = &request.username {
        let username_taken = user::Entity::find()
            .filter(user::Column::Username.eq(username.as_str()))
            .one(&state.db)
            .await?
            .is_some();
        if username_taken {
            warn!("Registration rejected: username already exists");
            return Err(ApiError::validation_with_code(
                "USERNAME_ALREADY_EXISTS",
                "user with this username already exists.",
            ));
        }
    }

    let new_user = user::ActiveModel {
        email: Set(request.email.trim().to_string()),
        username: Set(request.username.clone()),
        full_name: Set(Some(request.full_name.trim().to_string())),
        user_type: Set(request.user_type.into()),
        password_hash: Set(auth::hash_password(&request.password)?),
        is_staff: Set(false),
        is_superuser: Set(false),
        is_active: Set(true),
        submitted_by: Set(None),
        ..Default::default()
    };

    let user_model = new_user.insert(&state.db).await.map_err(|e| {
        ApiError::from_insert(
            e,
            "USER_ALREADY_EXISTS",
            "user with this email or username already exists.",
        )
    })?;

    info!("User created successfully with ID: {}", user_model.id);
    let response = ApiResponse {
        data: UserResponse::from(user_model),
        message: "User Created Successfully.".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/user/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated; token pair issued", body = TokenPairResponse),
        (status = 400, description = "Invalid credentials", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let user = auth::authenticate(&state.db, &request.email, &request.password).await?;

    let tokens = auth::issue_tokens(&user, &state.auth)?;
    info!("User {} logged in", user.id);

    Ok(Json(TokenPairResponse {
        access: tokens.access,
        refresh: tokens.refresh,
    }))
}

/// Mint a new access token from a refresh token
#[utoipa::path(
    post,
    path = "/user/refresh",
    tag = "users",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token issued", body = AccessTokenResponse),
        (status = 401, description = "Invalid or expired refresh token", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let claims = auth::decode_token(&request.refresh, &state.auth, TokenKind::Refresh)?;

    let user = user::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .ok_or(ApiError::AuthRequired)?;
    if !user.is_active {
        return Err(ApiError::AuthRequired);
    }

    let access = auth::issue_access_token(&user, &state.auth)?;
    debug!("Access token refreshed for user {}", user.id);

    Ok(Json(AccessTokenResponse { access }))
}

/// List all users
#[utoipa::path(
    get,
    path = "/user/user_list",
    tag = "users",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 401, description = "Authentication required", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, caller))]
pub async fn user_list(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    authorize(Some(&caller), Resource::User, Action::List)?;

    let users = user::Entity::find().all(&state.db).await?;
    debug!("Retrieved {} users from database", users.len());

    let data: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(ApiResponse {
        data,
        message: "Users retrieved successfully".to_string(),
        success: true,
    }))
}
