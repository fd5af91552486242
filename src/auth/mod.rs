//! Credential and token service: argon2id password hashing, signed
//! access/refresh token issuance and validation, and first-run superuser
//! provisioning.

pub mod policy;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use model::entities::user;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::schemas::AppState;

const DEFAULT_ADMIN_EMAIL: &str = "admin@gmail.com";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "Abcd@1234";

/// Token signing configuration, shared through `AppState`.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
}

impl AuthConfig {
    /// Read the token configuration from the environment, falling back to
    /// development defaults.
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("ROLLCALL_JWT_SECRET").unwrap_or_else(|_| {
            warn!("ROLLCALL_JWT_SECRET not set, using development secret");
            "rollcall-development-secret".to_string()
        });
        let access_token_minutes = std::env::var("ROLLCALL_ACCESS_TOKEN_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(15);
        let refresh_token_days = std::env::var("ROLLCALL_REFRESH_TOKEN_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7);

        Self {
            jwt_secret,
            access_token_minutes,
            refresh_token_days,
        }
    }
}

/// Distinguishes the two token lifetimes. A refresh token is only accepted
/// by the refresh endpoint, never as request authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Signed claims carried by both token kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id.
    pub sub: i32,
    pub email: String,
    pub is_staff: bool,
    pub kind: TokenKind,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// The access/refresh pair returned by a successful login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Hash a password with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))
}

/// Verify a password against a stored argon2id PHC string.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

fn encode_token(user: &user::Model, kind: TokenKind, config: &AuthConfig) -> Result<String, ApiError> {
    let now = Utc::now();
    let lifetime = match kind {
        TokenKind::Access => chrono::Duration::minutes(config.access_token_minutes),
        TokenKind::Refresh => chrono::Duration::days(config.refresh_token_days),
    };

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        is_staff: user.is_staff,
        kind,
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token signing failed: {}", e)))
}

/// Issue a fresh access/refresh pair bound to the user identity.
pub fn issue_tokens(user: &user::Model, config: &AuthConfig) -> Result<TokenPair, ApiError> {
    Ok(TokenPair {
        access: encode_token(user, TokenKind::Access, config)?,
        refresh: encode_token(user, TokenKind::Refresh, config)?,
    })
}

/// Mint a new access token for the holder of a valid refresh token.
pub fn issue_access_token(user: &user::Model, config: &AuthConfig) -> Result<String, ApiError> {
    encode_token(user, TokenKind::Access, config)
}

/// Validate signature and expiry, and check the token is of the expected
/// kind. Any failure collapses into `AuthRequired` - callers never learn why
/// a token was rejected.
pub fn decode_token(
    token: &str,
    config: &AuthConfig,
    expected: TokenKind,
) -> Result<Claims, ApiError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::AuthRequired)?;

    if data.claims.kind != expected {
        return Err(ApiError::AuthRequired);
    }

    Ok(data.claims)
}

/// Look up the user by email and verify the password.
///
/// Unknown email, wrong password and deactivated accounts all fail with the
/// same generic error so the endpoint cannot be used as an existence oracle.
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<user::Model, ApiError> {
    let user = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?;

    match user {
        Some(user) if user.is_active && verify_password(password, &user.password_hash) => Ok(user),
        _ => Err(ApiError::InvalidCredentials),
    }
}

/// The authenticated caller, extracted from `Authorization: Bearer <access>`.
///
/// Loads the full user row so handlers can stamp `submitted_by` and the
/// policy guard can read the staff flag.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ApiError::AuthRequired)?;

        let claims = decode_token(token, &state.auth, TokenKind::Access)?;

        let user = user::Entity::find_by_id(claims.sub)
            .one(&state.db)
            .await?
            .ok_or(ApiError::AuthRequired)?;

        if !user.is_active {
            return Err(ApiError::AuthRequired);
        }

        Ok(AuthUser(user))
    }
}

/// Optional overrides for the superuser flags. A superuser cannot be
/// provisioned with any of these explicitly false.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuperuserOverrides {
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
}

/// Create a superuser account with forced staff/superuser/active flags.
pub async fn create_superuser(
    db: &DatabaseConnection,
    email: &str,
    username: &str,
    password: &str,
    overrides: SuperuserOverrides,
) -> Result<user::Model, ApiError> {
    if overrides.is_staff == Some(false) {
        return Err(ApiError::validation("Superuser must have is_staff=true."));
    }
    if overrides.is_superuser == Some(false) {
        return Err(ApiError::validation(
            "Superuser must have is_superuser=true.",
        ));
    }
    if overrides.is_active == Some(false) {
        return Err(ApiError::validation("Superuser must have is_active=true."));
    }

    let record = user::ActiveModel {
        email: Set(email.to_string()),
        username: Set(Some(username.to_string())),
        full_name: Set(None),
        user_type: Set(user::UserType::Admin),
        password_hash: Set(hash_password(password)?),
        is_staff: Set(true),
        is_superuser: Set(true),
        is_active: Set(true),
        submitted_by: Set(None),
        ..Default::default()
    };

    Ok(record.insert(db).await?)
}

/// First-run provisioning settings, read from the environment so an
/// operator can supply real credentials instead of the documented defaults.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl BootstrapConfig {
    pub fn from_env() -> Self {
        Self {
            email: std::env::var("ROLLCALL_ADMIN_EMAIL")
                .unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string()),
            username: std::env::var("ROLLCALL_ADMIN_USERNAME")
                .unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.to_string()),
            password: std::env::var("ROLLCALL_ADMIN_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string()),
        }
    }

    fn uses_default_password(&self) -> bool {
        self.password == DEFAULT_ADMIN_PASSWORD
    }
}

/// Create the first superuser when the user table is empty.
///
/// Idempotent: once any user exists this is a no-op, so a restart never
/// provisions a second account. Returns the created user, if any.
pub async fn bootstrap_superuser(
    db: &DatabaseConnection,
    config: &BootstrapConfig,
) -> Result<Option<user::Model>, ApiError> {
    let existing = user::Entity::find().count(db).await?;
    if existing > 0 {
        return Ok(None);
    }

    info!("Creating first user...");
    if config.uses_default_password() {
        warn!("Bootstrap superuser uses the default password; set ROLLCALL_ADMIN_PASSWORD");
    }

    let user = create_superuser(
        db,
        &config.email,
        &config.username,
        &config.password,
        SuperuserOverrides::default(),
    )
    .await?;

    info!(
        "Created user: {} with password: {}",
        config.username, config.password
    );

    Ok(Some(user))
}
