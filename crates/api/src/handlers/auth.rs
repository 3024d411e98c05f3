//! Handlers for the `/auth` resource (register, login, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bakehouse_core::error::CoreError;
use bakehouse_core::roles::ROLE_BAKER;
use bakehouse_db::models::user::{CreateUser, UserResponse};
use bakehouse_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Request a baker account. The account cannot log in until an admin
/// approves it.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email.trim().to_lowercase(),
            password_hash: hashed,
            role: ROLE_BAKER.to_string(),
            is_approved: false,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Account registered, awaiting approval");

    Ok((StatusCode::CREATED, Json(DataResponse { data: user.into() })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password and receive an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    if !user.is_approved {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is pending approval".into(),
        )));
    }

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: user.into(),
    }))
}

/// GET /api/v1/auth/me
pub async fn me(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    Ok(Json(DataResponse { data: user.into() }))
}
