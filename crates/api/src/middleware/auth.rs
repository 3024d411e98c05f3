//! Bearer-token authentication for Axum handlers.
//!
//! A token alone is not enough: the account it names must still exist and be
//! approved, so deleting a user revokes their access before the token expires.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use bakehouse_core::error::CoreError;
use bakehouse_core::roles::Role;
use bakehouse_core::types::DbId;
use bakehouse_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let value = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| unauthorized("Malformed Authorization header"))?;
    value
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| unauthorized("Expected 'Authorization: Bearer <token>'"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;
        let role: Role = claims
            .role
            .parse()
            .map_err(|_| unauthorized("Token carries an unknown role"))?;

        match UserRepo::find_by_id(&state.pool, claims.sub).await? {
            Some(user) if user.is_approved => Ok(AuthUser {
                user_id: user.id,
                role,
            }),
            Some(_) => Err(AppError::Core(CoreError::Forbidden(
                "Account is awaiting approval".into(),
            ))),
            None => {
                tracing::debug!(user_id = claims.sub, "Token for a deleted account");
                Err(unauthorized("Account no longer exists"))
            }
        }
    }
}
