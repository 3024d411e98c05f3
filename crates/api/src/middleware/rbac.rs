//! Role gates layered on top of [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bakehouse_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Any approved account, baker or admin. Inventory, recipes and reports.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        AuthUser::from_request_parts(parts, state).await.map(Self)
    }
}

/// Admin accounts only. Account approval and removal.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only an admin can manage accounts".into(),
            )));
        }
        Ok(Self(user))
    }
}
