//! Handlers for the `/admin` resource (account approval).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bakehouse_core::error::CoreError;
use bakehouse_core::types::DbId;
use bakehouse_db::models::user::UserResponse;
use bakehouse_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/users/pending
pub async fn list_pending(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list_pending(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// POST /api/v1/admin/users/{id}/approve
///
/// Approving an already approved account is a no-op that returns it unchanged.
pub async fn approve_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::approve(&state.pool, id, admin.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = id, approved_by = admin.user_id, "Account approved");

    Ok(Json(DataResponse { data: user.into() }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Reject a pending request or remove an account. Admins cannot remove
/// themselves.
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "Admins cannot delete their own account".into(),
        )));
    }

    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    tracing::info!(user_id = id, deleted_by = admin.user_id, "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}
