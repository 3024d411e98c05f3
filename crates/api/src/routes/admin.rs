//! Route definitions for the `/admin` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require the `admin` role.
///
/// ```text
/// GET    /users/pending        -> list_pending
/// POST   /users/{id}/approve   -> approve_user
/// DELETE /users/{id}           -> delete_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/pending", get(admin::list_pending))
        .route("/users/{id}/approve", post(admin::approve_user))
        .route("/users/{id}", delete(admin::delete_user))
}
