pub mod admin;
pub mod auth;
pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod reports;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                                  request an account (public)
/// /auth/login                                     login (public)
/// /auth/me                                        current user
///
/// /admin/users/pending                            pending accounts (admin)
/// /admin/users/{id}/approve                       approve (admin)
/// /admin/users/{id}                               delete (admin)
///
/// /ingredients                                    list, create
/// /ingredients/{id}                               get, update, delete
///
/// /recipes                                        list, create
/// /recipes/{id}                                   get, update, delete
/// /recipes/{id}/ingredients                       add line
/// /recipes/{id}/ingredients/{ingredient_id}       edit, remove line
/// /recipes/{id}/portions                          scaled projection
/// /recipes/{id}/image                             image upload
///
/// /reports/costs                                  recipe cost report
/// /reports/inventory                              inventory valuation
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/ingredients", ingredients::router())
        .nest("/recipes", recipes::router())
        .nest("/reports", reports::router())
}
