//! Route definitions for the `/reports` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET /costs      -> cost_report
/// GET /inventory  -> inventory_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/costs", get(reports::cost_report))
        .route("/inventory", get(reports::inventory_report))
}
