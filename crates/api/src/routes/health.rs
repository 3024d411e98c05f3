use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"` when every backing store answers, `"degraded"` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// The recipe image directory exists and is a directory.
    pub media_healthy: bool,
}

/// GET /health
///
/// Answers 503 while degraded so load balancers can act on the status alone.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_healthy = bakehouse_db::health_check(&state.pool).await.is_ok();
    let media_healthy = tokio::fs::metadata(&state.config.media_dir)
        .await
        .is_ok_and(|m| m.is_dir());

    let healthy = db_healthy && media_healthy;
    if !healthy {
        tracing::warn!(db_healthy, media_healthy, "Health check degraded");
    }
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
            media_healthy,
        }),
    )
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
