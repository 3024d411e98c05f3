use std::sync::Arc;

use crate::config::ServerConfig;
use crate::media::ImageStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: bakehouse_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Where uploaded recipe images are kept.
    pub images: Arc<dyn ImageStore>,
}
