//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// List parameters (`?q=&limit=&offset=`).
///
/// `q` is a case-insensitive name filter. `limit` and `offset` are clamped in
/// the repository layer via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /recipes/{id}/portions`.
#[derive(Debug, Deserialize)]
pub struct PortionParams {
    pub portions: i32,
}
