//! Handlers for the `/reports` resource.

use axum::extract::State;
use axum::Json;
use bakehouse_core::ingredient::Ingredient;
use bakehouse_core::report::{build_cost_report, value_inventory, CostReport, InventoryValuation};
use bakehouse_db::repositories::{IngredientRepo, RecipeRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/reports/costs
///
/// Every recipe with its stored total and cost per portion, most expensive first.
pub async fn cost_report(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CostReport>>> {
    let recipes = RecipeRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse {
        data: build_cost_report(&recipes),
    }))
}

/// GET /api/v1/reports/inventory
pub async fn inventory_report(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<InventoryValuation>>> {
    let ingredients = IngredientRepo::list_all(&state.pool)
        .await?
        .iter()
        .map(|row| row.to_domain())
        .collect::<Result<Vec<Ingredient>, _>>()?;

    Ok(Json(DataResponse {
        data: value_inventory(&ingredients)?,
    }))
}
