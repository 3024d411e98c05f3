//! Handlers for the `/ingredients` resource.
//!
//! A change to an ingredient's cost or reference quantity is pushed into every
//! recipe that uses it before the response is returned.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bakehouse_core::cascade::{propagate_ingredient_change, CascadeReport};
use bakehouse_core::error::CoreError;
use bakehouse_core::ingredient::{ensure_deletable, ensure_unique_name, validate_ingredient_fields};
use bakehouse_core::types::DbId;
use bakehouse_db::models::ingredient::{CreateIngredient, IngredientRow, UpdateIngredient};
use bakehouse_db::repositories::{IngredientRepo, RecipeRepo};
use bakehouse_db::store::PgRecipeStore;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for `PUT /ingredients/{id}`.
#[derive(Debug, Serialize)]
pub struct IngredientUpdated {
    pub ingredient: IngredientRow,
    /// Present when the change re-priced recipes.
    pub cascade: Option<CascadeReport>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/ingredients
pub async fn list_ingredients(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<IngredientRow>>>> {
    let rows =
        IngredientRepo::list(&state.pool, params.q.as_deref(), params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// POST /api/v1/ingredients
pub async fn create_ingredient(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateIngredient>,
) -> AppResult<(StatusCode, Json<DataResponse<IngredientRow>>)> {
    validate_ingredient_fields(&input.name, input.quantity, input.cost)?;
    let catalog = IngredientRepo::load_catalog(&state.pool).await?;
    ensure_unique_name(&input.name, catalog.iter(), None)?;

    let row = IngredientRepo::create(&state.pool, &input).await?;

    tracing::info!(
        ingredient_id = row.id,
        name = %row.name,
        user_id = user.user_id,
        "Ingredient created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

/// GET /api/v1/ingredients/{id}
pub async fn get_ingredient(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<IngredientRow>>> {
    let row = find_row(&state, id).await?;
    Ok(Json(DataResponse { data: row }))
}

/// PUT /api/v1/ingredients/{id}
///
/// Partial update. When `cost` or `quantity` is supplied, every recipe line
/// using the ingredient is re-costed; individual recipe write failures are
/// reported in `cascade.failed` rather than failing the request.
pub async fn update_ingredient(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateIngredient>,
) -> AppResult<Json<DataResponse<IngredientUpdated>>> {
    let current = find_row(&state, id).await?;

    let name = input.name.as_deref().unwrap_or(&current.name);
    validate_ingredient_fields(
        name,
        input.quantity.unwrap_or(current.quantity),
        input.cost.unwrap_or(current.cost),
    )?;
    if input.name.is_some() {
        let catalog = IngredientRepo::load_catalog(&state.pool).await?;
        ensure_unique_name(name, catalog.iter(), Some(id))?;
    }

    let row = IngredientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ingredient",
            id,
        }))?;

    tracing::info!(ingredient_id = id, user_id = user.user_id, "Ingredient updated");

    let cascade = if input.changes_pricing() {
        let ingredient = row.to_domain()?;
        let recipes = RecipeRepo::list_using_ingredient(&state.pool, id).await?;
        let store = PgRecipeStore::new(state.pool.clone());
        Some(propagate_ingredient_change(&store, &ingredient, &recipes).await?)
    } else {
        None
    };

    Ok(Json(DataResponse {
        data: IngredientUpdated {
            ingredient: row,
            cascade,
        },
    }))
}

/// DELETE /api/v1/ingredients/{id}
///
/// Refused with 409 while any recipe still uses the ingredient.
pub async fn delete_ingredient(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let referencing = IngredientRepo::find_referencing_recipes(&state.pool, id).await?;
    ensure_deletable(id, &referencing)?;

    if !IngredientRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Ingredient",
            id,
        }));
    }

    tracing::info!(ingredient_id = id, user_id = user.user_id, "Ingredient deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_row(state: &AppState, id: DbId) -> AppResult<IngredientRow> {
    IngredientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ingredient",
            id,
        }))
}
