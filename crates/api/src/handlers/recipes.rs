//! Handlers for the `/recipes` resource.
//!
//! Every write goes through the core line operations and is re-validated
//! (name, positive portions, at least three distinct ingredients) before the
//! recipe is persisted in one transaction.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bakehouse_core::error::CoreError;
use bakehouse_core::ingredient::IngredientRef;
use bakehouse_core::recipe::{
    add_ingredient_line, build_lines, edit_line_quantity, remove_ingredient_line,
    validate_for_save, validate_recipe_fields, QuantityInput, Recipe,
};
use bakehouse_core::scaling::{
    recalculate_recipe_for_portions, validate_portion_selection, ScaledRecipe,
};
use bakehouse_core::types::DbId;
use bakehouse_db::models::recipe::{CreateRecipe, NewRecipe, UpdateRecipe};
use bakehouse_db::repositories::{IngredientRepo, RecipeRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::media::validate_image;
use crate::middleware::rbac::RequireAuth;
use crate::query::{ListParams, PortionParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /recipes/{id}/ingredients`.
///
/// The ingredient is named either by `ingredient_id` or by its exact
/// `ingredient_name`.
#[derive(Debug, Deserialize)]
pub struct AddLineRequest {
    pub ingredient_id: Option<DbId>,
    pub ingredient_name: Option<String>,
    pub quantity_used: QuantityInput,
}

impl AddLineRequest {
    fn ingredient_ref(&self) -> Result<IngredientRef, CoreError> {
        match (self.ingredient_id, &self.ingredient_name) {
            (Some(id), _) => Ok(IngredientRef::Id(id)),
            (None, Some(name)) => Ok(IngredientRef::Name(name.trim().to_string())),
            (None, None) => Err(CoreError::Validation(
                "Either ingredient_id or ingredient_name is required".into(),
            )),
        }
    }
}

/// Request body for `PUT /recipes/{id}/ingredients/{ingredient_id}`.
#[derive(Debug, Deserialize)]
pub struct EditLineRequest {
    pub quantity_used: QuantityInput,
}

// ---------------------------------------------------------------------------
// Recipe CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/recipes
pub async fn list_recipes(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Recipe>>>> {
    let recipes =
        RecipeRepo::list(&state.pool, params.q.as_deref(), params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: recipes }))
}

/// POST /api/v1/recipes
///
/// Lines are costed from the current inventory prices.
pub async fn create_recipe(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateRecipe>,
) -> AppResult<(StatusCode, Json<DataResponse<Recipe>>)> {
    let catalog = IngredientRepo::load_catalog(&state.pool).await?;
    let entries = input
        .ingredients
        .iter()
        .map(|l| Ok((l.ingredient_id, l.quantity_used.value()?)))
        .collect::<Result<Vec<(DbId, f64)>, CoreError>>()?;
    let lines = build_lines(&catalog, &entries)?;
    validate_recipe_fields(&input.name, input.quantity_portions, &lines)?;

    let new_recipe = NewRecipe {
        name: input.name.trim().to_string(),
        recipe_type: input.recipe_type,
        quantity_portions: input.quantity_portions,
        image_url: input.image_url,
        created_by: Some(user.user_id),
    };
    let recipe = RecipeRepo::create(&state.pool, &new_recipe, &lines).await?;

    tracing::info!(
        recipe_id = recipe.id,
        name = %recipe.name,
        cost_recipe = recipe.cost_recipe,
        user_id = user.user_id,
        "Recipe created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: recipe })))
}

/// GET /api/v1/recipes/{id}
pub async fn get_recipe(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Recipe>>> {
    let recipe = load_recipe(&state, id).await?;
    Ok(Json(DataResponse { data: recipe }))
}

/// PUT /api/v1/recipes/{id}
///
/// Rename, re-type or change the baseline portions. Stored line quantities
/// and costs are left as they are.
pub async fn update_recipe(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRecipe>,
) -> AppResult<Json<DataResponse<Recipe>>> {
    let mut recipe = load_recipe(&state, id).await?;
    if let Some(name) = input.name {
        recipe.name = name.trim().to_string();
    }
    if let Some(recipe_type) = input.recipe_type {
        recipe.recipe_type = recipe_type;
    }
    if let Some(portions) = input.quantity_portions {
        recipe.quantity_portions = portions;
    }

    persist(&state, &recipe).await?;
    tracing::info!(recipe_id = id, user_id = user.user_id, "Recipe updated");

    Ok(Json(DataResponse { data: recipe }))
}

/// DELETE /api/v1/recipes/{id}
pub async fn delete_recipe(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !RecipeRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Recipe",
            id,
        }));
    }

    // The row is gone either way; an orphaned file is only worth a warning.
    if let Err(e) = state.images.remove_recipe_image(id).await {
        tracing::warn!(recipe_id = id, error = %e, "Failed to remove recipe image");
    }

    tracing::info!(recipe_id = id, user_id = user.user_id, "Recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Recipe lines
// ---------------------------------------------------------------------------

/// POST /api/v1/recipes/{id}/ingredients
pub async fn add_line(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddLineRequest>,
) -> AppResult<Json<DataResponse<Recipe>>> {
    let recipe = load_recipe(&state, id).await?;
    let catalog = IngredientRepo::load_catalog(&state.pool).await?;
    let ingredient = catalog.resolve(&input.ingredient_ref()?)?;

    let updated = add_ingredient_line(&recipe, ingredient, input.quantity_used.value()?)?;
    persist(&state, &updated).await?;

    tracing::info!(
        recipe_id = id,
        ingredient_id = ingredient.id,
        user_id = user.user_id,
        "Recipe line added",
    );
    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/recipes/{id}/ingredients/{ingredient_id}
pub async fn edit_line(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((id, ingredient_id)): Path<(DbId, DbId)>,
    Json(input): Json<EditLineRequest>,
) -> AppResult<Json<DataResponse<Recipe>>> {
    let recipe = load_recipe(&state, id).await?;
    let catalog = IngredientRepo::load_catalog(&state.pool).await?;

    let updated = edit_line_quantity(&recipe, &catalog, ingredient_id, input.quantity_used.value()?)?;
    persist(&state, &updated).await?;

    tracing::info!(recipe_id = id, ingredient_id, user_id = user.user_id, "Recipe line edited");
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/recipes/{id}/ingredients/{ingredient_id}
///
/// Refused when the recipe would be left with fewer than three ingredients.
pub async fn remove_line(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((id, ingredient_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Recipe>>> {
    let recipe = load_recipe(&state, id).await?;

    let updated = remove_ingredient_line(&recipe, ingredient_id)?;
    persist(&state, &updated).await?;

    tracing::info!(recipe_id = id, ingredient_id, user_id = user.user_id, "Recipe line removed");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Portion scaling
// ---------------------------------------------------------------------------

/// GET /api/v1/recipes/{id}/portions?portions=N
///
/// Read-only projection of the recipe at `N` portions (cakes) or `N` batches
/// (cookies, cupcakes), priced at current inventory costs.
pub async fn scale_recipe(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PortionParams>,
) -> AppResult<Json<DataResponse<ScaledRecipe>>> {
    let recipe = load_recipe(&state, id).await?;
    validate_portion_selection(recipe.recipe_type, params.portions)?;

    let catalog = IngredientRepo::load_catalog(&state.pool).await?;
    let scaled = recalculate_recipe_for_portions(&recipe, &catalog, params.portions)?;

    Ok(Json(DataResponse { data: scaled }))
}

// ---------------------------------------------------------------------------
// Image upload
// ---------------------------------------------------------------------------

/// POST /api/v1/recipes/{id}/image
///
/// Accepts a multipart form with a required `image` field. The stored URL
/// replaces any earlier image.
pub async fn upload_image(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<Recipe>>> {
    load_recipe(&state, id).await?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some((filename, data.to_vec()));
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::BadRequest("Missing required 'image' field".into()))?;
    let ext = validate_image(&filename, data.len(), state.config.max_image_bytes)?;

    let url = state.images.put_recipe_image(id, &ext, &data).await?;
    if !RecipeRepo::update_image_url(&state.pool, id, Some(&url)).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Recipe",
            id,
        }));
    }

    tracing::info!(
        recipe_id = id,
        url = %url,
        bytes = data.len(),
        user_id = user.user_id,
        "Recipe image stored",
    );

    let recipe = load_recipe(&state, id).await?;
    Ok(Json(DataResponse { data: recipe }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_recipe(state: &AppState, id: DbId) -> AppResult<Recipe> {
    RecipeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Recipe",
            id,
        }))
}

/// Validate and write back a modified recipe.
async fn persist(state: &AppState, recipe: &Recipe) -> AppResult<()> {
    validate_for_save(recipe)?;
    if !RecipeRepo::save(&state.pool, recipe).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Recipe",
            id: recipe.id,
        }));
    }
    Ok(())
}
