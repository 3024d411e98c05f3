//! Repository for the `ingredients` table.

use bakehouse_core::ingredient::{normalize_name, IngredientCatalog};
use bakehouse_core::search::{clamp_limit, clamp_offset, name_filter_pattern, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use bakehouse_core::types::DbId;
use sqlx::PgPool;

use crate::decode_error;
use crate::models::ingredient::{CreateIngredient, IngredientRow, UpdateIngredient};

/// Column list for ingredient queries.
const COLUMNS: &str = "id, name, unit, quantity, cost, created_at, updated_at";

/// Provides CRUD operations for inventory ingredients.
pub struct IngredientRepo;

impl IngredientRepo {
    /// Insert a new ingredient, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateIngredient) -> Result<IngredientRow, sqlx::Error> {
        let name = input.name.trim();
        let query = format!(
            "INSERT INTO ingredients (name, name_key, unit, quantity, cost)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IngredientRow>(&query)
            .bind(name)
            .bind(normalize_name(name))
            .bind(input.unit.as_str())
            .bind(input.quantity)
            .bind(input.cost)
            .fetch_one(pool)
            .await
    }

    /// Find an ingredient by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<IngredientRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ingredients WHERE id = $1");
        sqlx::query_as::<_, IngredientRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List ingredients alphabetically, optionally filtered by a name substring.
    pub async fn list(
        pool: &PgPool,
        q: Option<&str>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<IngredientRow>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
        let offset = clamp_offset(offset);
        let query = format!(
            "SELECT {COLUMNS} FROM ingredients
             WHERE ($1::TEXT IS NULL OR name ILIKE $1)
             ORDER BY name ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, IngredientRow>(&query)
            .bind(name_filter_pattern(q))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List every ingredient (no pagination).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<IngredientRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ingredients ORDER BY name ASC, id ASC");
        sqlx::query_as::<_, IngredientRow>(&query).fetch_all(pool).await
    }

    /// Load the whole inventory as a core [`IngredientCatalog`].
    pub async fn load_catalog(pool: &PgPool) -> Result<IngredientCatalog, sqlx::Error> {
        Self::list_all(pool)
            .await?
            .iter()
            .map(|row| row.to_domain().map_err(decode_error))
            .collect()
    }

    /// Update an ingredient. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateIngredient,
    ) -> Result<Option<IngredientRow>, sqlx::Error> {
        let name = input.name.as_deref().map(str::trim);
        let query = format!(
            "UPDATE ingredients SET
                name = COALESCE($2, name),
                name_key = COALESCE($3, name_key),
                unit = COALESCE($4, unit),
                quantity = COALESCE($5, quantity),
                cost = COALESCE($6, cost)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IngredientRow>(&query)
            .bind(id)
            .bind(name)
            .bind(name.map(normalize_name))
            .bind(input.unit.map(|u| u.as_str()))
            .bind(input.quantity)
            .bind(input.cost)
            .fetch_optional(pool)
            .await
    }

    /// Delete an ingredient. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while any recipe line references it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// IDs of recipes with a line for this ingredient, ascending.
    pub async fn find_referencing_recipes(pool: &PgPool, id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT recipe_id FROM recipe_ingredients WHERE ingredient_id = $1 ORDER BY recipe_id",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }
}
