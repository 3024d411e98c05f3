//! Repository for the `recipes` and `recipe_ingredients` tables.
//!
//! Recipes are always read and written together with their lines. Writes
//! replace the whole line set inside one transaction, so a concurrent reader
//! never observes a total that disagrees with its lines. Concurrent writers
//! are last-write-wins.

use std::collections::HashMap;

use bakehouse_core::recipe::{Recipe, RecipeLine};
use bakehouse_core::search::{clamp_limit, clamp_offset, name_filter_pattern, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use bakehouse_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::decode_error;
use crate::models::recipe::{NewRecipe, RecipeLineRow, RecipeRow};

/// Column list for recipe header queries.
const COLUMNS: &str = "id, name, recipe_type, quantity_portions, cost_recipe, image_url, \
    created_by, created_at, updated_at";

/// Line columns joined with the ingredient's current name and unit.
const LINE_SELECT: &str = "SELECT ri.recipe_id, ri.ingredient_id, i.name AS ingredient_name, i.unit, \
    ri.position, ri.quantity_used, ri.cost_by_quantity_used
    FROM recipe_ingredients ri
    JOIN ingredients i ON i.id = ri.ingredient_id";

/// Provides CRUD operations for recipes and their ingredient lines.
pub struct RecipeRepo;

impl RecipeRepo {
    /// Insert a recipe header and its costed lines in one transaction.
    ///
    /// `cost_recipe` is taken from the lines, never from the caller.
    pub async fn create(
        pool: &PgPool,
        input: &NewRecipe,
        lines: &[RecipeLine],
    ) -> Result<Recipe, sqlx::Error> {
        let cost_recipe = bakehouse_core::cost::compute_recipe_total(lines);
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO recipes (name, recipe_type, quantity_portions, cost_recipe, image_url, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, RecipeRow>(&query)
            .bind(input.name.trim())
            .bind(input.recipe_type.as_str())
            .bind(input.quantity_portions)
            .bind(cost_recipe)
            .bind(&input.image_url)
            .bind(input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        insert_lines(&mut tx, row.id, lines).await?;
        let line_rows = fetch_lines(&mut *tx, &[row.id]).await?;
        tx.commit().await?;

        row.into_domain(&line_rows).map_err(decode_error)
    }

    /// Find a recipe, with its lines, by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Recipe>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recipes WHERE id = $1");
        let Some(row) = sqlx::query_as::<_, RecipeRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };
        let lines = fetch_lines(pool, &[id]).await?;
        row.into_domain(&lines).map(Some).map_err(decode_error)
    }

    /// List recipes alphabetically, optionally filtered by a name substring.
    pub async fn list(
        pool: &PgPool,
        q: Option<&str>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Recipe>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
        let offset = clamp_offset(offset);
        let query = format!(
            "SELECT {COLUMNS} FROM recipes
             WHERE ($1::TEXT IS NULL OR name ILIKE $1)
             ORDER BY name ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, RecipeRow>(&query)
            .bind(name_filter_pattern(q))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        attach_lines(pool, rows).await
    }

    /// List every recipe (no pagination).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Recipe>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recipes ORDER BY name ASC, id ASC");
        let rows = sqlx::query_as::<_, RecipeRow>(&query).fetch_all(pool).await?;
        attach_lines(pool, rows).await
    }

    /// List every recipe with a line for `ingredient_id`, ordered by ID.
    pub async fn list_using_ingredient(
        pool: &PgPool,
        ingredient_id: DbId,
    ) -> Result<Vec<Recipe>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recipes r
             WHERE EXISTS (
                 SELECT 1 FROM recipe_ingredients ri
                 WHERE ri.recipe_id = r.id AND ri.ingredient_id = $1
             )
             ORDER BY id ASC"
        );
        let rows = sqlx::query_as::<_, RecipeRow>(&query)
            .bind(ingredient_id)
            .fetch_all(pool)
            .await?;
        attach_lines(pool, rows).await
    }

    /// Persist a recipe's header fields, total and full line set.
    ///
    /// Returns `false` if the recipe no longer exists.
    pub async fn save(pool: &PgPool, recipe: &Recipe) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE recipes SET
                name = $2,
                recipe_type = $3,
                quantity_portions = $4,
                cost_recipe = $5,
                image_url = $6
             WHERE id = $1",
        )
        .bind(recipe.id)
        .bind(recipe.name.trim())
        .bind(recipe.recipe_type.as_str())
        .bind(recipe.quantity_portions)
        .bind(recipe.cost_recipe)
        .bind(&recipe.image_url)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe.id)
            .execute(&mut *tx)
            .await?;
        insert_lines(&mut tx, recipe.id, &recipe.ingredients).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Set (or clear) the stored image URL. Returns `false` if not found.
    pub async fn update_image_url(
        pool: &PgPool,
        id: DbId,
        image_url: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE recipes SET image_url = $2 WHERE id = $1")
            .bind(id)
            .bind(image_url)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a recipe and, by cascade, its lines.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_lines(
    tx: &mut Transaction<'_, Postgres>,
    recipe_id: DbId,
    lines: &[RecipeLine],
) -> Result<(), sqlx::Error> {
    for (position, line) in lines.iter().enumerate() {
        sqlx::query(
            "INSERT INTO recipe_ingredients
                (recipe_id, ingredient_id, position, quantity_used, cost_by_quantity_used)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(recipe_id)
        .bind(line.ingredient_id)
        .bind(position as i32)
        .bind(line.quantity_used)
        .bind(line.cost_by_quantity_used)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn fetch_lines<'e, E>(executor: E, recipe_ids: &[DbId]) -> Result<Vec<RecipeLineRow>, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    let query = format!("{LINE_SELECT} WHERE ri.recipe_id = ANY($1) ORDER BY ri.recipe_id, ri.position");
    sqlx::query_as::<_, RecipeLineRow>(&query)
        .bind(recipe_ids)
        .fetch_all(executor)
        .await
}

/// Load lines for every header in one query and assemble domain recipes,
/// preserving the header order.
async fn attach_lines(pool: &PgPool, rows: Vec<RecipeRow>) -> Result<Vec<Recipe>, sqlx::Error> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
    let mut by_recipe: HashMap<DbId, Vec<RecipeLineRow>> = HashMap::new();
    for line in fetch_lines(pool, &ids).await? {
        by_recipe.entry(line.recipe_id).or_default().push(line);
    }

    rows.into_iter()
        .map(|row| {
            let lines = by_recipe.remove(&row.id).unwrap_or_default();
            row.into_domain(&lines).map_err(decode_error)
        })
        .collect()
}
