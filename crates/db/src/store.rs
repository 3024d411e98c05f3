//! PostgreSQL-backed [`RecipeStore`] used by the ingredient cascade.

use async_trait::async_trait;
use bakehouse_core::cascade::RecipeStore;
use bakehouse_core::recipe::Recipe;

use crate::repositories::RecipeRepo;
use crate::DbPool;

/// Writes re-costed recipes through [`RecipeRepo::save`].
#[derive(Clone)]
pub struct PgRecipeStore {
    pool: DbPool,
}

impl PgRecipeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    type Error = sqlx::Error;

    async fn save_recipe(&self, recipe: &Recipe) -> Result<(), Self::Error> {
        if RecipeRepo::save(&self.pool, recipe).await? {
            tracing::debug!(recipe_id = recipe.id, cost_recipe = recipe.cost_recipe, "Recipe re-costed");
            Ok(())
        } else {
            // Deleted between the scan and the write.
            Err(sqlx::Error::RowNotFound)
        }
    }
}
