//! Recipe header and line models, plus DTOs.
//!
//! A recipe is stored as one `recipes` row and one `recipe_ingredients` row
//! per line. Line names and units are read from the joined `ingredients` row
//! so they always reflect the current inventory.

use bakehouse_core::error::CoreError;
use bakehouse_core::recipe::{QuantityInput, Recipe, RecipeLine, RecipeType};
use bakehouse_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `recipes` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeRow {
    pub id: DbId,
    pub name: String,
    pub recipe_type: String,
    pub quantity_portions: i32,
    pub cost_recipe: f64,
    pub image_url: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A `recipe_ingredients` row joined with its ingredient's name and unit.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeLineRow {
    pub recipe_id: DbId,
    pub ingredient_id: DbId,
    pub ingredient_name: String,
    pub unit: String,
    pub position: i32,
    pub quantity_used: f64,
    pub cost_by_quantity_used: f64,
}

impl RecipeLineRow {
    pub fn to_domain(&self) -> Result<RecipeLine, CoreError> {
        Ok(RecipeLine {
            ingredient_id: self.ingredient_id,
            ingredient_name: self.ingredient_name.clone(),
            unit: self.unit.parse()?,
            quantity_used: self.quantity_used,
            cost_by_quantity_used: self.cost_by_quantity_used,
        })
    }
}

impl RecipeRow {
    /// Combine the header with its lines (already in position order).
    pub fn into_domain(self, lines: &[RecipeLineRow]) -> Result<Recipe, CoreError> {
        Ok(Recipe {
            id: self.id,
            recipe_type: self.recipe_type.parse()?,
            name: self.name,
            quantity_portions: self.quantity_portions,
            ingredients: lines
                .iter()
                .map(RecipeLineRow::to_domain)
                .collect::<Result<Vec<_>, _>>()?,
            cost_recipe: self.cost_recipe,
            image_url: self.image_url,
            created_at: self.created_at,
        })
    }
}

/// One requested line in a create-recipe payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipeLine {
    pub ingredient_id: DbId,
    pub quantity_used: QuantityInput,
}

/// DTO for creating a recipe. Line costs are computed server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipe {
    pub name: String,
    pub recipe_type: RecipeType,
    pub quantity_portions: i32,
    pub ingredients: Vec<CreateRecipeLine>,
    pub image_url: Option<String>,
}

/// DTO for updating recipe header fields. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRecipe {
    pub name: Option<String>,
    pub recipe_type: Option<RecipeType>,
    pub quantity_portions: Option<i32>,
}

/// Header values for an insert, after validation and costing.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub recipe_type: RecipeType,
    pub quantity_portions: i32,
    pub image_url: Option<String>,
    pub created_by: Option<DbId>,
}
