//! Inventory ingredient model and DTOs.

use bakehouse_core::error::CoreError;
use bakehouse_core::ingredient::Ingredient;
use bakehouse_core::types::{DbId, Timestamp};
use bakehouse_core::units::Unit;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ingredients` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IngredientRow {
    pub id: DbId,
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    pub cost: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl IngredientRow {
    /// Convert to the core domain type.
    pub fn to_domain(&self) -> Result<Ingredient, CoreError> {
        Ok(Ingredient {
            id: self.id,
            name: self.name.clone(),
            unit: self.unit.parse()?,
            quantity: self.quantity,
            cost: self.cost,
        })
    }
}

/// DTO for creating a new ingredient.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIngredient {
    pub name: String,
    pub unit: Unit,
    pub quantity: f64,
    pub cost: f64,
}

/// DTO for updating an ingredient. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIngredient {
    pub name: Option<String>,
    pub unit: Option<Unit>,
    pub quantity: Option<f64>,
    pub cost: Option<f64>,
}

impl UpdateIngredient {
    /// True when the patch changes anything a recipe line cost depends on.
    pub fn changes_pricing(&self) -> bool {
        self.quantity.is_some() || self.cost.is_some()
    }
}
