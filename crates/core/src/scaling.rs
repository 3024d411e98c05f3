//! Read-time portion scaling of recipes.
//!
//! Two policies exist:
//!
//! - [`ScalingPolicy::Proportional`] (cakes): quantities are multiplied by
//!   `selected_portions / quantity_portions`.
//! - [`ScalingPolicy::Multiplier`] (cookies, cupcakes): `selected_portions` is
//!   itself the multiplier applied to the stored quantities; the baseline
//!   portion count is ignored.
//!
//! Scaled quantities are rounded to two decimals before the line cost is
//! recomputed from them. Nothing here mutates the stored recipe.

use crate::cost::compute_recipe_total;
use crate::error::CoreError;
use crate::ingredient::IngredientCatalog;
use crate::recipe::{Recipe, RecipeLine, RecipeType};
use crate::rounding::round_to_cents;
use crate::types::DbId;

/// Portion counts offered for proportionally scaled recipes.
pub const PROPORTIONAL_PORTION_OPTIONS: &[i32] = &[10, 15, 20];

/// Batch multipliers offered for multiplier-scaled recipes.
pub const MULTIPLIER_OPTIONS: &[i32] = &[1, 2, 4, 6, 8];

/// How a recipe's quantities respond to a portion selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingPolicy {
    Proportional,
    Multiplier,
}

impl ScalingPolicy {
    /// Factor applied to every stored `quantity_used`.
    pub fn factor(self, selected_portions: i32, baseline_portions: i32) -> Result<f64, CoreError> {
        if selected_portions <= 0 {
            return Err(CoreError::Validation(format!(
                "Selected portions must be positive, got {selected_portions}"
            )));
        }
        match self {
            Self::Proportional => {
                if baseline_portions <= 0 {
                    return Err(CoreError::Validation(format!(
                        "Recipe baseline portions must be positive, got {baseline_portions}"
                    )));
                }
                Ok(f64::from(selected_portions) / f64::from(baseline_portions))
            }
            Self::Multiplier => Ok(f64::from(selected_portions)),
        }
    }

    /// Selections the UI offers for this policy.
    pub fn options(self) -> &'static [i32] {
        match self {
            Self::Proportional => PROPORTIONAL_PORTION_OPTIONS,
            Self::Multiplier => MULTIPLIER_OPTIONS,
        }
    }
}

/// A portion-scaled projection of a recipe. Never persisted.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScaledRecipe {
    pub recipe_id: DbId,
    pub name: String,
    pub recipe_type: RecipeType,
    pub policy: ScalingPolicy,
    pub base_portions: i32,
    pub selected_portions: i32,
    pub factor: f64,
    pub ingredients: Vec<RecipeLine>,
    pub cost_recipe: f64,
}

/// Check a selection against the options offered for `recipe_type`.
pub fn validate_portion_selection(recipe_type: RecipeType, selected_portions: i32) -> Result<(), CoreError> {
    let options = recipe_type.scaling_policy().options();
    if options.contains(&selected_portions) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{selected_portions} is not an available portion option for a {recipe_type}; \
             choose one of {options:?}"
        )))
    }
}

/// Project `recipe` onto `selected_portions` using its type's policy.
///
/// Line costs are recomputed from the catalog's current prices.
pub fn recalculate_recipe_for_portions(
    recipe: &Recipe,
    catalog: &IngredientCatalog,
    selected_portions: i32,
) -> Result<ScaledRecipe, CoreError> {
    let policy = recipe.recipe_type.scaling_policy();
    let factor = policy.factor(selected_portions, recipe.quantity_portions)?;

    let ingredients = recipe
        .ingredients
        .iter()
        .map(|line| {
            let ingredient = catalog.require(line.ingredient_id)?;
            let quantity_used = round_to_cents(line.quantity_used * factor);
            RecipeLine::costed(ingredient, quantity_used)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ScaledRecipe {
        recipe_id: recipe.id,
        name: recipe.name.clone(),
        recipe_type: recipe.recipe_type,
        policy,
        base_portions: recipe.quantity_portions,
        selected_portions,
        factor,
        cost_recipe: compute_recipe_total(&ingredients),
        ingredients,
    })
}
