//! Cost and inventory reports.

use crate::error::CoreError;
use crate::ingredient::Ingredient;
use crate::recipe::{Recipe, RecipeType};
use crate::rounding::round_to_cents;
use crate::types::DbId;
use crate::units::Unit;

// ---------------------------------------------------------------------------
// Recipe cost report
// ---------------------------------------------------------------------------

/// One row of the recipe cost report.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RecipeCostRow {
    pub recipe_id: DbId,
    pub name: String,
    pub recipe_type: RecipeType,
    pub quantity_portions: i32,
    pub cost_recipe: f64,
    pub cost_per_portion: f64,
}

/// Summary of recipe costs, rows sorted by cost descending then name.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CostReport {
    pub recipe_count: usize,
    pub total_cost: f64,
    pub average_cost: f64,
    pub most_expensive: Option<DbId>,
    pub least_expensive: Option<DbId>,
    pub rows: Vec<RecipeCostRow>,
}

/// Build the cost report from stored recipe totals.
pub fn build_cost_report(recipes: &[Recipe]) -> CostReport {
    let mut rows: Vec<RecipeCostRow> = recipes
        .iter()
        .map(|r| RecipeCostRow {
            recipe_id: r.id,
            name: r.name.clone(),
            recipe_type: r.recipe_type,
            quantity_portions: r.quantity_portions,
            cost_recipe: r.cost_recipe,
            cost_per_portion: cost_per_portion(r.cost_recipe, r.quantity_portions),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.cost_recipe
            .total_cmp(&a.cost_recipe)
            .then_with(|| a.name.cmp(&b.name))
    });

    let total: f64 = rows.iter().map(|r| r.cost_recipe).sum();
    let average = if rows.is_empty() {
        0.0
    } else {
        total / rows.len() as f64
    };

    CostReport {
        recipe_count: rows.len(),
        total_cost: round_to_cents(total),
        average_cost: round_to_cents(average),
        most_expensive: rows.first().map(|r| r.recipe_id),
        least_expensive: rows.last().map(|r| r.recipe_id),
        rows,
    }
}

fn cost_per_portion(cost_recipe: f64, portions: i32) -> f64 {
    if portions <= 0 {
        return 0.0;
    }
    round_to_cents(cost_recipe / f64::from(portions))
}

// ---------------------------------------------------------------------------
// Inventory valuation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct InventoryLine {
    pub ingredient_id: DbId,
    pub name: String,
    pub unit: Unit,
    pub quantity: f64,
    pub cost: f64,
    /// Unrounded price of a single unit.
    pub unit_cost: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct InventoryValuation {
    pub ingredient_count: usize,
    pub total_value: f64,
    pub lines: Vec<InventoryLine>,
}

/// Value the inventory at its recorded costs, lines sorted by name.
///
/// Fails on the first ingredient whose master data cannot be priced.
pub fn value_inventory(ingredients: &[Ingredient]) -> Result<InventoryValuation, CoreError> {
    let mut lines = ingredients
        .iter()
        .map(|i| {
            Ok(InventoryLine {
                ingredient_id: i.id,
                name: i.name.clone(),
                unit: i.unit,
                quantity: i.quantity,
                cost: i.cost,
                unit_cost: i.unit_cost()?,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;
    lines.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(InventoryValuation {
        ingredient_count: lines.len(),
        total_value: round_to_cents(lines.iter().map(|l| l.cost).sum()),
        lines,
    })
}
