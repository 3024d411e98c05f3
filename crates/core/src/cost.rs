//! Line and recipe cost computation.
//!
//! - line cost  = `(ingredient.cost / ingredient.quantity) * quantity_used`
//! - recipe cost = sum of line costs
//!
//! Both are rounded to cents with [`round_to_cents`].

use crate::error::CoreError;
use crate::ingredient::Ingredient;
use crate::recipe::RecipeLine;
use crate::rounding::round_to_cents;

/// Cost of using `quantity_used` units of `ingredient`, rounded to cents.
pub fn compute_line_cost(ingredient: &Ingredient, quantity_used: f64) -> Result<f64, CoreError> {
    if !quantity_used.is_finite() || quantity_used < 0.0 {
        return Err(CoreError::Validation(format!(
            "Quantity used must be a non-negative number, got {quantity_used}"
        )));
    }
    let unit_cost = ingredient.unit_cost()?;
    Ok(round_to_cents(unit_cost * quantity_used))
}

/// Sum of every line's `cost_by_quantity_used`, rounded to cents.
///
/// An empty slice totals `0.0`; the three-line minimum is a save-time rule.
pub fn compute_recipe_total(lines: &[RecipeLine]) -> f64 {
    round_to_cents(lines.iter().map(|l| l.cost_by_quantity_used).sum())
}
