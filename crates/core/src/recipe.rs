//! Recipes and their ingredient lines.
//!
//! Every mutation takes the current [`Recipe`] by reference and returns a new
//! value with the changed line re-costed and `cost_recipe` recomputed. The
//! caller owns persistence.

use std::fmt;
use std::str::FromStr;

use crate::cost::{compute_line_cost, compute_recipe_total};
use crate::error::CoreError;
use crate::ingredient::{Ingredient, IngredientCatalog};
use crate::scaling::ScalingPolicy;
use crate::types::{DbId, Timestamp};
use crate::units::Unit;

/// Minimum number of ingredient lines a recipe needs before it can be saved.
pub const MIN_RECIPE_LINES: usize = 3;

/// Maximum length of a recipe name.
pub const MAX_RECIPE_NAME_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Recipe type
// ---------------------------------------------------------------------------

/// Kind of baked good. Determines the portion-scaling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeType {
    Cookie,
    Cake,
    Cupcake,
}

/// Canonical recipe type identifiers.
pub const VALID_RECIPE_TYPES: &[&str] = &["cookie", "cake", "cupcake"];

impl RecipeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cookie => "cookie",
            Self::Cake => "cake",
            Self::Cupcake => "cupcake",
        }
    }

    /// Cakes scale relative to their baseline portions; everything else
    /// treats the selection as a raw batch multiplier.
    pub fn scaling_policy(self) -> ScalingPolicy {
        match self {
            Self::Cake => ScalingPolicy::Proportional,
            Self::Cookie | Self::Cupcake => ScalingPolicy::Multiplier,
        }
    }
}

impl fmt::Display for RecipeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecipeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cookie" => Ok(Self::Cookie),
            "cake" => Ok(Self::Cake),
            "cupcake" => Ok(Self::Cupcake),
            other => Err(CoreError::Validation(format!(
                "Invalid recipe type '{other}'. Must be one of: {VALID_RECIPE_TYPES:?}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Recipe
// ---------------------------------------------------------------------------

/// One ingredient's usage within a recipe.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RecipeLine {
    pub ingredient_id: DbId,
    /// Ingredient name at the time the line was costed (display only).
    pub ingredient_name: String,
    pub unit: Unit,
    /// Quantity used, in the ingredient's unit.
    pub quantity_used: f64,
    /// Derived: `(cost / quantity) * quantity_used`, rounded to cents.
    pub cost_by_quantity_used: f64,
}

impl RecipeLine {
    /// Build a freshly costed line for `ingredient`.
    pub fn costed(ingredient: &Ingredient, quantity_used: f64) -> Result<Self, CoreError> {
        Ok(Self {
            ingredient_id: ingredient.id,
            ingredient_name: ingredient.name.clone(),
            unit: ingredient.unit,
            quantity_used,
            cost_by_quantity_used: compute_line_cost(ingredient, quantity_used)?,
        })
    }
}

/// A stored recipe. `cost_recipe` is always the rounded sum of its lines.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Recipe {
    pub id: DbId,
    pub name: String,
    pub recipe_type: RecipeType,
    /// Baseline portion count the stored quantities correspond to.
    pub quantity_portions: i32,
    pub ingredients: Vec<RecipeLine>,
    pub cost_recipe: f64,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
}

impl Recipe {
    pub fn line(&self, ingredient_id: DbId) -> Option<&RecipeLine> {
        self.ingredients.iter().find(|l| l.ingredient_id == ingredient_id)
    }

    pub fn uses_ingredient(&self, ingredient_id: DbId) -> bool {
        self.line(ingredient_id).is_some()
    }

    /// Replace the line set and recompute `cost_recipe` from it.
    fn with_lines(&self, ingredients: Vec<RecipeLine>) -> Self {
        let cost_recipe = compute_recipe_total(&ingredients);
        Self {
            ingredients,
            cost_recipe,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

/// Parse a user-entered quantity. Must be a finite number greater than zero.
pub fn parse_quantity(text: &str) -> Result<f64, CoreError> {
    let trimmed = text.trim();
    let value: f64 = trimmed.parse().map_err(|_| {
        CoreError::Validation(format!("Quantity '{trimmed}' is not a number"))
    })?;
    ensure_positive_quantity(value)?;
    Ok(value)
}

/// Reject zero, negative and non-finite quantities.
pub fn ensure_positive_quantity(value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Quantity must be a positive number, got {value}"
        )));
    }
    Ok(())
}

/// A quantity as typed into a form (`"250"`) or sent as a JSON number.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(f64),
    Text(String),
}

impl QuantityInput {
    /// The positive quantity this input denotes.
    pub fn value(&self) -> Result<f64, CoreError> {
        match self {
            Self::Number(n) => ensure_positive_quantity(*n).map(|()| *n),
            Self::Text(text) => parse_quantity(text),
        }
    }
}

impl From<f64> for QuantityInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

// ---------------------------------------------------------------------------
// Line construction
// ---------------------------------------------------------------------------

/// Append a costed line to `lines`, rejecting a second line for the same
/// ingredient.
pub fn push_line(
    lines: &mut Vec<RecipeLine>,
    ingredient: &Ingredient,
    quantity_used: f64,
) -> Result<(), CoreError> {
    ensure_positive_quantity(quantity_used)?;
    if lines.iter().any(|l| l.ingredient_id == ingredient.id) {
        return Err(duplicate_line(&ingredient.name));
    }
    lines.push(RecipeLine::costed(ingredient, quantity_used)?);
    Ok(())
}

fn duplicate_line(ingredient_name: &str) -> CoreError {
    CoreError::Conflict(format!("Ingredient '{ingredient_name}' is already in the recipe"))
}

/// Build a costed line list from `(ingredient_id, quantity_used)` pairs.
pub fn build_lines(
    catalog: &IngredientCatalog,
    entries: &[(DbId, f64)],
) -> Result<Vec<RecipeLine>, CoreError> {
    let mut lines = Vec::with_capacity(entries.len());
    for &(ingredient_id, quantity_used) in entries {
        let ingredient = catalog.require(ingredient_id)?;
        push_line(&mut lines, ingredient, quantity_used)?;
    }
    Ok(lines)
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Add a line for `ingredient`. Duplicate ingredients are a `Conflict`.
pub fn add_ingredient_line(
    recipe: &Recipe,
    ingredient: &Ingredient,
    quantity_used: f64,
) -> Result<Recipe, CoreError> {
    let mut lines = recipe.ingredients.clone();
    push_line(&mut lines, ingredient, quantity_used)?;
    Ok(recipe.with_lines(lines))
}

/// Change the quantity of an existing line and re-cost it.
///
/// `NotFound` if the recipe has no line for `ingredient_id`, or the catalog
/// no longer carries that ingredient.
pub fn edit_line_quantity(
    recipe: &Recipe,
    catalog: &IngredientCatalog,
    ingredient_id: DbId,
    new_quantity_used: f64,
) -> Result<Recipe, CoreError> {
    ensure_positive_quantity(new_quantity_used)?;
    let position = line_position(recipe, ingredient_id)?;
    let ingredient = catalog.require(ingredient_id)?;

    let mut lines = recipe.ingredients.clone();
    lines[position] = RecipeLine::costed(ingredient, new_quantity_used)?;
    Ok(recipe.with_lines(lines))
}

/// Drop the line for `ingredient_id`.
pub fn remove_ingredient_line(recipe: &Recipe, ingredient_id: DbId) -> Result<Recipe, CoreError> {
    let position = line_position(recipe, ingredient_id)?;
    let mut lines = recipe.ingredients.clone();
    lines.remove(position);
    Ok(recipe.with_lines(lines))
}

fn line_position(recipe: &Recipe, ingredient_id: DbId) -> Result<usize, CoreError> {
    recipe
        .ingredients
        .iter()
        .position(|l| l.ingredient_id == ingredient_id)
        .ok_or(CoreError::NotFound {
            entity: "RecipeLine",
            id: ingredient_id,
        })
}

// ---------------------------------------------------------------------------
// Save-time validation
// ---------------------------------------------------------------------------

/// Validate the header fields and line set of a recipe about to be written.
pub fn validate_recipe_fields(
    name: &str,
    quantity_portions: i32,
    lines: &[RecipeLine],
) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Recipe name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_RECIPE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Recipe name must be at most {MAX_RECIPE_NAME_LEN} characters"
        )));
    }
    if quantity_portions <= 0 {
        return Err(CoreError::Validation(
            "Portion count must be a positive integer".into(),
        ));
    }
    if lines.len() < MIN_RECIPE_LINES {
        return Err(CoreError::Validation(format!(
            "A recipe needs at least {MIN_RECIPE_LINES} ingredients, got {}",
            lines.len()
        )));
    }
    for (i, line) in lines.iter().enumerate() {
        if lines[..i].iter().any(|l| l.ingredient_id == line.ingredient_id) {
            return Err(duplicate_line(&line.ingredient_name));
        }
        ensure_positive_quantity(line.quantity_used)?;
    }
    Ok(())
}

/// Validate a whole recipe before persisting it.
pub fn validate_for_save(recipe: &Recipe) -> Result<(), CoreError> {
    validate_recipe_fields(&recipe.name, recipe.quantity_portions, &recipe.ingredients)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
