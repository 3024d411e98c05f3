//! Inventory ingredients: master data, catalog lookup, validation and the
//! deletion policy.
//!
//! An ingredient is priced as `cost` for `quantity` units of `unit`. Every
//! recipe line cost is derived from that ratio, so `quantity` must stay
//! strictly positive.

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::types::DbId;
use crate::units::Unit;

/// Maximum length of an ingredient name.
pub const MAX_INGREDIENT_NAME_LEN: usize = 120;

// ---------------------------------------------------------------------------
// Ingredient
// ---------------------------------------------------------------------------

/// An inventory item with a reference cost over a reference quantity.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Ingredient {
    pub id: DbId,
    pub name: String,
    pub unit: Unit,
    /// Reference quantity that `cost` is priced over.
    pub quantity: f64,
    /// Price paid for `quantity` units.
    pub cost: f64,
}

impl Ingredient {
    /// Price of a single unit (`cost / quantity`).
    ///
    /// Fails with [`CoreError::InvalidIngredientData`] instead of producing
    /// `inf` or `NaN` when the master data cannot be priced.
    pub fn unit_cost(&self) -> Result<f64, CoreError> {
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(CoreError::InvalidIngredientData(format!(
                "ingredient '{}' (id {}) has reference quantity {}; it must be greater than zero",
                self.name, self.id, self.quantity
            )));
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(CoreError::InvalidIngredientData(format!(
                "ingredient '{}' (id {}) has cost {}; it must be zero or greater",
                self.name, self.id, self.cost
            )));
        }
        Ok(self.cost / self.quantity)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// How a caller names the ingredient it wants to add to a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientRef {
    Id(DbId),
    /// Exact, case-sensitive name. Partial matches are never resolved.
    Name(String),
}

/// In-memory snapshot of the inventory, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct IngredientCatalog {
    by_id: BTreeMap<DbId, Ingredient>,
}

impl IngredientCatalog {
    pub fn new(ingredients: impl IntoIterator<Item = Ingredient>) -> Self {
        Self {
            by_id: ingredients.into_iter().map(|i| (i.id, i)).collect(),
        }
    }

    pub fn get(&self, id: DbId) -> Option<&Ingredient> {
        self.by_id.get(&id)
    }

    /// Look up by exact name.
    pub fn find_by_name(&self, name: &str) -> Option<&Ingredient> {
        self.by_id.values().find(|i| i.name == name)
    }

    /// Resolve an [`IngredientRef`] to a catalog entry.
    pub fn resolve(&self, reference: &IngredientRef) -> Result<&Ingredient, CoreError> {
        match reference {
            IngredientRef::Id(id) => self.require(*id),
            IngredientRef::Name(name) => {
                self.find_by_name(name).ok_or_else(|| CoreError::NotFoundByName {
                    entity: "Ingredient",
                    name: name.clone(),
                })
            }
        }
    }

    /// Look up by id, failing with `NotFound` when absent.
    pub fn require(&self, id: DbId) -> Result<&Ingredient, CoreError> {
        self.get(id).ok_or(CoreError::NotFound {
            entity: "Ingredient",
            id,
        })
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.by_id.values()
    }
}

impl FromIterator<Ingredient> for IngredientCatalog {
    fn from_iter<T: IntoIterator<Item = Ingredient>>(iter: T) -> Self {
        Self::new(iter)
    }
}

// ---------------------------------------------------------------------------
// Name normalisation
// ---------------------------------------------------------------------------

/// Normalise an ingredient name for duplicate detection.
///
/// Lower-cases, trims, and folds common Latin accented letters to their base
/// letter so that "Azúcar" and "azucar" collide.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().chars().map(fold_diacritic).collect()
}

fn fold_diacritic(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate the user-editable fields of an ingredient.
///
/// - name must be non-blank and at most [`MAX_INGREDIENT_NAME_LEN`] chars
/// - quantity must be finite and greater than zero
/// - cost must be finite and zero or greater
pub fn validate_ingredient_fields(name: &str, quantity: f64, cost: f64) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Ingredient name must not be empty".into(),
        ));
    }
    if trimmed.chars().count() > MAX_INGREDIENT_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Ingredient name must be at most {MAX_INGREDIENT_NAME_LEN} characters"
        )));
    }
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(CoreError::Validation(
            "Ingredient quantity must be a positive number".into(),
        ));
    }
    if !cost.is_finite() || cost < 0.0 {
        return Err(CoreError::Validation(
            "Ingredient cost must be zero or a positive number".into(),
        ));
    }
    Ok(())
}

/// Reject `name` if another ingredient already uses the same normalised name.
///
/// `exclude_id` is the ingredient being renamed, which may keep its own name.
pub fn ensure_unique_name<'a>(
    name: &str,
    existing: impl IntoIterator<Item = &'a Ingredient>,
    exclude_id: Option<DbId>,
) -> Result<(), CoreError> {
    let wanted = normalize_name(name);
    let clash = existing
        .into_iter()
        .filter(|i| Some(i.id) != exclude_id)
        .find(|i| normalize_name(&i.name) == wanted);
    match clash {
        Some(other) => Err(CoreError::Conflict(format!(
            "An ingredient named '{}' already exists (id {})",
            other.name, other.id
        ))),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Deletion policy
// ---------------------------------------------------------------------------

/// An ingredient may only be deleted when no recipe references it.
///
/// `referencing_recipe_ids` lists every recipe with a line for the ingredient.
pub fn ensure_deletable(ingredient_id: DbId, referencing_recipe_ids: &[DbId]) -> Result<(), CoreError> {
    if referencing_recipe_ids.is_empty() {
        return Ok(());
    }
    Err(CoreError::Conflict(format!(
        "Ingredient {ingredient_id} is used by {} recipe(s) {referencing_recipe_ids:?}; \
         remove it from those recipes first",
        referencing_recipe_ids.len()
    )))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
