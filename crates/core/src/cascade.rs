//! Propagation of ingredient price changes into stored recipes.
//!
//! When an ingredient's cost or reference quantity changes, every recipe line
//! that uses it must be re-costed and each affected recipe total recomputed.
//! The fan-out is best-effort: each recipe is written independently and a
//! failed write is recorded without aborting the rest.

use async_trait::async_trait;

use crate::cost::{compute_line_cost, compute_recipe_total};
use crate::error::CoreError;
use crate::ingredient::Ingredient;
use crate::recipe::Recipe;
use crate::types::DbId;

/// Persistence boundary used by the cascade.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    type Error: std::fmt::Display + Send;

    /// Persist the line costs and total of an existing recipe.
    async fn save_recipe(&self, recipe: &Recipe) -> Result<(), Self::Error>;
}

/// One recipe the cascade could not persist.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CascadeFailure {
    pub recipe_id: DbId,
    pub error: String,
}

/// Settled outcome of a cascade run.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct CascadeReport {
    pub ingredient_id: DbId,
    /// Recipes inspected.
    pub scanned: usize,
    /// Recipes re-costed and written successfully.
    pub updated: Vec<DbId>,
    /// Recipes that referenced the ingredient but whose write failed.
    pub failed: Vec<CascadeFailure>,
}

impl CascadeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Re-cost every line of `recipe` that references `ingredient`.
///
/// Returns `Ok(None)` when the recipe does not use the ingredient. Lines for
/// other ingredients are left exactly as they were.
pub fn apply_ingredient_change(
    recipe: &Recipe,
    ingredient: &Ingredient,
) -> Result<Option<Recipe>, CoreError> {
    if !recipe.uses_ingredient(ingredient.id) {
        return Ok(None);
    }

    let mut updated = recipe.clone();
    for line in updated
        .ingredients
        .iter_mut()
        .filter(|l| l.ingredient_id == ingredient.id)
    {
        line.cost_by_quantity_used = compute_line_cost(ingredient, line.quantity_used)?;
        line.ingredient_name = ingredient.name.clone();
        line.unit = ingredient.unit;
    }
    updated.cost_recipe = compute_recipe_total(&updated.ingredients);
    Ok(Some(updated))
}

/// Push `ingredient`'s current cost and quantity into every recipe using it.
///
/// Invalid master data aborts before any write. After that, each affected
/// recipe is saved independently and failures are collected in the report.
pub async fn propagate_ingredient_change<S: RecipeStore>(
    store: &S,
    ingredient: &Ingredient,
    recipes: &[Recipe],
) -> Result<CascadeReport, CoreError> {
    ingredient.unit_cost()?;

    let mut report = CascadeReport {
        ingredient_id: ingredient.id,
        scanned: recipes.len(),
        ..CascadeReport::default()
    };

    for recipe in recipes {
        let Some(updated) = apply_ingredient_change(recipe, ingredient)? else {
            continue;
        };
        match store.save_recipe(&updated).await {
            Ok(()) => report.updated.push(updated.id),
            Err(e) => {
                tracing::warn!(
                    recipe_id = updated.id,
                    ingredient_id = ingredient.id,
                    error = %e,
                    "Failed to persist re-costed recipe",
                );
                report.failed.push(CascadeFailure {
                    recipe_id: updated.id,
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        ingredient_id = ingredient.id,
        scanned = report.scanned,
        updated = report.updated.len(),
        failed = report.failed.len(),
        "Ingredient change propagated",
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;
    use crate::ingredient::IngredientCatalog;
    use crate::recipe::{build_lines, RecipeType};
    use crate::units::Unit;

    /// In-memory store that can be told to reject specific recipes.
    #[derive(Default)]
    struct FakeStore {
        saved: Mutex<HashMap<DbId, Recipe>>,
        reject: HashSet<DbId>,
    }

    #[async_trait]
    impl RecipeStore for FakeStore {
        type Error = String;

        async fn save_recipe(&self, recipe: &Recipe) -> Result<(), Self::Error> {
            if self.reject.contains(&recipe.id) {
                return Err(format!("write rejected for recipe {}", recipe.id));
            }
            self.saved.lock().unwrap().insert(recipe.id, recipe.clone());
            Ok(())
        }
    }

    fn flour(cost: f64) -> Ingredient {
        Ingredient {
            id: 1,
            name: "Harina".into(),
            unit: Unit::Grams,
            quantity: 1000.0,
            cost,
        }
    }

    fn catalog() -> IngredientCatalog {
        IngredientCatalog::new([
            flour(50.0),
            Ingredient {
                id: 2,
                name: "Mantequilla".into(),
                unit: Unit::Grams,
                quantity: 100.0,
                cost: 15.0,
            },
            Ingredient {
                id: 3,
                name: "Azúcar".into(),
                unit: Unit::Grams,
                quantity: 200.0,
                cost: 8.5,
            },
            Ingredient {
                id: 4,
                name: "Huevo".into(),
                unit: Unit::Pieces,
                quantity: 12.0,
                cost: 36.0,
            },
        ])
    }

    fn recipe(id: DbId, entries: &[(DbId, f64)]) -> Recipe {
        let lines = build_lines(&catalog(), entries).unwrap();
        Recipe {
            id,
            name: format!("recipe-{id}"),
            recipe_type: RecipeType::Cookie,
            quantity_portions: 12,
            cost_recipe: compute_recipe_total(&lines),
            ingredients: lines,
            image_url: None,
            created_at: Utc::now(),
        }
    }

    fn recipes() -> Vec<Recipe> {
        vec![
            recipe(10, &[(1, 200.0), (2, 100.0), (3, 200.0)]),
            recipe(11, &[(1, 400.0), (3, 100.0), (4, 2.0)]),
            recipe(12, &[(2, 50.0), (3, 50.0), (4, 6.0)]),
            recipe(13, &[(1, 100.0), (2, 10.0), (4, 1.0)]),
        ]
    }

    #[test]
    fn apply_skips_unrelated_recipe() {
        let unrelated = recipe(12, &[(2, 50.0), (3, 50.0), (4, 6.0)]);
        assert_eq!(apply_ingredient_change(&unrelated, &flour(100.0)).unwrap(), None);
    }

    #[test]
    fn apply_recosts_matching_line_only() {
        let original = recipe(10, &[(1, 200.0), (2, 100.0), (3, 200.0)]);
        let updated = apply_ingredient_change(&original, &flour(100.0))
            .unwrap()
            .unwrap();

        assert_eq!(updated.line(1).unwrap().cost_by_quantity_used, 20.0);
        assert_eq!(updated.line(1).unwrap().quantity_used, 200.0);
        assert_eq!(updated.line(2), original.line(2));
        assert_eq!(updated.line(3), original.line(3));
        assert_eq!(updated.cost_recipe, 43.5);
    }

    #[test]
    fn apply_with_zero_quantity_is_invalid_data() {
        let original = recipe(10, &[(1, 200.0), (2, 100.0), (3, 200.0)]);
        let broken = Ingredient {
            quantity: 0.0,
            ..flour(50.0)
        };
        assert_matches!(
            apply_ingredient_change(&original, &broken),
            Err(CoreError::InvalidIngredientData(_))
        );
    }

    #[tokio::test]
    async fn cascade_updates_every_recipe_using_ingredient() {
        let store = FakeStore::default();
        let report = propagate_ingredient_change(&store, &flour(100.0), &recipes())
            .await
            .unwrap();

        assert_eq!(report.scanned, 4);
        assert_eq!(report.updated, vec![10, 11, 13]);
        assert!(report.is_complete());

        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!(saved[&10].cost_recipe, 43.5);
        assert_eq!(saved[&11].line(1).unwrap().cost_by_quantity_used, 40.0);
        assert_eq!(saved[&13].line(1).unwrap().cost_by_quantity_used, 10.0);
        // Unrelated lines keep their stored cost.
        assert_eq!(saved[&11].line(4).unwrap().cost_by_quantity_used, 6.0);
        assert!(!saved.contains_key(&12));
    }

    #[tokio::test]
    async fn cascade_continues_past_failed_write() {
        let store = FakeStore {
            reject: HashSet::from([11]),
            ..FakeStore::default()
        };
        let report = propagate_ingredient_change(&store, &flour(100.0), &recipes())
            .await
            .unwrap();

        assert_eq!(report.updated, vec![10, 13]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].recipe_id, 11);
        assert!(report.failed[0].error.contains("rejected"));
        assert!(!report.is_complete());
    }

    #[tokio::test]
    async fn cascade_with_invalid_ingredient_writes_nothing() {
        let store = FakeStore::default();
        let broken = Ingredient {
            quantity: -1.0,
            ..flour(50.0)
        };
        let result = propagate_ingredient_change(&store, &broken, &recipes()).await;

        assert_matches!(result, Err(CoreError::InvalidIngredientData(_)));
        assert!(store.saved.lock().unwrap().is_empty());
    }
}
