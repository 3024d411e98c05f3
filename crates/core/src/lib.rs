//! Bakehouse domain core.
//!
//! Pure recipe costing logic shared by the database and API crates. Nothing
//! in here performs I/O; the one async entry point
//! ([`cascade::propagate_ingredient_change`]) drives a caller-supplied
//! [`cascade::RecipeStore`].

pub mod cascade;
pub mod cost;
pub mod error;
pub mod ingredient;
pub mod recipe;
pub mod report;
pub mod roles;
pub mod rounding;
pub mod scaling;
pub mod search;
pub mod types;
pub mod units;
