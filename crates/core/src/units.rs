//! Units of measure for inventory ingredients.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Unit an ingredient is stocked, priced and consumed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Grams,
    Milliliters,
    Pieces,
}

/// Canonical unit identifiers, in display order.
pub const VALID_UNITS: &[&str] = &["grams", "milliliters", "pieces"];

impl Unit {
    /// Canonical identifier stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grams => "grams",
            Self::Milliliters => "milliliters",
            Self::Pieces => "pieces",
        }
    }

    /// Short label for quantities shown next to a number.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Grams => "g",
            Self::Milliliters => "ml",
            Self::Pieces => "pcs",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = CoreError;

    /// Accepts the canonical identifiers plus the legacy Spanish labels
    /// (`gramos`, `mililitros`, `piezas`) found in older inventory exports.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grams" | "g" | "gramos" => Ok(Self::Grams),
            "milliliters" | "ml" | "mililitros" => Ok(Self::Milliliters),
            "pieces" | "pcs" | "piezas" => Ok(Self::Pieces),
            other => Err(CoreError::Validation(format!(
                "Invalid unit '{other}'. Must be one of: {VALID_UNITS:?}"
            ))),
        }
    }
}
