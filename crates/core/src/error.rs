use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Entity not found: {entity} named '{name}'")]
    NotFoundByName { entity: &'static str, name: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Ingredient master data that cannot be priced (zero or negative
    /// reference quantity, non-finite cost).
    #[error("Invalid ingredient data: {0}")]
    InvalidIngredientData(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
