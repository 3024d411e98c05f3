use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bakehouse_core::error::CoreError;
use serde::Serialize;

/// Error returned by every HTTP handler.
///
/// Domain failures arrive as [`CoreError`]; the remaining variants cover
/// storage and transport concerns. All of them render as an [`ErrorBody`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An upload larger than the configured ceiling.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// JSON shape of every error response: `{"error": "...", "code": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

impl ErrorBody {
    fn new(code: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }

    fn internal() -> Self {
        Self::new("INTERNAL_ERROR", "An internal error occurred")
    }
}

impl AppError {
    fn classify(&self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new("BAD_REQUEST", msg)),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorBody::new("PAYLOAD_TOO_LARGE", msg),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.classify();
        (status, Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, ErrorBody) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", format!("{entity} with id {id} not found")),
        ),
        CoreError::NotFoundByName { entity, name } => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", format!("{entity} named '{name}' not found")),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new("VALIDATION_ERROR", msg)),
        CoreError::InvalidIngredientData(msg) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorBody::new("INVALID_INGREDIENT_DATA", msg),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", msg)),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ErrorBody::new("UNAUTHORIZED", msg)),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorBody::new("FORBIDDEN", msg)),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
        }
    }
}

/// Readable message for a named schema constraint.
fn constraint_message(constraint: &str) -> String {
    match constraint {
        "uq_ingredients_name_key" => "An ingredient with this name already exists".into(),
        "uq_users_email" => "This email is already registered".into(),
        "recipe_ingredients_ingredient_id_fkey" => {
            "The ingredient is still used by at least one recipe".into()
        }
        other => format!("Constraint violated: {other}"),
    }
}

/// Map a sqlx error onto a response.
///
/// - `RowNotFound` is 404.
/// - Unique (23505) and foreign-key (23503) violations are 409.
/// - Everything else is a sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, ErrorBody) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", "Resource not found"),
        ),
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() || db_err.is_foreign_key_violation() => {
            let message = constraint_message(db_err.constraint().unwrap_or("unknown"));
            (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", message))
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
        }
    }
}
