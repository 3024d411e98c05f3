//! Repository for the `users` table.

use bakehouse_core::roles::ROLE_ADMIN;
use bakehouse_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, role, is_approved, approved_by, approved_at, \
                        created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, role, is_approved)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .bind(input.is_approved)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List accounts awaiting approval, oldest request first.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE is_approved = FALSE ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Approve a pending account.
    ///
    /// Returns `None` if no row with the given `id` exists. Approving an
    /// already approved account leaves its original approval untouched.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
        approved_by: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                is_approved = TRUE,
                approved_by = CASE WHEN is_approved THEN approved_by ELSE $2 END,
                approved_at = CASE WHEN is_approved THEN approved_at ELSE NOW() END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(approved_by)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a user. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count approved administrators.
    pub async fn count_admins(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1 AND is_approved = TRUE")
            .bind(ROLE_ADMIN)
            .fetch_one(pool)
            .await
    }
}
