//! First-run administrator provisioning.
//!
//! Registration only ever creates pending baker accounts, so the first admin
//! has to come from configuration (`BOOTSTRAP_ADMIN_EMAIL` and
//! `BOOTSTRAP_ADMIN_PASSWORD`).

use anyhow::Context;
use bakehouse_core::roles::ROLE_ADMIN;
use bakehouse_core::types::DbId;
use bakehouse_db::models::user::CreateUser;
use bakehouse_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};

/// Create an approved admin account unless one already exists.
///
/// Returns the new user's id, or `None` when an approved admin was found.
pub async fn ensure_admin(pool: &PgPool, email: &str, password: &str) -> anyhow::Result<Option<DbId>> {
    if UserRepo::count_admins(pool).await? > 0 {
        return Ok(None);
    }

    validate_password_strength(password, MIN_PASSWORD_LENGTH).map_err(anyhow::Error::msg)?;
    let password_hash =
        hash_password(password).map_err(|e| anyhow::anyhow!("Password hashing error: {e}"))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.trim().to_lowercase(),
            password_hash,
            role: ROLE_ADMIN.to_string(),
            is_approved: true,
        },
    )
    .await
    .with_context(|| format!("Failed to create bootstrap admin '{email}'"))?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap admin created");
    Ok(Some(user.id))
}
