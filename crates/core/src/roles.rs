//! Account roles.
//!
//! The string forms must match the check constraint on `users.role` in
//! `20260301000003_create_users_table.sql`.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_BAKER: &str = "baker";

/// Every role a user row may carry.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_BAKER];

/// Role carried in an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Approves registrations and manages accounts, plus everything a baker can do.
    Admin,
    /// Maintains inventory and recipes.
    Baker,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Baker => ROLE_BAKER,
        }
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Self::Admin),
            ROLE_BAKER => Ok(Self::Baker),
            other => Err(CoreError::Validation(format!(
                "Unknown role '{other}'. Must be one of: {VALID_ROLES:?}"
            ))),
        }
    }
}
