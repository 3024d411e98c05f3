use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;

use crate::auth::jwt::JwtConfig;

/// Default upload ceiling for recipe images (5 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory uploaded media is written under.
    pub media_dir: PathBuf,
    /// Public URL prefix the media directory is served from.
    pub media_base_url: String,
    /// Largest accepted recipe image, in bytes.
    pub max_image_bytes: usize,
    /// JWT token configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MEDIA_DIR`            | `storage/media`            |
    /// | `MEDIA_BASE_URL`       | `/media`                   |
    /// | `MAX_IMAGE_BYTES`      | `5242880`                  |
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = env_parse("PORT", 3000_u16)?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = env_parse("REQUEST_TIMEOUT_SECS", 30_u64)?;

        let media_dir = PathBuf::from(
            std::env::var("MEDIA_DIR").unwrap_or_else(|_| "storage/media".into()),
        );
        let media_base_url = std::env::var("MEDIA_BASE_URL")
            .unwrap_or_else(|_| "/media".into())
            .trim_end_matches('/')
            .to_string();
        let max_image_bytes = env_parse("MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES)?;

        let jwt = JwtConfig::from_env()?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            media_dir,
            media_base_url,
            max_image_bytes,
            jwt,
        })
    }
}

/// Read `key` and parse it, falling back to `default` when unset.
pub(crate) fn env_parse<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
