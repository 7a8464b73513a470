use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::session::SessionConfig;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields except the session secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// SQLite connection URL (default: `sqlite://bookreview.db`).
    pub database_url: String,
    /// Directory that holds uploaded cover images (default: `media`).
    pub media_root: PathBuf,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Mark cookies `Secure` (default: `false`; enable behind HTTPS).
    pub secure_cookies: bool,
    /// Session token configuration (secret, lifetime).
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `HOST`                 | `0.0.0.0`                |
    /// | `PORT`                 | `8000`                   |
    /// | `DATABASE_URL`         | `sqlite://bookreview.db` |
    /// | `MEDIA_ROOT`           | `media`                  |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                     |
    /// | `SECURE_COOKIES`       | `false`                  |
    ///
    /// See [`SessionConfig::from_env`] for the session variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or("HOST", "0.0.0.0"),
            port: parse_env("PORT", 8000)?,
            database_url: env_or("DATABASE_URL", "sqlite://bookreview.db"),
            media_root: PathBuf::from(env_or("MEDIA_ROOT", "media")),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 30)?,
            secure_cookies: parse_env("SECURE_COOKIES", false)?,
            session: SessionConfig::from_env()?,
        })
    }
}

/// Read `var`, falling back to `default` when unset.
pub(crate) fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.into())
}

/// Read and parse `var`, falling back to `default` when unset.
pub(crate) fn parse_env<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variable_uses_default() {
        let port: u16 = parse_env("BOOKREVIEW_TEST_UNSET_PORT", 8123).unwrap();
        assert_eq!(port, 8123);
    }

    #[test]
    fn invalid_value_names_the_variable() {
        std::env::set_var("BOOKREVIEW_TEST_BAD_PORT", "eighty");
        let err = parse_env::<u16>("BOOKREVIEW_TEST_BAD_PORT", 80).unwrap_err();
        assert!(err.to_string().contains("BOOKREVIEW_TEST_BAD_PORT"));
    }
}
