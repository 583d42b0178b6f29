//! Application settings loaded via OrthoConfig.
//!
//! Values come from `RECIPES_*` environment variables, command-line flags or
//! a configuration file. `DATABASE_URL` is honoured when
//! `RECIPES_DATABASE_URL` is unset.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::DEFAULT_MIN_PASSWORD_LENGTH;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const FALLBACK_DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Raised when a configured value cannot be interpreted.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid bind address `{value}`: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("minimum password length must be at least 1")]
    MinPasswordLength,
}

/// Runtime configuration for the server and the admin binaries.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPES")]
pub struct AppSettings {
    /// PostgreSQL connection string. Without one the server runs in memory.
    pub database_url: Option<String>,
    /// Socket address for the HTTP listener.
    pub bind_addr: Option<String>,
    /// Minimum password length for registration and password changes.
    pub min_password_length: Option<usize>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Apply pending migrations on startup.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl AppSettings {
    /// Configured database URL, falling back to `DATABASE_URL`.
    pub fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| std::env::var(FALLBACK_DATABASE_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn min_password_length(&self) -> Result<usize, SettingsError> {
        match self.min_password_length {
            Some(0) => Err(SettingsError::MinPasswordLength),
            Some(length) => Ok(length),
            None => Ok(DEFAULT_MIN_PASSWORD_LENGTH),
        }
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "RECIPES_DATABASE_URL",
        "RECIPES_BIND_ADDR",
        "RECIPES_MIN_PASSWORD_LENGTH",
        "RECIPES_POOL_MAX_SIZE",
        "RECIPES_RUN_MIGRATIONS",
        "DATABASE_URL",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(cleared());

        let settings = load_from_empty_args();
        assert!(settings.database_url().is_none());
        assert_eq!(
            settings.bind_addr().expect("default address"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(settings.min_password_length().expect("default"), 5);
        assert_eq!(settings.pool_max_size(), DEFAULT_POOL_MAX_SIZE);
        assert!(settings.run_migrations);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = cleared();
        vars.extend([
            ("RECIPES_DATABASE_URL", Some("postgres://db/recipes".to_owned())),
            ("RECIPES_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("RECIPES_MIN_PASSWORD_LENGTH", Some("8".to_owned())),
            ("RECIPES_POOL_MAX_SIZE", Some("3".to_owned())),
            ("RECIPES_RUN_MIGRATIONS", Some("false".to_owned())),
        ]);
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url().as_deref(),
            Some("postgres://db/recipes")
        );
        assert_eq!(
            settings.bind_addr().expect("address").to_string(),
            "127.0.0.1:9000"
        );
        assert_eq!(settings.min_password_length().expect("length"), 8);
        assert_eq!(settings.pool_max_size(), 3);
        assert!(!settings.run_migrations);
    }

    #[rstest]
    fn database_url_falls_back_to_plain_variable() {
        let mut vars = cleared();
        vars.push(("DATABASE_URL", Some("postgres://fallback/db".to_owned())));
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url().as_deref(),
            Some("postgres://fallback/db")
        );
    }

    #[rstest]
    #[case(Some("not-an-address"), None)]
    #[case(None, Some(0))]
    fn invalid_values_are_reported(
        #[case] bind_addr: Option<&str>,
        #[case] min_password_length: Option<usize>,
    ) {
        let settings = AppSettings {
            database_url: None,
            bind_addr: bind_addr.map(str::to_owned),
            min_password_length,
            pool_max_size: None,
            run_migrations: true,
        };
        if bind_addr.is_some() {
            assert!(matches!(
                settings.bind_addr(),
                Err(SettingsError::BindAddr { .. })
            ));
        } else {
            assert!(matches!(
                settings.min_password_length(),
                Err(SettingsError::MinPasswordLength)
            ));
        }
    }
}
