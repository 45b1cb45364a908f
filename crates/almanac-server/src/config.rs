//! Server configuration
//!
//! Defaults layered under environment variables (and an optional `.env`).
//! Empty values count as unset.

use almanac_core::{AlmanacError, Result};
use serde::Deserialize;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_DATABASE_URL: &str =
    "postgres://user:password@db:5432/calendar_db?sslmode=disable";
pub const DEFAULT_GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-flash-latest:generateContent";

/// Which storage adapter backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Process-local maps; data is lost on restart
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Postgres => write!(f, "postgres"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_address: String,
    pub database_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_endpoint: String,
    storage: String,
}

impl Config {
    /// Load from `.env` (if present) and the process environment.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_env(config::Environment::default())
    }

    fn from_env(env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)
            .and_then(|b| b.set_default("database_url", DEFAULT_DATABASE_URL))
            .and_then(|b| b.set_default("gemini_endpoint", DEFAULT_GEMINI_ENDPOINT))
            .and_then(|b| b.set_default("storage", "postgres"))
            .map_err(config_err)?
            .add_source(env)
            .build()
            .map_err(config_err)?;

        let mut config: Config = settings.try_deserialize().map_err(config_err)?;

        if config.bind_address.trim().is_empty() {
            config.bind_address = DEFAULT_BIND_ADDRESS.to_string();
        }
        if config.database_url.trim().is_empty() {
            config.database_url = DEFAULT_DATABASE_URL.to_string();
        }
        if config.gemini_endpoint.trim().is_empty() {
            config.gemini_endpoint = DEFAULT_GEMINI_ENDPOINT.to_string();
        }
        config.gemini_api_key = config.gemini_api_key.filter(|k| !k.trim().is_empty());

        Ok(config)
    }

    pub fn storage_backend(&self) -> Result<StorageBackend> {
        match self.storage.trim().to_ascii_lowercase().as_str() {
            "" | "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(AlmanacError::Config(format!(
                "unknown storage backend '{}', expected 'postgres' or 'memory'",
                other
            ))),
        }
    }
}

fn config_err(e: config::ConfigError) -> AlmanacError {
    AlmanacError::Config(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> Config {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<config::Map<String, String>>();
        Config::from_env(config::Environment::default().source(Some(map))).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = load(&[]);
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.gemini_endpoint, DEFAULT_GEMINI_ENDPOINT);
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.storage_backend().unwrap(), StorageBackend::Postgres);
    }

    #[test]
    fn test_environment_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://me@localhost/cal"),
            ("GEMINI_API_KEY", "AIzaTestKey1234"),
            ("STORAGE", "memory"),
        ]);
        assert_eq!(config.database_url, "postgres://me@localhost/cal");
        assert_eq!(config.gemini_api_key.as_deref(), Some("AIzaTestKey1234"));
        assert_eq!(config.storage_backend().unwrap(), StorageBackend::Memory);
    }

    #[test]
    fn test_empty_values_fall_back() {
        let config = load(&[("DATABASE_URL", ""), ("GEMINI_API_KEY", "")]);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.gemini_api_key, None);
    }

    #[test]
    fn test_unknown_storage_backend() {
        let config = load(&[("STORAGE", "sqlite")]);
        assert!(matches!(
            config.storage_backend(),
            Err(AlmanacError::Config(_))
        ));
    }
}
