// src/config.rs

use std::env;

use dotenvy::dotenv;

use crate::error::AppError;
use crate::models::format::TextFormat;

/// Configuration value passed to every backup/restore operation.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    /// Directory for the daily rolling log file. `None` logs to stdout only.
    pub log_dir: Option<String>,
    /// Format stamped on text fields that arrive without one.
    pub default_format: TextFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            rust_log: "info".to_string(),
            log_dir: None,
            default_format: TextFormat::Html,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| AppError::Config("DATABASE_URL must be set".to_string()))?;

        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let log_dir = lookup("FORMULAS_LOG_DIR").filter(|d| !d.is_empty());

        let default_format = match lookup("FORMULAS_DEFAULT_FORMAT") {
            Some(raw) => raw.parse::<TextFormat>().map_err(|_| {
                AppError::Config(format!("FORMULAS_DEFAULT_FORMAT '{}' is not a format code", raw))
            })?,
            None => TextFormat::Html,
        };

        Ok(Self {
            database_url,
            rust_log,
            log_dir,
            default_format,
        })
    }
}
