// src/error.rs

use thiserror::Error;

/// Global error enum for backup, restore and projection operations.
///
/// Only `MissingField` and `InvalidField` describe bad input data; the other
/// variants wrap failures of the surrounding machinery (XML parser, database, config).
#[derive(Debug, Error)]
pub enum AppError {
    /// A required field is absent from current-format input.
    #[error("missing required field '{0}'")]
    MissingField(String),

    /// A field is present but its value cannot be interpreted.
    #[error("invalid value '{value}' for field '{field}'")]
    InvalidField { field: String, value: String },

    #[error("malformed backup XML: {0}")]
    Xml(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("no handler registered for question type '{0}'")]
    UnknownQtype(String),
}

impl AppError {
    pub fn invalid(field: &str, value: impl Into<String>) -> Self {
        AppError::InvalidField {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

/// Converts `sqlx::Error` into `AppError::Database`.
/// Allows using `?` operator on store queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
