// src/models/record.rs

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A loose bag of named text fields.
///
/// Used wherever fields may legitimately be absent: serializer input, parsed
/// backup XML and legacy archives. Values are kept as the exact text that
/// appears in the interchange format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, String>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: &str, value: impl ToString) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl ToString) {
        self.0.insert(field.to_string(), value.to_string());
    }

    /// Sets the field only when it is absent. Returns true if a value was written.
    pub fn set_default(&mut self, field: &str, value: impl ToString) -> bool {
        if self.0.contains_key(field) {
            return false;
        }
        self.set(field, value);
        true
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn require(&self, field: &str) -> Result<&str, AppError> {
        self.get(field)
            .ok_or_else(|| AppError::MissingField(field.to_string()))
    }

    /// Parses a required field into `T`.
    pub fn parse<T: FromStr>(&self, field: &str) -> Result<T, AppError> {
        let raw = self.require(field)?;
        raw.trim()
            .parse::<T>()
            .map_err(|_| AppError::invalid(field, raw))
    }

    /// Parses an optional field into `T`.
    pub fn parse_opt<T: FromStr>(&self, field: &str) -> Result<Option<T>, AppError> {
        match self.get(field) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| AppError::invalid(field, raw)),
            None => Ok(None),
        }
    }

    /// Reads a required 0/1 flag.
    pub fn flag(&self, field: &str) -> Result<bool, AppError> {
        let raw = self.require(field)?;
        match raw.trim() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            _ => Err(AppError::invalid(field, raw)),
        }
    }
}

impl FromIterator<(String, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Record(iter.into_iter().collect())
    }
}

/// Renders a flag the way the interchange format stores it.
pub fn flag_text(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}
