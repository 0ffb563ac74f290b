//! Environment lookup helpers
//!
//! Configuration is read through an [`EnvSource`] so that loaders can be
//! exercised with an in-memory map instead of the process environment.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// A variable is set but cannot be parsed
    #[error("invalid value {value:?} for {key}: expected {expected}")]
    Invalid {
        key: String,
        value: String,
        expected: String,
    },
}

/// A source of configuration values keyed by variable name
pub enum EnvSource {
    /// The process environment
    Process,
    /// A fixed map, mostly for tests
    Map(HashMap<String, String>),
}

impl EnvSource {
    /// Build a map-backed source from key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Look up a variable; blank values count as unset
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match self {
            Self::Process => std::env::var(key).ok(),
            Self::Map(map) => map.get(key).cloned(),
        }?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Parse an optional variable with [`FromStr`]
    pub fn parse<T: FromStr>(&self, key: &str, expected: &str) -> Result<Option<T>, EnvError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value.parse().map(Some).map_err(|_| EnvError::Invalid {
                key: key.to_string(),
                value,
                expected: expected.to_string(),
            }),
        }
    }

    /// Parse an optional boolean toggle (see [`parse_flag`])
    pub fn flag(&self, key: &str) -> Result<Option<bool>, EnvError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => parse_flag(&value).map(Some).ok_or(EnvError::Invalid {
                key: key.to_string(),
                value,
                expected: "one of true/false/1/0/yes/no/on/off".to_string(),
            }),
        }
    }
}

/// Parse a boolean toggle, case-insensitively
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Load a `.env` file from the working directory or its parents, if any
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}
