//! Errors at the file and config boundaries.
//!
//! Timestamp normalization and labelling never fail; only loading
//! documents and settings from disk does.

use std::path::PathBuf;
use thiserror::Error;

use crate::time::LocaleError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find config directory")]
    NoConfigDir,

    #[error("Failed to access config at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Locale(#[from] LocaleError),

    #[error("Invalid UTC offset: {0} (expected +HH:MM or -HH:MM)")]
    InvalidOffset(String),
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed chat document: {0}")]
    Json(#[from] serde_json::Error),
}
