//! Error types for the datagrid.
//!
//! The coordination layer itself never fails; every transient inconsistency is
//! a logged no-op. Errors only come from loading configuration.

use std::path::PathBuf;

/// Result type alias for datagrid operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring a datagrid.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error.
    #[error("Failed to read grid configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("Grid configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A configuration field holds an unusable value.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
