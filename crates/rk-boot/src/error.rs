//! Error types for rk-boot

use std::fmt;
use std::path::PathBuf;

/// Result type for rk-boot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop a boot configuration from loading.
///
/// Override collection never produces these; malformed overrides are logged
/// and skipped.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The boot document is not valid YAML or its root is not a mapping
    #[error("Invalid boot document: {message}")]
    Document { message: String },

    /// The merged tree does not fit the requested configuration type
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A boot document could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
        }
    }
}

/// Failure to project a tree onto a typed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to decode boot configuration: {}", self.message)
    }
}

impl std::error::Error for DecodeError {}

impl serde::de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::new(msg.to_string())
    }
}
