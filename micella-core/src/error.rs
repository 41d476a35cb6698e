//! Structured error types for the micella workspace.

use serde::Serialize;
use thiserror::Error;

/// Unified error type for all micella operations.
#[derive(Debug, Error)]
pub enum MicellaError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input does not describe a valid chemical structure, or normalization
    /// could not produce one.
    #[error("invalid structure: {0}")]
    InvalidStructure(String),

    /// A descriptor could not be computed for an otherwise valid structure.
    #[error("descriptor unavailable: {0}")]
    DescriptorUnavailable(String),

    /// Reference tables, coefficient constants or settings are missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Coarse classification of a [`MicellaError`], used at presentation boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Io,
    InvalidStructure,
    DescriptorUnavailable,
    Configuration,
}

impl ErrorKind {
    /// Snake-case name, as used in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Io => "io",
            ErrorKind::InvalidStructure => "invalid_structure",
            ErrorKind::DescriptorUnavailable => "descriptor_unavailable",
            ErrorKind::Configuration => "configuration",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MicellaError {
    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MicellaError::Io(_) => ErrorKind::Io,
            MicellaError::InvalidStructure(_) => ErrorKind::InvalidStructure,
            MicellaError::DescriptorUnavailable(_) => ErrorKind::DescriptorUnavailable,
            MicellaError::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Whether the error is tied to a single request rather than process setup.
    pub fn is_per_request(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidStructure | ErrorKind::DescriptorUnavailable
        )
    }
}

/// Convenience alias used throughout the micella workspace.
pub type Result<T> = std::result::Result<T, MicellaError>;
