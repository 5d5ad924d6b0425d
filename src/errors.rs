/*!
 * Error types for the phonlabel library.
 *
 * `LabelError` covers everything that can go wrong while reading, navigating or
 * writing an annotation document. `AppError` wraps it for the application layer,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;

use thiserror::Error;

use crate::label_format::LabelFormat;

/// Errors raised by the annotation document, its readers and its writers
#[derive(Error, Debug)]
pub enum LabelError {
    /// The requested format tag is not one of the known formats
    #[error("Unsupported label format: {0}")]
    UnsupportedFormat(String),

    /// The source could not be opened or read
    #[error("Cannot read label source {path:?}: {source}")]
    Unreadable {
        /// Path of the source, or a placeholder for in-memory streams
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The ESPS header never reached its `#` separator line
    #[error("ESPS header separator line '#' not found")]
    MissingHeaderSeparator,

    /// A format-specific structural marker or value was malformed
    #[error("Failed to parse {format} input at line {line}: {message}")]
    Parse {
        /// Format being parsed
        format: LabelFormat,
        /// 1-based line number of the offending input
        line: usize,
        /// What was wrong with it
        message: String,
    },

    /// The operation exists but has no implementation
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// A cursor-relative operation was attempted while the cursor is unset
    #[error("Tier cursor is not positioned on an interval")]
    CursorUnset,

    /// A tier index that the document does not hold
    #[error("No tier with index {0}")]
    NoSuchTier(usize),

    /// A single-tier writer was asked for several tiers
    #[error("{format} output holds a single tier, {requested} requested")]
    SingleTierFormat {
        /// Output format
        format: LabelFormat,
        /// Number of tiers that were selected
        requested: usize,
    },

    /// The operation would break the tier's invariants
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Writing the serialized output failed
    #[error("Cannot write label output {path:?}: {source}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

impl LabelError {
    pub(crate) fn parse(format: LabelFormat, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            message: message.into(),
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the label layer
    #[error("Label error: {0}")]
    Label(#[from] LabelError),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(format!("{error:#}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
