//! Error types for the custsync pipeline.
//!
//! - [`FieldError`] - a single value that failed coercion, with its position
//! - [`CsvError`] - fatal parsing errors (unreadable file, bad encoding, bad value)
//! - [`PipelineError`] - orchestration errors surfaced to the CLI and the API
//! - [`ServerError`] - HTTP server errors
//! - [`LoggingError`] - log file setup errors
//!
//! Rows that are merely incomplete are not errors: the parser skips them and
//! reports them as [`crate::parser::SkippedRow`].

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Field Errors
// =============================================================================

/// A value that passed the presence checks but could not be coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub line: u64,
    pub column: Option<String>,
    pub value: Option<String>,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.column, &self.value) {
            (Some(col), Some(val)) => {
                write!(f, "Line {}, column '{}' (value '{}'): {}", self.line, col, val, self.message)
            }
            (Some(col), None) => {
                write!(f, "Line {}, column '{}': {}", self.line, col, self.message)
            }
            _ => {
                write!(f, "Line {}: {}", self.line, self.message)
            }
        }
    }
}

impl std::error::Error for FieldError {}

impl FieldError {
    pub fn new(line: u64, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            value: None,
            message: message.into(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Fatal errors during CSV parsing. No partial result is returned with these.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The file could not be opened or read.
    #[error("Cannot read file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes could not be decoded to text.
    #[error("Failed to decode file: {0}")]
    Encoding(String),

    /// The reader itself rejected the input.
    #[error("Invalid CSV format: {0}")]
    Malformed(#[from] csv::Error),

    /// A complete row held a value of the wrong type.
    #[error("Invalid purchase row: {0}")]
    InvalidField(#[from] FieldError),
}

impl CsvError {
    /// Short tag for the failure family: `"io"` or `"format"`.
    pub fn kind(&self) -> &'static str {
        match self {
            CsvError::Io { .. } => "io",
            CsvError::Encoding(_) | CsvError::Malformed(_) | CsvError::InvalidField(_) => "format",
        }
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Errors raised by the parse and format steps of a pipeline run.
///
/// The transport step has no variant here: it always yields a
/// [`crate::client::TransmissionResult`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Formatted documents could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A blocking file step panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A request handler hit a pipeline failure.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Binding or serving failed.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Logging Errors
// =============================================================================

/// Errors while installing the log file subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
