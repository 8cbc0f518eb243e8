//! # CLI Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ConfigError ─────────┐                                                │
//! │  std::io::Error ──────┤                                                │
//! │  serde_json::Error ───┼──► CliError { code, message }                  │
//! │  CoreError ───────────┘            │                                    │
//! │                                    ├── --format text ► stderr line     │
//! │                                    └── --format json ► stdout object   │
//! │                                                                         │
//! │  Exit status is 1 for every error. Nothing is retried.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use stokpro_core::CoreError;

use crate::config::ConfigError;

/// Error reported by the CLI.
///
/// ## Serialization
/// With `--format json` a failure prints:
/// ```json
/// {
///   "code": "UNSUPPORTED_UNIT",
///   "message": "carton is not available for this product"
/// }
/// ```
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct CliError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for CLI failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product or bundle missing from the snapshot
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Unit not offered by the product
    UnsupportedUnit,

    /// Sale line references neither or both items
    MalformedLineItem,

    /// Stock-out larger than stock on hand
    InsufficientStock,

    /// Quantity does not fit in 64 bits
    QuantityOverflow,

    /// Invalid environment configuration
    ConfigError,

    /// Snapshot file unreadable or not valid JSON
    SnapshotError,

    /// Invalid command-line argument combination
    InvalidArgument,
}

impl CliError {
    /// Creates a new CLI error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::InvalidArgument, message)
    }

    /// Creates a snapshot error.
    pub fn snapshot(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::SnapshotError, message)
    }
}

/// Converts core errors to CLI errors.
impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::UnsupportedUnit { .. } => ErrorCode::UnsupportedUnit,
            CoreError::MalformedLineItem { .. } => ErrorCode::MalformedLineItem,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::QuantityOverflow { .. } => ErrorCode::QuantityOverflow,
            CoreError::ProductNotFound(id) => return CliError::not_found("Product", id),
            CoreError::BundleNotFound(id) => return CliError::not_found("Bundle", id),
            CoreError::Validation(e) => return CliError::new(ErrorCode::ValidationError, e.to_string()),
        };
        CliError::new(code, err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::snapshot(format!("Failed to read snapshot: {err}"))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::snapshot(format!("Invalid snapshot JSON: {err}"))
    }
}
