//! # Application Error Types
//!
//! Errors raised by the app layer plus the unified error handed to the
//! presentation layer.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in AlbanManage                            │
//! │                                                                         │
//! │  generate_invoice(entries, today)                                      │
//! │         │                                                               │
//! │         ├── CoreError::InvalidInput ───────────┐                        │
//! │         ├── CoreError::DocumentBuildFailed ────┤                        │
//! │         ├── StorageError (write failed) ───────┼──► ApiError {code, msg}│
//! │         ├── DbError (history insert) ──────────┤                        │
//! │         └── ConfigError (startup) ─────────────┘                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried; every failure is reported once to the caller.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use alban_core::CoreError;
use alban_db::DbError;

// =============================================================================
// Storage Errors
// =============================================================================

/// Document store failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file does not exist.
    #[error("Document not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The path resolves outside the store directory.
    #[error("Path is outside the document store: {}", .0.display())]
    OutsideStore(PathBuf),

    /// The requested base name cannot form a file name.
    #[error("Invalid document name: '{0}'")]
    InvalidName(String),

    /// Underlying file system error (permissions, disk full, ...).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration load/save/validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    #[error("Failed to save config: {0}")]
    SaveFailed(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// API Error
// =============================================================================

/// Error returned from every service operation.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "HistoryRecord not found: 6f1c..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// The invoice could not be rendered
    DocumentError,

    /// Reading or writing a stored document failed
    StorageError,

    /// Database operation failed
    DatabaseError,

    /// Configuration could not be loaded or is invalid
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::CorruptData { column, value } => {
                tracing::error!(%column, %value, "Corrupt database value");
                ApiError::new(ErrorCode::DatabaseError, "Stored data is corrupt")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput { .. } => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
            CoreError::DocumentBuildFailed { reason } => {
                tracing::error!(%reason, "Invoice document build failed");
                ApiError::new(
                    ErrorCode::DocumentError,
                    format!("Could not build the invoice: {}", reason),
                )
            }
        }
    }
}

/// Converts storage errors to API errors.
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) => {
                ApiError::not_found("Document", &path.display().to_string())
            }
            StorageError::OutsideStore(_) | StorageError::InvalidName(_) => {
                ApiError::validation(err.to_string())
            }
            StorageError::Io(e) => {
                tracing::error!("Document storage failed: {}", e);
                ApiError::new(ErrorCode::StorageError, format!("Document storage failed: {}", e))
            }
        }
    }
}

/// Converts configuration errors to API errors.
impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
