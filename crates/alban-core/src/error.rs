//! # Error Types
//!
//! Domain-specific error types for alban-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  alban-core errors (this file)                                         │
//! │  ├── CoreError        - InvalidInput, DocumentBuildFailed              │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  alban-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  alban-app errors                                                      │
//! │  ├── StorageError     - Document file failures                         │
//! │  └── ApiError         - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Presentation           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both core failures abort the whole operation. There is no partial
//! document and no partially-applied entry list.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A product entry failed validation before reaching the totals engine.
    ///
    /// ## When This Occurs
    /// - Negative or non-numeric quantity typed into a form
    /// - Empty product name
    /// - Pack size of zero
    #[error("Invalid input for {entry}: {source}")]
    InvalidInput {
        entry: String,
        #[source]
        source: ValidationError,
    },

    /// The invoice document could not be produced.
    ///
    /// ## When This Occurs
    /// - The document surface could not allocate a page
    /// - Serializing the finished pages to bytes failed
    ///
    /// Pages already started are discarded with the surface; no bytes are
    /// ever returned alongside this error.
    #[error("Document build failed: {reason}")]
    DocumentBuildFailed { reason: String },

    /// Validation error not tied to a particular entry.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidInput error for the named entry.
    pub fn invalid_input(entry: impl Into<String>, source: ValidationError) -> Self {
        CoreError::InvalidInput {
            entry: entry.into(),
            source,
        }
    }

    /// Creates a DocumentBuildFailed error.
    pub fn build_failed(reason: impl Into<String>) -> Self {
        CoreError::DocumentBuildFailed {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: String, value: i64 },

    /// Value does not fit the quantity range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., a price with three decimals).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::invalid_input(
            "Milk",
            ValidationError::Negative {
                field: "expired".to_string(),
                value: -3,
            },
        );
        assert_eq!(
            err.to_string(),
            "Invalid input for Milk: expired must not be negative, got -3"
        );

        let err = CoreError::build_failed("page allocation failed");
        assert_eq!(err.to_string(), "Document build failed: page allocation failed");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
