//! Error types for the domain layer.

use thiserror::Error;

/// Errors that occur while parsing upstream values into domain types.
///
/// These never abort processing: callers log them and skip the affected
/// schedule, and QC reports them as flags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has unrecognized value '{value}'")]
    UnrecognizedValue { field: String, value: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an unrecognized value validation error.
    pub fn unrecognized(field: impl Into<String>, value: impl Into<String>) -> Self {
        ValidationError::UnrecognizedValue {
            field: field.into(),
            value: value.into(),
        }
    }
}
