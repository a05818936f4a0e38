//! Defines the error types for the validation module.
use thiserror::Error;

/// The specific category of a validation error.
///
// This enum allows for programmatic inspection of errors, which is more
// robust than string matching on the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorType {
    /// A table's extents disagree with the registry.
    ShapeMismatch,
    /// A finite negative value in the weight table.
    NegativeWeight,
    /// A NaN or infinity at a disaggregated metric position.
    NonFiniteMetric,
    /// Weight mass placed where the OOH exclusion forbids it.
    MisplacedOohWeight,
}

/// A structured error report from the input validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// The category of the error.
    pub error_type: ValidationErrorType,
    /// A human-readable message explaining the error.
    pub message: String,
}

impl ValidationError {
    pub fn new(error_type: ValidationErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
        }
    }
}
