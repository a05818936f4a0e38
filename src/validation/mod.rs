//! Input validation run before aggregation.
mod error;
mod rules;
mod validator;

pub use error::{ValidationError, ValidationErrorType};
pub use validator::Validator;
