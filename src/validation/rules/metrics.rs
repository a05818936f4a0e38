//! Validation rule for upstream metric tables.
use crate::cube::MetricTable;
use crate::validation::error::{ValidationError, ValidationErrorType};

/// Upstream metrics must be fully populated at disaggregated positions:
/// a stray NaN would poison every aggregate its cell feeds into.
pub(crate) fn validate_finite(name: &str, metric: &MetricTable) -> Option<ValidationError> {
    for (position, &v) in metric.data().iter().enumerate() {
        if !v.is_finite() {
            return Some(ValidationError::new(
                ValidationErrorType::NonFiniteMetric,
                format!("metric '{name}' holds non-finite value {v} at flat position {position}"),
            ));
        }
    }
    None
}
