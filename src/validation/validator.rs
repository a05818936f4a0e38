//! The central validator that orchestrates the execution of all input rules.
use super::error::{ValidationError, ValidationErrorType};
use super::rules::{metrics, weights};
use crate::cube::{MetricTable, WeightTable};
use crate::space::SpaceRegistry;

/// The orchestrator for input validation.
///
/// Runs every rule against the weight table and the named metric tables and
/// collects all findings before any aggregation work starts, so a bad run
/// configuration surfaces every problem at once.
pub struct Validator<'a> {
    space: &'a SpaceRegistry,
}

impl<'a> Validator<'a> {
    pub fn new(space: &'a SpaceRegistry) -> Self {
        Self { space }
    }

    /// Executes all registered rules.
    ///
    /// # Returns
    /// - `Ok(())` if no validation errors are found.
    /// - `Err(Vec<ValidationError>)` containing every error discovered.
    pub fn validate(
        &self,
        weight_table: &WeightTable,
        metric_tables: &[(&str, &MetricTable)],
    ) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if weight_table.industries() != self.space.industries()
            || weight_table.assets() != self.space.assets()
        {
            errors.push(ValidationError::new(
                ValidationErrorType::ShapeMismatch,
                format!(
                    "weight table extents [{}, {}] do not match the registry [{}, {}]",
                    weight_table.industries(),
                    weight_table.assets(),
                    self.space.industries(),
                    self.space.assets(),
                ),
            ));
        } else {
            // Placement checks index by registry extents, so they only run
            // once the extents agree.
            if let Some(err) = weights::validate_ooh_placement(self.space, weight_table) {
                errors.push(err);
            }
        }
        if let Some(err) = weights::validate_non_negative(weight_table) {
            errors.push(err);
        }

        for &(name, metric) in metric_tables {
            if metric.industries() != self.space.industries()
                || metric.assets() != self.space.assets()
                || metric.years() != self.space.years()
            {
                errors.push(ValidationError::new(
                    ValidationErrorType::ShapeMismatch,
                    format!(
                        "metric '{}' extents [{}, {}, years {}] do not match the registry \
                         [{}, {}, years {}]",
                        name,
                        metric.industries(),
                        metric.assets(),
                        metric.years(),
                        self.space.industries(),
                        self.space.assets(),
                        self.space.years(),
                    ),
                ));
            }
            if let Some(err) = metrics::validate_finite(name, metric) {
                errors.push(err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
