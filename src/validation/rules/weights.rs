//! Validation rules for the weight table.
use crate::cube::WeightTable;
use crate::space::{FinancingSource, LegalForm, SpaceRegistry};
use crate::validation::error::{ValidationError, ValidationErrorType};

/// Dollar weights are relative economic mass; a finite negative value is a
/// corrupt input, while NaN marks a structurally absent combination and is
/// allowed.
pub(crate) fn validate_non_negative(weights: &WeightTable) -> Option<ValidationError> {
    for (position, &w) in weights.data().iter().enumerate() {
        if w.is_finite() && w < 0.0 {
            return Some(ValidationError::new(
                ValidationErrorType::NegativeWeight,
                format!("negative weight {w} at flat position {position}"),
            ));
        }
    }
    None
}

/// Owner-occupied housing carries weight only in its own industry row and
/// its own legal-form column. Aggregation relies on this: the all-industries
/// roll-ups of the business columns iterate business industries only.
pub(crate) fn validate_ooh_placement(
    space: &SpaceRegistry,
    weights: &WeightTable,
) -> Option<ValidationError> {
    let ooh = space.ooh_industry();
    for a in 0..space.assets() {
        for f in FinancingSource::BASE {
            for l in [LegalForm::CCorp, LegalForm::PassThrough] {
                let w = weights.at(ooh, a, l, f);
                if w.is_finite() && w != 0.0 {
                    return Some(ValidationError::new(
                        ValidationErrorType::MisplacedOohWeight,
                        format!(
                            "the owner-occupied housing industry holds {l:?} weight {w} \
                             at asset {a}"
                        ),
                    ));
                }
            }
            for i in space.business_industries() {
                let w = weights.at(i, a, LegalForm::OwnerOccupiedHousing, f);
                if w.is_finite() && w != 0.0 {
                    return Some(ValidationError::new(
                        ValidationErrorType::MisplacedOohWeight,
                        format!(
                            "business industry {i} holds owner-occupied housing weight {w} \
                             at asset {a}"
                        ),
                    ));
                }
            }
        }
    }
    None
}
