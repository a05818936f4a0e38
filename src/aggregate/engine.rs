use crate::aggregate::{by_asset_group, by_asset_type};
use crate::cube::{Cube, CubeBuilder, Shape};
use crate::space::{FinancingSource, LegalForm, Perspective, SpaceRegistry};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("input shape {got:?} does not match the registry shape {expected:?}")]
    ShapeMismatch { expected: Shape, got: Shape },
}

/// The aggregation engine: fills every aggregate slot of a metric cube.
///
/// Borrows the space registry and carries the run-level perspective; each
/// `aggregate` call is independent and reads nothing but its arguments.
pub struct Aggregator<'a> {
    space: &'a SpaceRegistry,
    perspective: Perspective,
}

impl<'a> Aggregator<'a> {
    pub fn new(space: &'a SpaceRegistry, perspective: Perspective) -> Self {
        Self { space, perspective }
    }

    pub fn space(&self) -> &SpaceRegistry {
        self.space
    }

    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    /// Fill every aggregate position of `metric`.
    ///
    /// With `weights` present, they must be a previously aggregated weight
    /// cube of identical shape: its aggregate slots are the denominators.
    /// Without `weights` the metric is taken to be the weight cube itself
    /// and is rolled up by plain summation, under either perspective.
    /// Disaggregated positions pass through unchanged.
    pub fn aggregate(&self, metric: &Cube, weights: Option<&Cube>) -> Result<Cube, AggregateError> {
        let shape = self.space.shape();
        if metric.shape() != shape {
            return Err(AggregateError::ShapeMismatch {
                expected: shape,
                got: metric.shape(),
            });
        }
        match weights {
            None => {
                // Weight aggregation: unit weights make every weighted mean
                // a sum, and aggregate-slot denominators are one.
                let ones = Cube::filled(shape, 1.0);
                Ok(self.run_stages(metric, &ones, Perspective::Comprehensive))
            }
            Some(weights) => {
                if weights.shape() != shape {
                    return Err(AggregateError::ShapeMismatch {
                        expected: shape,
                        got: weights.shape(),
                    });
                }
                Ok(self.run_stages(metric, weights, self.perspective))
            }
        }
    }

    fn run_stages(&self, var: &Cube, weights: &Cube, perspective: Perspective) -> Cube {
        let (by_type, by_group) = match perspective {
            Perspective::Comprehensive => (
                by_asset_type::comprehensive(self.space, var, weights),
                by_asset_group::comprehensive(self.space, var, weights),
            ),
            Perspective::Uniformity => (
                by_asset_type::uniformity(self.space, var, weights),
                by_asset_group::uniformity(self.space, var, weights),
            ),
        };
        merge(self.space, &by_type, &by_group)
    }
}

/// Assemble the final cube from the two stage results.
///
/// The asset axis partitions the work: disaggregated asset positions come
/// from the by-asset-type stage (which also carries the pass-through block),
/// aggregate slots from the by-asset-group stage. Every output position is
/// written exactly once.
pub fn merge(space: &SpaceRegistry, by_type: &Cube, by_group: &Cube) -> Cube {
    let shape = space.shape();
    let mut out = CubeBuilder::nan(shape);
    for i in 0..shape.industries {
        for a in 0..shape.assets {
            let source = if a < space.assets() { by_type } else { by_group };
            for l in LegalForm::ALL {
                for f in FinancingSource::ALL {
                    for y in 0..shape.years {
                        out.set(i, a, l, f, y, source.at(i, a, l, f, y));
                    }
                }
            }
        }
    }
    out.freeze()
}
