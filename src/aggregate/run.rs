//! One simulation run's worth of aggregation.
//!
//! The weight cube is aggregated first since its aggregate slots are the
//! denominators for everything else; the metric cubes are then independent
//! of each other and aggregate in parallel.
use crate::aggregate::engine::{AggregateError, Aggregator};
use crate::cube::{Cube, MetricTable, TableError, WeightTable};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunError {
    #[error("bad input table: {0}")]
    Table(#[from] TableError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// The upstream products consumed by one run.
///
/// The after-tax-savers table must already be sliced to the typical account
/// category upstream; the account dimension never reaches the engine.
#[derive(Debug, Clone)]
pub struct RunInputs {
    pub weights: WeightTable,
    pub req_before_tax_returns: MetricTable,
    pub req_after_tax_returns_savers: MetricTable,
    pub req_after_tax_returns_investors: MetricTable,
}

/// The four aggregated cubes handed downstream, immutable once built.
#[derive(Debug, Clone)]
pub struct RunAggregates {
    pub weights: Cube,
    pub req_before_tax_returns: Cube,
    pub req_after_tax_returns_savers: Cube,
    pub req_after_tax_returns_investors: Cube,
}

impl Aggregator<'_> {
    /// Aggregate the weight table and the three standard metrics of a run.
    pub fn aggregate_run(&self, inputs: &RunInputs) -> Result<RunAggregates, RunError> {
        info!(perspective = %self.perspective(), "aggregating run results");

        let base_weights = inputs.weights.broadcast_years(self.space())?;
        let weights = self.aggregate(&base_weights, None)?;
        debug!("aggregated weights");

        let metrics = [
            ("req_before_tax_returns", &inputs.req_before_tax_returns),
            (
                "req_after_tax_returns_savers",
                &inputs.req_after_tax_returns_savers,
            ),
            (
                "req_after_tax_returns_investors",
                &inputs.req_after_tax_returns_investors,
            ),
        ];
        let mut aggregated: Vec<Cube> = metrics
            .into_par_iter()
            .map(|(name, table)| -> Result<Cube, RunError> {
                let cube = table.to_cube(self.space())?;
                let result = self.aggregate(&cube, Some(&weights))?;
                debug!(metric = name, "aggregated metric");
                Ok(result)
            })
            .collect::<Result<_, _>>()?;

        let req_after_tax_returns_investors = aggregated.pop().expect("three metrics in, three out");
        let req_after_tax_returns_savers = aggregated.pop().expect("three metrics in, three out");
        let req_before_tax_returns = aggregated.pop().expect("three metrics in, three out");

        info!("finished aggregating run results");
        Ok(RunAggregates {
            weights,
            req_before_tax_returns,
            req_after_tax_returns_savers,
            req_after_tax_returns_investors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::{
        AssetGroup, FinancingSource, LegalForm, Perspective, SpaceRegistry,
    };
    use crate::space::FinancingSource::{Debt, TypicalEquity};
    use crate::space::LegalForm::{CCorp, OwnerOccupiedHousing, PassThrough};

    fn space() -> SpaceRegistry {
        SpaceRegistry::new(
            3,
            4,
            1,
            vec![AssetGroup::new("all", [0, 1, 2, 3])],
            1,
            3,
            0,
        )
        .unwrap()
    }

    fn inputs(space: &SpaceRegistry) -> RunInputs {
        let mut weights = WeightTable::nan(space.industries(), space.assets());
        for i in 0..space.industries() {
            for a in 0..space.assets() {
                for l in LegalForm::FOR_PROFIT {
                    for f in FinancingSource::BASE {
                        weights.set(i, a, l, f, 0.0);
                    }
                }
            }
        }
        for i in space.business_industries() {
            for a in 0..space.assets() {
                for l in [CCorp, PassThrough] {
                    weights.set(i, a, l, TypicalEquity, 2.0 + i as f64);
                    weights.set(i, a, l, Debt, 1.0 + a as f64);
                }
            }
        }
        for a in space.ooh_assets() {
            weights.set(space.ooh_industry(), a, OwnerOccupiedHousing, TypicalEquity, 3.0);
            weights.set(space.ooh_industry(), a, OwnerOccupiedHousing, Debt, 1.0);
        }

        let metric = |offset: f64| {
            let mut m = MetricTable::nan(space.industries(), space.assets(), space.years());
            for i in 0..space.industries() {
                for a in 0..space.assets() {
                    for l in LegalForm::FOR_PROFIT {
                        for f in FinancingSource::BASE {
                            m.set(i, a, l, f, 0, offset + 0.01 * (i + a + f.index()) as f64);
                        }
                    }
                }
            }
            m
        };

        RunInputs {
            weights,
            req_before_tax_returns: metric(0.10),
            req_after_tax_returns_savers: metric(0.05),
            req_after_tax_returns_investors: metric(0.07),
        }
    }

    #[test]
    fn test_run_aggregates_all_metrics() {
        let space = space();
        let engine = Aggregator::new(&space, Perspective::Comprehensive);
        let inputs = inputs(&space);
        let out = engine.aggregate_run(&inputs).unwrap();

        // Weight aggregates are sums: check one roll-up column cell.
        assert_eq!(
            out.weights.at(0, 0, CCorp, FinancingSource::TypicalBiz, 0),
            inputs.weights.at(0, 0, CCorp, TypicalEquity) + inputs.weights.at(0, 0, CCorp, Debt),
        );

        // Disaggregated pass-through holds in every metric cube.
        for (cube, table) in [
            (&out.req_before_tax_returns, &inputs.req_before_tax_returns),
            (
                &out.req_after_tax_returns_savers,
                &inputs.req_after_tax_returns_savers,
            ),
            (
                &out.req_after_tax_returns_investors,
                &inputs.req_after_tax_returns_investors,
            ),
        ] {
            assert_eq!(cube.at(1, 2, PassThrough, Debt, 0), table.at(1, 2, PassThrough, Debt, 0));
            // And the all-industries aggregate exists.
            assert!(cube.at(space.all_industries_slot(), 0, CCorp, Debt, 0).is_finite());
        }
    }

    #[test]
    fn test_run_rejects_mismatched_tables() {
        let space = space();
        let engine = Aggregator::new(&space, Perspective::Comprehensive);
        let mut inputs = inputs(&space);
        inputs.req_before_tax_returns = MetricTable::nan(2, 4, 1);
        assert!(matches!(
            engine.aggregate_run(&inputs),
            Err(RunError::Table(_))
        ));
    }
}
