//! Aggregation core for the capital-taxation simulation model.
//!
//! Given disaggregated per-cell metrics over the four-dimensional space
//! [industry, asset type, legal form, financing source] (per simulated
//! year) and a matching array of dollar weights, the engine fills every
//! aggregate slot: the all-industries row, the named asset-group slots, and
//! the legal-form/financing roll-up lattice, under either the comprehensive
//! or the tax-uniformity weighting perspective.
//!
//! The crate performs no I/O: upstream collaborators produce the weight and
//! metric tables, downstream collaborators consume the aggregated cubes.
pub mod aggregate;
pub mod config;
pub mod cube;
pub mod space;
pub mod validation;

pub use aggregate::{merge, AggregateError, Aggregator, RunAggregates, RunError, RunInputs};
pub use config::{ConfigError, RunConfig};
pub use cube::{Cube, CubeBuilder, MetricTable, Shape, TableError, WeightTable};
pub use space::{
    AssetGroup, FinancingSource, LegalForm, OohCoverage, Perspective, SpaceRegistry,
    StandardAssetLayout,
};
pub use validation::{ValidationError, ValidationErrorType, Validator};
