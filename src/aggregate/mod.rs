//! The aggregation engine and its run driver.
mod by_asset_group;
mod by_asset_type;
mod engine;
mod kernel;
mod run;

pub use engine::{merge, AggregateError, Aggregator};
pub use kernel::weight_power;
pub use run::{RunAggregates, RunError, RunInputs};
