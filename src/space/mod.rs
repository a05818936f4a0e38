//! The four categorical dimensions and their roll-up structure.
mod registry;
mod types;

pub use registry::{
    AssetGroup, OohCoverage, SpaceError, SpaceRegistry, StandardAssetLayout,
};
pub use types::{
    FinancingSource, LegalForm, Perspective, RollupPass, UnknownPerspective, ROLLUP_PASSES,
};
