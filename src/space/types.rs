use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Legal form of organization.
///
/// The first four values are base categories; `Businesses` and
/// `BusinessesPlusOoh` are roll-up categories whose cells are always computed
/// by the aggregation engine, never supplied by upstream producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegalForm {
    CCorp = 0,
    PassThrough = 1,
    OwnerOccupiedHousing = 2,
    NonProfit = 3,
    /// C corporations and pass-through entities.
    Businesses = 4,
    /// C corporations, pass-through entities, and owner-occupied housing.
    BusinessesPlusOoh = 5,
}

impl LegalForm {
    pub const COUNT: usize = 6;

    /// Every enumeration value, in axis order.
    pub const ALL: [LegalForm; 6] = [
        LegalForm::CCorp,
        LegalForm::PassThrough,
        LegalForm::OwnerOccupiedHousing,
        LegalForm::NonProfit,
        LegalForm::Businesses,
        LegalForm::BusinessesPlusOoh,
    ];

    /// The for-profit base categories carried by upstream metric arrays.
    pub const FOR_PROFIT: [LegalForm; 3] = [
        LegalForm::CCorp,
        LegalForm::PassThrough,
        LegalForm::OwnerOccupiedHousing,
    ];

    /// Decomposition of a roll-up category into its base members.
    pub fn members(self) -> Option<&'static [LegalForm]> {
        match self {
            LegalForm::Businesses => Some(&[LegalForm::CCorp, LegalForm::PassThrough]),
            LegalForm::BusinessesPlusOoh => Some(&[
                LegalForm::CCorp,
                LegalForm::PassThrough,
                LegalForm::OwnerOccupiedHousing,
            ]),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Source of financing.
///
/// `TypicalEquity` is populated upstream (a weighted mix of new equity and
/// retained earnings) and behaves as a base column here; the two `Typical*`
/// values are roll-up categories computed by the engine from the
/// equity-and-debt mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinancingSource {
    NewEquity = 0,
    RetainedEarnings = 1,
    TypicalEquity = 2,
    Debt = 3,
    /// Typical financing, businesses.
    TypicalBiz = 4,
    /// Typical financing, businesses plus owner-occupied housing.
    TypicalBizOoh = 5,
}

impl FinancingSource {
    pub const COUNT: usize = 6;

    /// Every enumeration value, in axis order.
    pub const ALL: [FinancingSource; 6] = [
        FinancingSource::NewEquity,
        FinancingSource::RetainedEarnings,
        FinancingSource::TypicalEquity,
        FinancingSource::Debt,
        FinancingSource::TypicalBiz,
        FinancingSource::TypicalBizOoh,
    ];

    /// The non-roll-up columns carried by upstream metric arrays.
    pub const BASE: [FinancingSource; 4] = [
        FinancingSource::NewEquity,
        FinancingSource::RetainedEarnings,
        FinancingSource::TypicalEquity,
        FinancingSource::Debt,
    ];

    /// The collapse set for every "typical financing" roll-up.
    pub const TYPICAL_MIX: [FinancingSource; 2] =
        [FinancingSource::TypicalEquity, FinancingSource::Debt];

    /// Decomposition of a roll-up column into the columns it averages over.
    pub fn members(self) -> Option<&'static [FinancingSource]> {
        match self {
            FinancingSource::TypicalBiz | FinancingSource::TypicalBizOoh => {
                Some(&Self::TYPICAL_MIX)
            }
            _ => None,
        }
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One pass over the legal-form / financing-source roll-up lattice.
///
/// The engine runs the lattice twice: once for the pure-business aggregates
/// and once for businesses plus owner-occupied housing. Only the second pass
/// is allowed to pull the OOH industry into industry-axis collapses.
#[derive(Debug, Clone, Copy)]
pub struct RollupPass {
    pub form_agg: LegalForm,
    pub fin_agg: FinancingSource,
    pub forms: &'static [LegalForm],
    pub spans_ooh_industry: bool,
}

pub const ROLLUP_PASSES: [RollupPass; 2] = [
    RollupPass {
        form_agg: LegalForm::Businesses,
        fin_agg: FinancingSource::TypicalBiz,
        forms: &[LegalForm::CCorp, LegalForm::PassThrough],
        spans_ooh_industry: false,
    },
    RollupPass {
        form_agg: LegalForm::BusinessesPlusOoh,
        fin_agg: FinancingSource::TypicalBizOoh,
        forms: &[
            LegalForm::CCorp,
            LegalForm::PassThrough,
            LegalForm::OwnerOccupiedHousing,
        ],
        spans_ooh_industry: true,
    },
];

/// The weighting regime for a simulation run, fixed for its whole duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    Comprehensive,
    Uniformity,
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Perspective::Comprehensive => write!(f, "comprehensive"),
            Perspective::Uniformity => write!(f, "uniformity"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown perspective '{0}', expected 'comprehensive' or 'uniformity'")]
pub struct UnknownPerspective(pub String);

impl FromStr for Perspective {
    type Err = UnknownPerspective;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comprehensive" => Ok(Perspective::Comprehensive),
            "uniformity" => Ok(Perspective::Uniformity),
            other => Err(UnknownPerspective(other.to_string())),
        }
    }
}
