//! Input contracts with the upstream collaborators.
//!
//! Metric tables come from the rate-computation pipeline and cover the
//! disaggregated space only; the weight table comes from the weight provider
//! and covers the full legal-form/financing enumeration at disaggregated
//! industry/asset positions. Both convert into full-width cubes for the
//! engine.
use crate::cube::{Cube, CubeBuilder};
use crate::space::{FinancingSource, LegalForm, SpaceRegistry};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("table data length {got} does not match extents {expected}")]
    LengthMismatch { expected: usize, got: usize },
    #[error(
        "table extents [{industries}, {assets}, years {years}] do not match the registry \
         [{reg_industries}, {reg_assets}, years {reg_years}]"
    )]
    RegistryMismatch {
        industries: usize,
        assets: usize,
        years: usize,
        reg_industries: usize,
        reg_assets: usize,
        reg_years: usize,
    },
}

/// A disaggregated metric from the upstream pipeline:
/// [industries, assets, 3 for-profit legal forms, 4 base financing columns,
/// years], fully populated.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    industries: usize,
    assets: usize,
    years: usize,
    data: Vec<f64>,
}

const METRIC_FORMS: usize = LegalForm::FOR_PROFIT.len();
const METRIC_FINANCING: usize = FinancingSource::BASE.len();

impl MetricTable {
    /// NaN-filled table; producers overwrite every cell.
    pub fn nan(industries: usize, assets: usize, years: usize) -> Self {
        Self {
            data: vec![f64::NAN; industries * assets * METRIC_FORMS * METRIC_FINANCING * years],
            industries,
            assets,
            years,
        }
    }

    pub fn from_raw(
        industries: usize,
        assets: usize,
        years: usize,
        data: Vec<f64>,
    ) -> Result<Self, TableError> {
        let expected = industries * assets * METRIC_FORMS * METRIC_FINANCING * years;
        if data.len() != expected {
            return Err(TableError::LengthMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            industries,
            assets,
            years,
            data,
        })
    }

    pub fn industries(&self) -> usize {
        self.industries
    }

    pub fn assets(&self) -> usize {
        self.assets
    }

    pub fn years(&self) -> usize {
        self.years
    }

    #[inline(always)]
    fn offset(&self, i: usize, a: usize, l: LegalForm, f: FinancingSource, y: usize) -> usize {
        let l = l.index();
        let f = f.index();
        assert!(
            l < METRIC_FORMS && f < METRIC_FINANCING,
            "metric tables carry only for-profit forms and base financing columns"
        );
        (((i * self.assets + a) * METRIC_FORMS + l) * METRIC_FINANCING + f) * self.years + y
    }

    pub fn at(&self, i: usize, a: usize, l: LegalForm, f: FinancingSource, y: usize) -> f64 {
        self.data[self.offset(i, a, l, f, y)]
    }

    pub fn set(&mut self, i: usize, a: usize, l: LegalForm, f: FinancingSource, y: usize, v: f64) {
        let offset = self.offset(i, a, l, f, y);
        self.data[offset] = v;
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Lift into the full padded space: disaggregated block populated,
    /// everything else NaN for the engine to fill.
    pub fn to_cube(&self, space: &SpaceRegistry) -> Result<Cube, TableError> {
        check_extents(space, self.industries, self.assets, self.years)?;
        let mut out = CubeBuilder::nan(space.shape());
        for i in 0..self.industries {
            for a in 0..self.assets {
                for l in LegalForm::FOR_PROFIT {
                    for f in FinancingSource::BASE {
                        for y in 0..self.years {
                            out.set(i, a, l, f, y, self.at(i, a, l, f, y));
                        }
                    }
                }
            }
        }
        Ok(out.freeze())
    }
}

/// Dollar weights from the weight provider: [industries, assets, 6 legal
/// forms, 6 financing sources], non-negative, constant across years.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    industries: usize,
    assets: usize,
    data: Vec<f64>,
}

impl WeightTable {
    pub fn nan(industries: usize, assets: usize) -> Self {
        Self {
            data: vec![f64::NAN; industries * assets * LegalForm::COUNT * FinancingSource::COUNT],
            industries,
            assets,
        }
    }

    pub fn from_raw(industries: usize, assets: usize, data: Vec<f64>) -> Result<Self, TableError> {
        let expected = industries * assets * LegalForm::COUNT * FinancingSource::COUNT;
        if data.len() != expected {
            return Err(TableError::LengthMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            industries,
            assets,
            data,
        })
    }

    pub fn industries(&self) -> usize {
        self.industries
    }

    pub fn assets(&self) -> usize {
        self.assets
    }

    #[inline(always)]
    fn offset(&self, i: usize, a: usize, l: LegalForm, f: FinancingSource) -> usize {
        ((i * self.assets + a) * LegalForm::COUNT + l.index()) * FinancingSource::COUNT + f.index()
    }

    pub fn at(&self, i: usize, a: usize, l: LegalForm, f: FinancingSource) -> f64 {
        self.data[self.offset(i, a, l, f)]
    }

    pub fn set(&mut self, i: usize, a: usize, l: LegalForm, f: FinancingSource, v: f64) {
        let offset = self.offset(i, a, l, f);
        self.data[offset] = v;
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Lift into the full padded space, repeating the weights across the
    /// registry's years. Aggregate slots stay NaN until the engine sums them.
    pub fn broadcast_years(&self, space: &SpaceRegistry) -> Result<Cube, TableError> {
        check_extents(space, self.industries, self.assets, space.years())?;
        let mut out = CubeBuilder::nan(space.shape());
        for i in 0..self.industries {
            for a in 0..self.assets {
                for l in LegalForm::ALL {
                    for f in FinancingSource::ALL {
                        let w = self.at(i, a, l, f);
                        for y in 0..space.years() {
                            out.set(i, a, l, f, y, w);
                        }
                    }
                }
            }
        }
        Ok(out.freeze())
    }
}

fn check_extents(
    space: &SpaceRegistry,
    industries: usize,
    assets: usize,
    years: usize,
) -> Result<(), TableError> {
    if industries != space.industries() || assets != space.assets() || years != space.years() {
        return Err(TableError::RegistryMismatch {
            industries,
            assets,
            years,
            reg_industries: space.industries(),
            reg_assets: space.assets(),
            reg_years: space.years(),
        });
    }
    Ok(())
}
