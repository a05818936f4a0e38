//! Dense 5-D storage for metric and weight values over the padded space.
mod tables;

pub use tables::{MetricTable, TableError, WeightTable};

use crate::space::{FinancingSource, LegalForm};
use serde::{Deserialize, Serialize};

/// Padded extents of the five axes, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub industries: usize,
    pub assets: usize,
    pub legal_forms: usize,
    pub financing_sources: usize,
    pub years: usize,
}

impl Shape {
    pub fn len(&self) -> usize {
        self.industries * self.assets * self.legal_forms * self.financing_sources * self.years
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat offset of a cell; the year axis is contiguous.
    #[inline(always)]
    fn offset(&self, i: usize, a: usize, l: usize, f: usize, y: usize) -> usize {
        debug_assert!(
            i < self.industries
                && a < self.assets
                && l < self.legal_forms
                && f < self.financing_sources
                && y < self.years
        );
        (((i * self.assets + a) * self.legal_forms + l) * self.financing_sources + f) * self.years
            + y
    }
}

/// An immutable 5-D array over the full padded space.
///
/// NaN encodes "not populated / not applicable"; a freshly built cube has
/// its disaggregated block populated and its aggregate slots NaN until the
/// engine fills them. Once frozen from a builder, a cube is never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    shape: Shape,
    data: Vec<f64>,
}

impl Cube {
    pub fn filled(shape: Shape, value: f64) -> Self {
        Self {
            data: vec![value; shape.len()],
            shape,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline(always)]
    pub fn at(&self, i: usize, a: usize, l: LegalForm, f: FinancingSource, y: usize) -> f64 {
        self.data[self.shape.offset(i, a, l.index(), f.index(), y)]
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

/// Write-once arena for one output cube.
///
/// Allocated NaN-filled; each roll-up writes its disjoint slice exactly
/// once, then `freeze` hands the buffer over as an immutable `Cube`.
#[derive(Debug)]
pub struct CubeBuilder {
    shape: Shape,
    data: Vec<f64>,
}

impl CubeBuilder {
    pub fn nan(shape: Shape) -> Self {
        Self {
            data: vec![f64::NAN; shape.len()],
            shape,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, a: usize, l: LegalForm, f: FinancingSource, y: usize, v: f64) {
        let offset = self.shape.offset(i, a, l.index(), f.index(), y);
        self.data[offset] = v;
    }

    #[inline(always)]
    pub fn at(&self, i: usize, a: usize, l: LegalForm, f: FinancingSource, y: usize) -> f64 {
        self.data[self.shape.offset(i, a, l.index(), f.index(), y)]
    }

    pub fn freeze(self) -> Cube {
        Cube {
            shape: self.shape,
            data: self.data,
        }
    }
}
