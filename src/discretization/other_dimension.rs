//! The "other dimension" of a cell set: thickness, cross-section area, or a
//! function of the cell's connectivity, shape-function values and nodal
//! coordinates.

use std::fmt;
use std::sync::Arc;

use nalgebra::DMatrix;

/// Signature of a position-dependent other dimension: `(conn, N, x) -> value`.
pub type OtherDimensionFn = dyn Fn(&[usize], &DMatrix<f64>, &DMatrix<f64>) -> f64 + Send + Sync;

/// Scale factor completing a lower-dimensional cell to the integration dimension.
#[derive(Clone)]
pub enum OtherDimension {
    /// Same value everywhere.
    Constant(f64),
    /// Evaluated per integration point.
    Function(Arc<OtherDimensionFn>),
}

impl OtherDimension {
    /// Wrap a closure.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[usize], &DMatrix<f64>, &DMatrix<f64>) -> f64 + Send + Sync + 'static,
    {
        OtherDimension::Function(Arc::new(f))
    }

    /// Value for cell `conn` with shape-function values `n` and nodal coordinates `x`.
    #[inline]
    pub fn evaluate(&self, conn: &[usize], n: &DMatrix<f64>, x: &DMatrix<f64>) -> f64 {
        match self {
            OtherDimension::Constant(value) => *value,
            OtherDimension::Function(f) => f(conn, n, x),
        }
    }

    /// The value if it is constant.
    pub fn as_constant(&self) -> Option<f64> {
        match self {
            OtherDimension::Constant(value) => Some(*value),
            OtherDimension::Function(_) => None,
        }
    }
}

impl Default for OtherDimension {
    fn default() -> Self {
        OtherDimension::Constant(1.0)
    }
}

impl From<f64> for OtherDimension {
    fn from(value: f64) -> Self {
        OtherDimension::Constant(value)
    }
}

impl fmt::Debug for OtherDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtherDimension::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            OtherDimension::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl PartialEq for OtherDimension {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OtherDimension::Constant(a), OtherDimension::Constant(b)) => a == b,
            (OtherDimension::Function(a), OtherDimension::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
