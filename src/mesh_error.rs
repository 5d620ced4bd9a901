//! MeshError: Unified error type for fe-kernel public APIs
//!
//! This error type is used throughout the crate to provide non-panicking
//! error handling for topology construction, cell-set calculus and field
//! numbering. Every violated precondition is reported synchronously at the
//! call that detects it; nothing is retried or silently recovered.

use thiserror::Error;

/// Unified error type for fe-kernel operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// Malformed option record, or a vector/matrix of the wrong shape.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Connectivity rows of inconsistent length, or negative indices.
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),
    /// A node, cell or component index outside its valid range.
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// What kind of index was out of range (e.g. `"node"`, `"cell"`).
        what: &'static str,
        /// The offending index.
        index: usize,
        /// Number of valid entries.
        len: usize,
    },
    /// Sizes that are required to agree do not.
    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// What was being compared.
        what: &'static str,
        /// Expected size.
        expected: usize,
        /// Size actually found.
        found: usize,
    },
    /// A Jacobian was requested in a dimension the manifold type does not support.
    #[error("Jacobian in dimension {requested} not supported for a {manifold}-manifold cell")]
    UnsupportedDimension {
        /// Manifold dimension of the cell set.
        manifold: usize,
        /// Requested integration dimension.
        requested: usize,
    },
    /// Operation with no definition for the receiving variant.
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
    /// Numeric failure while inverting a matrix (degenerate or inverted element).
    #[error("Singular {rows}x{cols} matrix cannot be inverted")]
    SingularMatrix {
        /// Row count of the matrix.
        rows: usize,
        /// Column count of the matrix.
        cols: usize,
    },
    /// Equation numbers were requested before `number_equations` ran.
    #[error("Equation numbers requested on a field that has not been numbered")]
    EquationsNotNumbered,
}

impl MeshError {
    /// Shorthand for [`MeshError::IndexOutOfRange`].
    pub(crate) fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        MeshError::IndexOutOfRange { what, index, len }
    }

    /// Shorthand for [`MeshError::DimensionMismatch`].
    pub(crate) fn mismatch(what: &'static str, expected: usize, found: usize) -> Self {
        MeshError::DimensionMismatch {
            what,
            expected,
            found,
        }
    }
}
