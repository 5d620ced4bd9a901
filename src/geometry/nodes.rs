//! Node coordinates consumed by cell sets and fields.
//!
//! The kernel only needs a node count, an embedding dimension and per-node
//! coordinates; [`NodeSet`] is that narrow interface. [`Nodes`] is the plain
//! row-major container used by tests and callers without their own storage.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshError;

/// Read-only provider of node coordinates.
pub trait NodeSet {
    /// Number of nodes.
    fn count(&self) -> usize;

    /// Embedding dimension (coordinates per node).
    fn dim(&self) -> usize;

    /// Coordinates of node `index`.
    fn xyz_at(&self, index: usize) -> Result<&[f64], MeshError>;

    /// Coordinates of the nodes in `conn`, one row per node.
    fn gather(&self, conn: &[usize]) -> Result<DMatrix<f64>, MeshError> {
        let mut x = DMatrix::zeros(conn.len(), self.dim());
        for (row, &node) in conn.iter().enumerate() {
            for (col, value) in self.xyz_at(node)?.iter().enumerate() {
                x[(row, col)] = *value;
            }
        }
        Ok(x)
    }
}

/// Row-major node coordinate storage with a fixed embedding dimension.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodesRecord")]
pub struct Nodes {
    dim: usize,
    xyz: Vec<f64>,
}

/// Unvalidated serialized form of [`Nodes`].
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NodesRecord {
    dim: usize,
    xyz: Vec<f64>,
}

impl TryFrom<NodesRecord> for Nodes {
    type Error = MeshError;

    fn try_from(record: NodesRecord) -> Result<Self, Self::Error> {
        Nodes::from_flat(record.dim, record.xyz)
    }
}

impl Nodes {
    /// Construct from one coordinate row per node.
    ///
    /// # Errors
    /// `InvalidInput` if `dim == 0`; `DimensionMismatch` if a row is not
    /// `dim` long.
    pub fn try_new(dim: usize, rows: &[Vec<f64>]) -> Result<Self, MeshError> {
        if dim == 0 {
            return Err(MeshError::InvalidInput(
                "node embedding dimension must be positive".into(),
            ));
        }
        let mut xyz = Vec::with_capacity(rows.len() * dim);
        for row in rows {
            if row.len() != dim {
                return Err(MeshError::mismatch("node coordinates", dim, row.len()));
            }
            xyz.extend_from_slice(row);
        }
        Ok(Self { dim, xyz })
    }

    /// Construct from row-major coordinates, `dim` per node.
    ///
    /// # Errors
    /// `InvalidInput` if `dim == 0` or `xyz.len()` is not a multiple of `dim`.
    pub fn from_flat(dim: usize, xyz: Vec<f64>) -> Result<Self, MeshError> {
        if dim == 0 {
            return Err(MeshError::InvalidInput(
                "node embedding dimension must be positive".into(),
            ));
        }
        if xyz.len() % dim != 0 {
            return Err(MeshError::InvalidInput(format!(
                "{} coordinates do not split into nodes of dimension {dim}",
                xyz.len()
            )));
        }
        Ok(Self { dim, xyz })
    }

    /// Indices of the nodes inside an axis-aligned box.
    ///
    /// `bounds` holds `[min, max]` pairs per dimension; the box is grown by
    /// `inflate` on every side.
    pub fn box_select(&self, bounds: &[f64], inflate: f64) -> Result<Vec<usize>, MeshError> {
        if bounds.len() != 2 * self.dim {
            return Err(MeshError::mismatch("box bounds", 2 * self.dim, bounds.len()));
        }
        Ok(self
            .xyz
            .chunks_exact(self.dim)
            .enumerate()
            .filter(|(_, xyz)| {
                xyz.iter().zip(bounds.chunks_exact(2)).all(|(&x, b)| {
                    x >= b[0] - inflate && x <= b[1] + inflate
                })
            })
            .map(|(i, _)| i)
            .collect())
    }
}

impl NodeSet for Nodes {
    #[inline]
    fn count(&self) -> usize {
        self.xyz.len() / self.dim
    }

    #[inline]
    fn dim(&self) -> usize {
        self.dim
    }

    fn xyz_at(&self, index: usize) -> Result<&[f64], MeshError> {
        index
            .checked_mul(self.dim)
            .and_then(|start| self.xyz.get(start..start + self.dim))
            .ok_or_else(|| MeshError::out_of_range("node", index, self.count()))
    }
}
