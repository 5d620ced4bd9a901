//! Reference cell shapes and their sub-entity patterns.
//!
//! Every shape lists, per dimension, the local vertex tuples of its
//! sub-entities. Topology derivation walks these tables instead of
//! special-casing dimensions, so adding a shape means adding a table.
//!
//! Local vertex ordering follows the tensor-product convention on `[-1, 1]^d`:
//! - Interval: `[v0, v1]`.
//! - Quadrilateral: counter-clockwise `[v0, v1, v2, v3]`.
//! - Hexahedron: bottom quad `[v0..v3]`, then top quad `[v4..v7]` above it.

use serde::{Deserialize, Serialize};

/// Hypercube reference shapes used by the cell sets.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum ReferenceCell {
    /// 0D vertex.
    #[default]
    Point,
    /// 1D segment.
    Interval,
    /// 2D tensor-product cell.
    Quadrilateral,
    /// 3D tensor-product cell.
    Hexahedron,
}

const POINT_VERTICES: [&[usize]; 1] = [&[0]];

const INTERVAL_VERTICES: [&[usize]; 2] = [&[0], &[1]];
const INTERVAL_CELL: [&[usize]; 1] = [&[0, 1]];

const QUAD_VERTICES: [&[usize]; 4] = [&[0], &[1], &[2], &[3]];
const QUAD_EDGES: [&[usize]; 4] = [&[0, 1], &[1, 2], &[2, 3], &[3, 0]];
const QUAD_CELL: [&[usize]; 1] = [&[0, 1, 2, 3]];

const HEX_VERTICES: [&[usize]; 8] = [&[0], &[1], &[2], &[3], &[4], &[5], &[6], &[7]];
const HEX_EDGES: [&[usize]; 12] = [
    &[0, 1],
    &[1, 2],
    &[2, 3],
    &[3, 0],
    &[4, 5],
    &[5, 6],
    &[6, 7],
    &[7, 4],
    &[0, 4],
    &[1, 5],
    &[2, 6],
    &[3, 7],
];
// Outward-oriented faces.
const HEX_FACES: [&[usize]; 6] = [
    &[0, 3, 2, 1],
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[3, 0, 4, 7],
    &[4, 5, 6, 7],
];
const HEX_CELL: [&[usize]; 1] = [&[0, 1, 2, 3, 4, 5, 6, 7]];

impl ReferenceCell {
    /// The hypercube shape of topological dimension `dim`, if one exists.
    pub fn hypercube(dim: usize) -> Option<Self> {
        match dim {
            0 => Some(ReferenceCell::Point),
            1 => Some(ReferenceCell::Interval),
            2 => Some(ReferenceCell::Quadrilateral),
            3 => Some(ReferenceCell::Hexahedron),
            _ => None,
        }
    }

    /// Topological dimension of the shape.
    pub fn dimension(self) -> usize {
        match self {
            ReferenceCell::Point => 0,
            ReferenceCell::Interval => 1,
            ReferenceCell::Quadrilateral => 2,
            ReferenceCell::Hexahedron => 3,
        }
    }

    /// Number of vertices of the shape.
    pub fn vertex_count(self) -> usize {
        match self {
            ReferenceCell::Point => 1,
            ReferenceCell::Interval => 2,
            ReferenceCell::Quadrilateral => 4,
            ReferenceCell::Hexahedron => 8,
        }
    }

    /// Local vertex tuples of the sub-entities of dimension `dim`.
    ///
    /// Returns an empty slice when `dim` exceeds the shape's dimension.
    pub fn sub_entities(self, dim: usize) -> &'static [&'static [usize]] {
        match (self, dim) {
            (ReferenceCell::Point, 0) => &POINT_VERTICES,
            (ReferenceCell::Interval, 0) => &INTERVAL_VERTICES,
            (ReferenceCell::Interval, 1) => &INTERVAL_CELL,
            (ReferenceCell::Quadrilateral, 0) => &QUAD_VERTICES,
            (ReferenceCell::Quadrilateral, 1) => &QUAD_EDGES,
            (ReferenceCell::Quadrilateral, 2) => &QUAD_CELL,
            (ReferenceCell::Hexahedron, 0) => &HEX_VERTICES,
            (ReferenceCell::Hexahedron, 1) => &HEX_EDGES,
            (ReferenceCell::Hexahedron, 2) => &HEX_FACES,
            (ReferenceCell::Hexahedron, 3) => &HEX_CELL,
            _ => &[],
        }
    }

    /// Shape of the sub-entities of dimension `dim`.
    pub fn sub_entity_shape(self, dim: usize) -> Option<ReferenceCell> {
        if dim > self.dimension() {
            return None;
        }
        ReferenceCell::hypercube(dim)
    }

    /// Shape of the facets (codimension-one sub-entities), `None` for a point.
    pub fn facet_shape(self) -> Option<ReferenceCell> {
        self.dimension()
            .checked_sub(1)
            .and_then(|d| self.sub_entity_shape(d))
    }
}
