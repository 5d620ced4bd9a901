#![cfg_attr(docsrs, feature(doc_cfg))]
//! # fe-kernel
//!
//! fe-kernel is the topological and geometric core of a finite-element
//! discretization: it derives cell incidence from element connectivity,
//! evaluates shape functions and the parametric-to-spatial Jacobians used for
//! numerical integration, and manages the numbering of free degrees of freedom
//! so that element contributions can be gathered and scattered against a
//! global linear system.
//!
//! ## Features
//! - [`Topology`](topology::Topology): all lower-dimensional cells of a mesh
//!   derived from its top-dimension connectivity, with boundary extraction
//! - [`GCellSet`](discretization::GCellSet): point, line, quadrilateral and
//!   hexahedral cell sets with shape functions and curve/surface/volume
//!   Jacobians, including axisymmetric and thickness factors
//! - [`Field`](data::Field): nodal values, essential boundary conditions,
//!   explicit equation numbering and gather/scatter against system vectors
//!
//! ## Determinism
//!
//! Topology derivation and equation numbering depend only on their inputs:
//! the same connectivity gives the same cells in the same order, and the same
//! prescribed table gives the same equation numbers.
//!
//! ## Usage
//!
//! ```
//! use fe_kernel::prelude::*;
//!
//! let quads = GCellSet::new(ElementType::Q4, vec![vec![0, 1, 4, 3], vec![1, 2, 5, 4]])?;
//! let edges = quads.boundary()?;
//! assert_eq!(edges.element_type(), ElementType::L2);
//! assert_eq!(edges.count(), 6);
//!
//! let mut u = Field::zeros(6, 1)?;
//! u.apply_ebcs(&[EssentialBc::new([0, 3], 0, 0.0)])?;
//! assert_eq!(u.number_equations(), 4);
//! # Ok::<(), MeshError>(())
//! ```

pub mod data;
pub mod discretization;
pub mod geometry;
pub mod mesh_error;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::data::{EssentialBc, Field, FieldOptions, Numbering, Operand};
    pub use crate::discretization::{
        CellSetId, ElementType, GCellSet, GCellSetOptions, OtherDimension, QuadratureRule,
    };
    pub use crate::geometry::{NodeSet, Nodes};
    pub use crate::mesh_error::MeshError;
    pub use crate::topology::{ReferenceCell, Topology};
}
