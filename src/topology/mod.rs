//! Top-level module for mesh topology.
//!
//! This module provides the reference cell shapes with their sub-entity
//! pattern tables, and the [`Topology`] type deriving the full incidence
//! (vertices, edges, faces) of a mesh from its top-dimension connectivity.

pub mod cell_topology;
pub mod cell_type;

pub use cell_topology::Topology;
pub use cell_type::ReferenceCell;
