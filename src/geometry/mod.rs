//! Geometry utilities for fe-kernel.
//!
//! This module provides the node-coordinate interface consumed by cell sets
//! and fields, plus the dense linear-algebra helpers used by the Jacobian
//! calculus.

pub mod linalg;
pub mod nodes;

pub use nodes::{NodeSet, Nodes};
