//! Element types, shape functions and geometric cell sets.

pub mod element_type;
pub mod gcellset;
pub mod other_dimension;
pub mod quadrature;

pub use element_type::ElementType;
pub use gcellset::{CellSetId, GCellSet, GCellSetOptions};
pub use other_dimension::{OtherDimension, OtherDimensionFn};
pub use quadrature::QuadratureRule;
