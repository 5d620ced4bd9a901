//! Data module: nodal fields, boundary conditions and equation numbering
#![warn(missing_docs)]

pub mod bc;
pub mod field;
pub mod numbering;

pub use bc::{EssentialBc, apply_essential_bcs};
pub use field::{Field, FieldOptions, Operand};
pub use numbering::{EquationNumbers, Numbering};
