//! Element types and their Lagrange shape functions.
//!
//! Parametric coordinates live on the reference hypercube `[-1, 1]^d`.
//! Shape-function values come back as an `n x 1` column and parametric
//! derivatives as an `n x d` matrix (row per node, column per parametric
//! direction), matching the layout the Jacobian calculus multiplies with.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshError;
use crate::topology::cell_type::ReferenceCell;

/// Corner coordinates of the hexahedron on `[-1, 1]^3`.
const H8_CORNERS: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Supported element shapes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum ElementType {
    /// Single-node point cell.
    P1,
    /// Two-node line.
    L2,
    /// Four-node bilinear quadrilateral.
    Q4,
    /// Eight-node trilinear hexahedron.
    H8,
}

impl ElementType {
    /// Manifold (parametric) dimension.
    pub fn dim(self) -> usize {
        self.reference_cell().dimension()
    }

    /// Nodes per cell.
    pub fn cell_size(self) -> usize {
        self.reference_cell().vertex_count()
    }

    /// Reference shape of the cells.
    pub fn reference_cell(self) -> ReferenceCell {
        match self {
            ElementType::P1 => ReferenceCell::Point,
            ElementType::L2 => ReferenceCell::Interval,
            ElementType::Q4 => ReferenceCell::Quadrilateral,
            ElementType::H8 => ReferenceCell::Hexahedron,
        }
    }

    /// Element type of the boundary cells, if the type has a boundary.
    pub fn boundary_type(self) -> Option<ElementType> {
        match self {
            ElementType::P1 => None,
            ElementType::L2 => Some(ElementType::P1),
            ElementType::Q4 => Some(ElementType::L2),
            ElementType::H8 => Some(ElementType::Q4),
        }
    }

    /// Parametric coordinates of the cell centre.
    pub fn parametric_centroid(self) -> Vec<f64> {
        vec![0.0; self.dim()]
    }

    /// Shape-function values at `param`, as an `n x 1` matrix.
    ///
    /// # Errors
    /// `InvalidInput` if `param.len() != self.dim()`.
    pub fn bfun(self, param: &[f64]) -> Result<DMatrix<f64>, MeshError> {
        self.check_param(param)?;
        let values = match self {
            ElementType::P1 => vec![1.0],
            ElementType::L2 => {
                let xi = param[0];
                vec![0.5 * (1.0 - xi), 0.5 * (1.0 + xi)]
            }
            ElementType::Q4 => {
                let (xi, eta) = (param[0], param[1]);
                vec![
                    0.25 * (1.0 - xi) * (1.0 - eta),
                    0.25 * (1.0 + xi) * (1.0 - eta),
                    0.25 * (1.0 + xi) * (1.0 + eta),
                    0.25 * (1.0 - xi) * (1.0 + eta),
                ]
            }
            ElementType::H8 => H8_CORNERS
                .iter()
                .map(|c| {
                    0.125
                        * (1.0 + c[0] * param[0])
                        * (1.0 + c[1] * param[1])
                        * (1.0 + c[2] * param[2])
                })
                .collect(),
        };
        Ok(DMatrix::from_column_slice(values.len(), 1, &values))
    }

    /// Parametric derivatives of the shape functions at `param`, `n x dim`.
    ///
    /// # Errors
    /// `InvalidInput` if `param.len() != self.dim()`.
    pub fn bfundpar(self, param: &[f64]) -> Result<DMatrix<f64>, MeshError> {
        self.check_param(param)?;
        let out = match self {
            ElementType::P1 => DMatrix::zeros(1, 0),
            ElementType::L2 => DMatrix::from_row_slice(2, 1, &[-0.5, 0.5]),
            ElementType::Q4 => {
                let (xi, eta) = (param[0], param[1]);
                DMatrix::from_row_slice(
                    4,
                    2,
                    &[
                        -0.25 * (1.0 - eta),
                        -0.25 * (1.0 - xi),
                        0.25 * (1.0 - eta),
                        -0.25 * (1.0 + xi),
                        0.25 * (1.0 + eta),
                        0.25 * (1.0 + xi),
                        -0.25 * (1.0 + eta),
                        0.25 * (1.0 - xi),
                    ],
                )
            }
            ElementType::H8 => {
                let mut out = DMatrix::zeros(8, 3);
                for (node, c) in H8_CORNERS.iter().enumerate() {
                    let f = [
                        1.0 + c[0] * param[0],
                        1.0 + c[1] * param[1],
                        1.0 + c[2] * param[2],
                    ];
                    out[(node, 0)] = 0.125 * c[0] * f[1] * f[2];
                    out[(node, 1)] = 0.125 * c[1] * f[0] * f[2];
                    out[(node, 2)] = 0.125 * c[2] * f[0] * f[1];
                }
                out
            }
        };
        Ok(out)
    }

    fn check_param(self, param: &[f64]) -> Result<(), MeshError> {
        if param.len() != self.dim() {
            return Err(MeshError::InvalidInput(format!(
                "{self:?} expects {} parametric coordinates, got {}",
                self.dim(),
                param.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn l2_values_at_midpoint() {
        let n = ElementType::L2.bfun(&[0.0]).unwrap();
        assert_eq!(n.shape(), (2, 1));
        assert_relative_eq!(n[(0, 0)], 0.5);
        assert_relative_eq!(n[(1, 0)], 0.5);
    }

    #[test]
    fn q4_is_nodal() {
        let corners = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
        for (i, c) in corners.iter().enumerate() {
            let n = ElementType::Q4.bfun(c).unwrap();
            for j in 0..4 {
                assert_relative_eq!(n[(j, 0)], if i == j { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn h8_is_nodal_and_derivatives_sum_to_zero() {
        for (i, c) in H8_CORNERS.iter().enumerate() {
            let n = ElementType::H8.bfun(c).unwrap();
            assert_relative_eq!(n[(i, 0)], 1.0);
            assert_relative_eq!(n.sum(), 1.0);
        }
        let d = ElementType::H8.bfundpar(&[0.3, -0.2, 0.7]).unwrap();
        for col in 0..3 {
            assert_relative_eq!(d.column(col).sum(), 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn wrong_parametric_length_is_rejected() {
        assert!(matches!(
            ElementType::Q4.bfun(&[0.0]),
            Err(MeshError::InvalidInput(_))
        ));
        assert!(ElementType::L2.bfundpar(&[0.0, 0.0]).is_err());
        assert_eq!(ElementType::P1.bfun(&[]).unwrap()[(0, 0)], 1.0);
    }

    #[test]
    fn boundary_chain() {
        assert_eq!(ElementType::H8.boundary_type(), Some(ElementType::Q4));
        assert_eq!(ElementType::Q4.boundary_type(), Some(ElementType::L2));
        assert_eq!(ElementType::L2.boundary_type(), Some(ElementType::P1));
        assert_eq!(ElementType::P1.boundary_type(), None);
    }
}
