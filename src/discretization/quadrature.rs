//! Gauss-Legendre quadrature rules on the reference cells.
//!
//! Integration-rule tables are data providers; the cell sets only consume
//! `(points, weights)`. Rules on quadrilaterals and hexahedra are tensor
//! products of the 1D rule.

use crate::discretization::element_type::ElementType;
use crate::mesh_error::MeshError;

/// Quadrature rule on the reference element.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadratureRule {
    /// Name for diagnostics.
    pub name: String,
    /// Quadrature points in reference coordinates.
    pub points: Vec<Vec<f64>>,
    /// Quadrature weights.
    pub weights: Vec<f64>,
}

impl QuadratureRule {
    /// Gauss rule with `order` points per direction for `element_type`.
    ///
    /// # Errors
    /// `InvalidInput` if `order` is not 1, 2 or 3.
    pub fn gauss(element_type: ElementType, order: usize) -> Result<Self, MeshError> {
        let line = gauss_legendre_1d(order)?;
        let rule = match element_type.dim() {
            0 => QuadratureRule {
                name: "point".into(),
                points: vec![Vec::new()],
                weights: vec![1.0],
            },
            1 => line,
            2 => tensor_product(&line, &line),
            _ => tensor_product(&tensor_product(&line, &line), &line),
        };
        Ok(rule)
    }

    /// Dimension of the quadrature points.
    pub fn dimension(&self) -> usize {
        self.points.first().map(|p| p.len()).unwrap_or(0)
    }

    /// Iterate over `(point, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&[f64], f64)> {
        self.points
            .iter()
            .map(Vec::as_slice)
            .zip(self.weights.iter().copied())
    }
}

fn gauss_legendre_1d(order: usize) -> Result<QuadratureRule, MeshError> {
    let (points, weights) = match order {
        1 => (vec![vec![0.0]], vec![2.0]),
        2 => {
            let pt = 1.0_f64 / 3.0_f64.sqrt();
            (vec![vec![-pt], vec![pt]], vec![1.0, 1.0])
        }
        3 => {
            let pt = (3.0_f64 / 5.0).sqrt();
            (
                vec![vec![-pt], vec![0.0], vec![pt]],
                vec![5.0 / 9.0, 8.0 / 9.0, 5.0 / 9.0],
            )
        }
        _ => {
            return Err(MeshError::InvalidInput(format!(
                "unsupported Gauss order {order}"
            )));
        }
    };
    Ok(QuadratureRule {
        name: format!("gauss{order}"),
        points,
        weights,
    })
}

fn tensor_product(a: &QuadratureRule, b: &QuadratureRule) -> QuadratureRule {
    let mut points = Vec::with_capacity(a.points.len() * b.points.len());
    let mut weights = Vec::with_capacity(a.points.len() * b.points.len());
    for (pa, wa) in a.points.iter().zip(a.weights.iter()) {
        for (pb, wb) in b.points.iter().zip(b.weights.iter()) {
            let mut pt = Vec::with_capacity(pa.len() + pb.len());
            pt.extend_from_slice(pa);
            pt.extend_from_slice(pb);
            points.push(pt);
            weights.push(wa * wb);
        }
    }
    QuadratureRule {
        name: format!("{}x{}", a.name, b.name),
        points,
        weights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn weights_sum_to_reference_measure() {
        for order in 1..=3 {
            let hex = QuadratureRule::gauss(ElementType::H8, order).unwrap();
            assert_eq!(hex.dimension(), 3);
            assert_eq!(hex.points.len(), order * order * order);
            assert_relative_eq!(hex.weights.iter().sum::<f64>(), 8.0, epsilon = 1e-12);
            let quad = QuadratureRule::gauss(ElementType::Q4, order).unwrap();
            assert_relative_eq!(quad.weights.iter().sum::<f64>(), 4.0, epsilon = 1e-12);
        }
        let point = QuadratureRule::gauss(ElementType::P1, 1).unwrap();
        assert_eq!(point.dimension(), 0);
        assert!(QuadratureRule::gauss(ElementType::L2, 4).is_err());
    }
}
