//! Small dense-matrix helpers on top of `nalgebra`.
//!
//! These cover the handful of primitives the Jacobian calculus needs beyond
//! plain products: inversion with a singularity check, the skew-symmetric
//! cross-product matrix, and tangent-column norms.

use nalgebra::{DMatrix, Matrix3, Vector3};

use crate::mesh_error::MeshError;

const EPS: f64 = 1e-12;

/// Lift a slice of up to 3 components to a 3-vector (zero-padded).
pub fn to_vector3(v: &[f64]) -> Result<Vector3<f64>, MeshError> {
    match v.len() {
        1 => Ok(Vector3::new(v[0], 0.0, 0.0)),
        2 => Ok(Vector3::new(v[0], v[1], 0.0)),
        3 => Ok(Vector3::new(v[0], v[1], v[2])),
        n => Err(MeshError::InvalidInput(format!(
            "expected a vector of at most 3 components, got {n}"
        ))),
    }
}

/// Skew-symmetric matrix `S` with `S * b == a x b`.
pub fn skewmat(a: &[f64]) -> Result<Matrix3<f64>, MeshError> {
    let a = to_vector3(a)?;
    Ok(a.cross_matrix())
}

/// Norm of the cross product of columns `0` and `1` of `j`.
pub fn cross_norm(j: &DMatrix<f64>) -> Result<f64, MeshError> {
    if j.ncols() != 2 {
        return Err(MeshError::mismatch("tangent columns", 2, j.ncols()));
    }
    let t0: Vec<f64> = j.column(0).iter().copied().collect();
    let t1 = to_vector3(&j.column(1).iter().copied().collect::<Vec<_>>())?;
    Ok((skewmat(&t0)? * t1).norm())
}

/// Determinant of a square matrix.
pub fn det(m: &DMatrix<f64>) -> Result<f64, MeshError> {
    if !m.is_square() {
        return Err(MeshError::InvalidInput(format!(
            "determinant of a non-square {}x{} matrix",
            m.nrows(),
            m.ncols()
        )));
    }
    Ok(m.determinant())
}

/// Inverse of a square matrix.
///
/// # Errors
/// `InvalidInput` if `m` is not square; `SingularMatrix` if its determinant
/// vanishes relative to the matrix scale.
pub fn inverse(m: &DMatrix<f64>) -> Result<DMatrix<f64>, MeshError> {
    let d = det(m)?;
    let scale = m.amax().powi(m.nrows() as i32);
    let singular = MeshError::SingularMatrix {
        rows: m.nrows(),
        cols: m.ncols(),
    };
    if d.abs() <= EPS * scale.max(f64::MIN_POSITIVE) {
        return Err(singular);
    }
    m.clone().try_inverse().ok_or(singular)
}
