//! Symmetric eigenvalue extraction.
//!
//! Converts the tensor to an `nalgebra` matrix and runs its symmetric
//! eigendecomposition. Only the lower-triangular part is meaningful for a
//! symmetric solver, so near-symmetric inputs are accepted as-is.

use nalgebra::{DMatrix, SymmetricEigen};

use tensile_core::{DType, Tensor, TensileError};

/// Eigenvalues of a symmetric matrix, in ascending order.
///
/// Accepts F32 or F64 tensors; the decomposition always runs in f64.
///
/// # Errors
/// * `ShapeMismatch` if the input is not a square 2-D matrix
/// * `InvalidInput` if the matrix is empty
pub fn symmetric_eigenvalues(matrix: &Tensor) -> tensile_core::Result<Vec<f64>> {
    let dims = matrix.shape().dims();
    if dims.len() != 2 || dims[0] != dims[1] {
        return Err(TensileError::ShapeMismatch {
            expected: vec![dims.first().copied().unwrap_or(0); 2],
            got: dims.to_vec(),
        });
    }
    let n = dims[0];
    if n == 0 {
        return Err(TensileError::InvalidInput("empty matrix".into()));
    }

    let contiguous = matrix.contiguous();
    let data: Vec<f64> = match contiguous.dtype() {
        DType::F64 => contiguous
            .as_f64_slice()
            .ok_or_else(|| {
                TensileError::StorageError("non-contiguous f64 tensor".into())
            })?
            .to_vec(),
        DType::F32 => contiguous
            .as_f32_slice()
            .unwrap()
            .iter()
            .map(|&v| f64::from(v))
            .collect(),
        other => return Err(TensileError::UnsupportedDType(other)),
    };

    let m = DMatrix::from_row_slice(n, n, &data);
    let eigen = SymmetricEigen::new(m);

    let mut values: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_matrix() {
        let m = Tensor::from_f64(&[3.0, 0.0, 0.0, -1.0], &[2, 2]);
        let vals = symmetric_eigenvalues(&m).unwrap();
        assert_eq!(vals.len(), 2);
        assert!((vals[0] - (-1.0)).abs() < 1e-10);
        assert!((vals[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_symmetric_2x2() {
        // [[2, 1], [1, 2]] has eigenvalues 1 and 3
        let m = Tensor::from_f64(&[2.0, 1.0, 1.0, 2.0], &[2, 2]);
        let vals = symmetric_eigenvalues(&m).unwrap();
        assert!((vals[0] - 1.0).abs() < 1e-10);
        assert!((vals[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_f32_input() {
        let m = Tensor::from_f32(&[2.0, 0.0, 0.0, 5.0], &[2, 2]);
        let vals = symmetric_eigenvalues(&m).unwrap();
        assert!((vals[0] - 2.0).abs() < 1e-6);
        assert!((vals[1] - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_tridiagonal_3x3() {
        // [[2,-1,0],[-1,2,-1],[0,-1,2]]: eigenvalues 2 - sqrt(2), 2, 2 + sqrt(2)
        let m = Tensor::from_f64(
            &[2.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 2.0],
            &[3, 3],
        );
        let vals = symmetric_eigenvalues(&m).unwrap();
        let sqrt2 = std::f64::consts::SQRT_2;
        assert!((vals[0] - (2.0 - sqrt2)).abs() < 1e-9);
        assert!((vals[1] - 2.0).abs() < 1e-9);
        assert!((vals[2] - (2.0 + sqrt2)).abs() < 1e-9);
    }

    #[test]
    fn test_non_square_rejected() {
        let m = Tensor::from_f64(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
        assert!(matches!(
            symmetric_eigenvalues(&m),
            Err(TensileError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_vector_rejected() {
        let m = Tensor::from_f64(&[1.0, 2.0], &[2]);
        assert!(symmetric_eigenvalues(&m).is_err());
    }

    #[test]
    fn test_empty_rejected() {
        let m = Tensor::from_f64(&[], &[0, 0]);
        assert!(matches!(
            symmetric_eigenvalues(&m),
            Err(TensileError::InvalidInput(_))
        ));
    }
}
