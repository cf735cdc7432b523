//! Critical-point classification via second-order conditions.
//!
//! Classifies a stationary point from the eigenvalues of its Hessian:
//! positive-definite → local minimum, negative-definite → local maximum,
//! indefinite → saddle point. Eigenvalues within tolerance of zero make
//! the second-order test inconclusive.

use std::fmt;

use tensile_core::Tensor;

use crate::eigen::symmetric_eigenvalues;

/// Default tolerance for treating an eigenvalue as zero.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Outcome of the second-order test at a stationary point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriticalPoint {
    LocalMinimum,
    LocalMaximum,
    SaddlePoint,
    Inconclusive,
}

impl fmt::Display for CriticalPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriticalPoint::LocalMinimum => write!(f, "local_minimum"),
            CriticalPoint::LocalMaximum => write!(f, "local_maximum"),
            CriticalPoint::SaddlePoint => write!(f, "saddle_point"),
            CriticalPoint::Inconclusive => write!(f, "inconclusive"),
        }
    }
}

/// Classify a critical point from its Hessian with an explicit tolerance.
///
/// # Errors
/// * `ShapeMismatch` if the Hessian is not a square 2-D matrix
/// * `InvalidInput` if it is empty
pub fn classify_critical_point(
    hessian: &Tensor,
    tol: f64,
) -> tensile_core::Result<CriticalPoint> {
    let eigenvalues = symmetric_eigenvalues(hessian)?;

    if eigenvalues.iter().any(|l| l.abs() < tol) {
        return Ok(CriticalPoint::Inconclusive);
    }
    if eigenvalues.iter().all(|l| *l > 0.0) {
        return Ok(CriticalPoint::LocalMinimum);
    }
    if eigenvalues.iter().all(|l| *l < 0.0) {
        return Ok(CriticalPoint::LocalMaximum);
    }
    Ok(CriticalPoint::SaddlePoint)
}

/// Classify a critical point with the default tolerance.
pub fn classify(hessian: &Tensor) -> tensile_core::Result<CriticalPoint> {
    classify_critical_point(hessian, DEFAULT_TOLERANCE)
}
