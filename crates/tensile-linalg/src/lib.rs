//! # tensile-linalg
//!
//! Dense linear-algebra analysis for tensile.
//!
//! Provides:
//! - Symmetric eigenvalue extraction (nalgebra-backed)
//! - Critical-point classification from a Hessian

pub mod eigen;
pub mod critical;

pub use critical::{classify, classify_critical_point, CriticalPoint};
pub use eigen::symmetric_eigenvalues;
