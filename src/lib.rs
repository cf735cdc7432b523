//! # tensile
//!
//! Facade over the tensile workspace: small tensor kernels with
//! multi-query attention, overlapping max-pooling, and critical-point
//! analysis.
//!
//! ```
//! use tensile::{Tensor, attention};
//!
//! let x = Tensor::identity(2);
//! let eye = Tensor::identity(2);
//! let w_out = Tensor::cat(&[&eye, &eye], 0).unwrap();
//! let out = attention::multi_query_attention(
//!     &x,
//!     &[eye.clone(), eye.clone()],
//!     &eye,
//!     &eye,
//!     &w_out,
//! ).unwrap();
//! assert_eq!(out.shape().dims(), &[2, 2]);
//! ```

pub use tensile_core::{DType, Result, Shape, Storage, Tensor, TensileError};

pub use tensile_attention as attention;
pub use tensile_kernels as kernels;
pub use tensile_linalg as linalg;
pub use tensile_nn as nn;
