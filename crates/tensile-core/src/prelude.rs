//! Convenience re-exports for common tensile-core types.
//!
//! ```rust
//! use tensile_core::prelude::*;
//! ```

pub use crate::Tensor;
pub use crate::DType;
pub use crate::Shape;
pub use crate::TensileError;
pub use crate::Result;
