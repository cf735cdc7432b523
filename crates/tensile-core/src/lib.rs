//! # tensile-core
//!
//! Core tensor engine for the tensile kernel collection.
//!
//! Provides the foundational `Tensor` type with:
//! - F32, F64 and I32 dtypes
//! - Zero-copy views (reshape, transpose)
//! - Broadcasting element-wise arithmetic
//! - Matrix, batched and matrix-vector products
//! - Copy-on-write shared storage

pub mod dtype;
pub mod storage;
pub mod shape;
pub mod tensor;
pub mod ops;
pub mod error;
pub mod prelude;

pub use dtype::DType;
pub use storage::Storage;
pub use shape::Shape;
pub use tensor::Tensor;
pub use error::TensileError;

pub type Result<T> = std::result::Result<T, TensileError>;
