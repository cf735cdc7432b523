use crate::dtype::DType;

/// Errors produced by tensor operations.
///
/// Every fallible operation reports through this enum; no routine signals
/// failure through sentinel values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TensileError {
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("matmul dimension mismatch: [{m}, {k1}] @ [{k2}, {n}]")]
    MatmulDimMismatch {
        m: usize,
        k1: usize,
        k2: usize,
        n: usize,
    },

    #[error("unsupported dtype: {0}")]
    UnsupportedDType(DType),

    #[error("dtype mismatch: expected {expected}, got {got}")]
    DTypeMismatch { expected: DType, got: DType },

    #[error("cannot broadcast shapes {a:?} and {b:?}")]
    BroadcastError { a: Vec<usize>, b: Vec<usize> },

    #[error("invalid axis {axis} for {ndim}-dimensional tensor")]
    InvalidAxis { axis: usize, ndim: usize },

    #[error("cannot reshape tensor of {numel} elements to {shape:?}")]
    InvalidReshape { numel: usize, shape: Vec<usize> },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    StorageError(String),
}
