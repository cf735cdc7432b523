//! Multi-query attention: many query heads sharing one key/value projection.
//!
//! Each head carries its own query projection, but K and V are computed
//! once from a single shared projection pair and reused by every head.
//! Heads are independent, so the per-head loop runs on the rayon pool;
//! concatenation order is fixed by head index regardless of scheduling.

use rayon::prelude::*;

use tensile_core::{DType, Tensor, TensileError};
use tensile_kernels::cpu_matmul::matmul_f32;

use crate::scaled_dot::scaled_dot_product_attention;

/// Decimal places kept in the returned tensor.
const OUTPUT_DECIMALS: u32 = 4;

/// Multi-query attention over a single sequence.
///
/// # Arguments
/// * `x`         - input sequence, [seq_len, d_model]
/// * `w_queries` - one query projection per head, each [d_model, d_k];
///   slice order defines head order
/// * `w_key`     - shared key projection, [d_model, d_k]
/// * `w_value`   - shared value projection, [d_model, d_v]
/// * `w_out`     - output projection, [num_heads * d_v, d_model]
///
/// # Returns
/// * `output` - [seq_len, d_model], every element rounded to 4 decimal
///   places (ties away from zero)
///
/// # Errors
/// * `InvalidInput` for a zero-length sequence, zero heads, or zero-width
///   projections
/// * `ShapeMismatch` when any projection disagrees with the invariants
///   above (inconsistent d_k across heads, wrong `w_out` row count, ...)
pub fn multi_query_attention(
    x: &Tensor,
    w_queries: &[Tensor],
    w_key: &Tensor,
    w_value: &Tensor,
    w_out: &Tensor,
) -> Result<Tensor, TensileError> {
    validate_shapes(x, w_queries, w_key, w_value, w_out)?;

    // K and V are computed once and shared by every head — the defining
    // property of multi-query attention.
    let k = matmul_f32(x, w_key)?;
    let v = matmul_f32(x, w_value)?;

    let head_outputs: Vec<Tensor> = w_queries
        .par_iter()
        .map(|w_q| {
            let q = matmul_f32(x, w_q)?;
            scaled_dot_product_attention(&q, &k, &v, None)
        })
        .collect::<Result<Vec<_>, TensileError>>()?;

    // Concatenate per-head outputs along the feature axis in head order
    let refs: Vec<&Tensor> = head_outputs.iter().collect();
    let concat = Tensor::cat(&refs, 1)?;

    let projected = matmul_f32(&concat, w_out)?;
    projected.round_decimals(OUTPUT_DECIMALS)
}

fn validate_shapes(
    x: &Tensor,
    w_queries: &[Tensor],
    w_key: &Tensor,
    w_value: &Tensor,
    w_out: &Tensor,
) -> Result<(), TensileError> {
    if x.dtype() != DType::F32 {
        return Err(TensileError::UnsupportedDType(x.dtype()));
    }

    let x_dims = x.shape().dims();
    if x_dims.len() != 2 {
        return Err(TensileError::ShapeMismatch {
            expected: vec![0, 0],
            got: x_dims.to_vec(),
        });
    }
    let seq_len = x_dims[0];
    let d_model = x_dims[1];

    if seq_len == 0 {
        return Err(TensileError::InvalidInput("zero-length sequence".into()));
    }
    if w_queries.is_empty() {
        return Err(TensileError::InvalidInput(
            "at least one query head is required".into(),
        ));
    }

    let k_dims = w_key.shape().dims();
    if k_dims.len() != 2 || k_dims[0] != d_model {
        return Err(TensileError::ShapeMismatch {
            expected: vec![d_model, 0],
            got: k_dims.to_vec(),
        });
    }
    let d_k = k_dims[1];

    let v_dims = w_value.shape().dims();
    if v_dims.len() != 2 || v_dims[0] != d_model {
        return Err(TensileError::ShapeMismatch {
            expected: vec![d_model, 0],
            got: v_dims.to_vec(),
        });
    }
    let d_v = v_dims[1];

    if d_k == 0 || d_v == 0 {
        return Err(TensileError::InvalidInput(
            "zero-width key or value projection".into(),
        ));
    }

    // Every head's query projection must agree with the shared key width
    for w_q in w_queries {
        let q_dims = w_q.shape().dims();
        if q_dims.len() != 2 || q_dims[0] != d_model || q_dims[1] != d_k {
            return Err(TensileError::ShapeMismatch {
                expected: vec![d_model, d_k],
                got: q_dims.to_vec(),
            });
        }
    }

    let o_dims = w_out.shape().dims();
    let concat_dim = w_queries.len() * d_v;
    if o_dims.len() != 2 || o_dims[0] != concat_dim || o_dims[1] != d_model {
        return Err(TensileError::ShapeMismatch {
            expected: vec![concat_dim, d_model],
            got: o_dims.to_vec(),
        });
    }

    Ok(())
}
