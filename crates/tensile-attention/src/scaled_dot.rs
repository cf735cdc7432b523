//! Standard scaled dot-product attention.
//!
//! Attention(Q, K, V) = softmax(Q @ K^T / sqrt(d_k)) @ V
//!
//! The softmax subtracts the row-wise maximum before exponentiating, so
//! large score magnitudes cannot overflow. This is the single-head
//! building block reused by the multi-query routine.

use tensile_core::{DType, Tensor, TensileError};
use tensile_kernels::cpu_matmul::matmul_f32;

/// Normalized attention weights: softmax(Q @ K^T * scale).
///
/// # Arguments
/// * `query` - [seq_q, d_k]
/// * `key`   - [seq_k, d_k]
/// * `scale` - Optional scaling factor (default: 1/sqrt(d_k))
///
/// # Returns
/// * `weights` - [seq_q, seq_k]; every row sums to 1
pub fn attention_weights(
    query: &Tensor,
    key: &Tensor,
    scale: Option<f32>,
) -> Result<Tensor, TensileError> {
    if query.dtype() != DType::F32 || key.dtype() != DType::F32 {
        return Err(TensileError::UnsupportedDType(query.dtype()));
    }

    let q_dims = query.shape().dims();
    let k_dims = key.shape().dims();
    if q_dims.len() != 2 || k_dims.len() != 2 {
        return Err(TensileError::ShapeMismatch {
            expected: vec![0, 0],
            got: if q_dims.len() != 2 { q_dims.to_vec() } else { k_dims.to_vec() },
        });
    }

    let seq_q = q_dims[0];
    let d_k = q_dims[1];
    let seq_k = k_dims[0];

    if seq_q == 0 || seq_k == 0 || d_k == 0 {
        return Err(TensileError::InvalidInput(
            "attention over an empty sequence or zero-width head".into(),
        ));
    }
    if k_dims[1] != d_k {
        return Err(TensileError::MatmulDimMismatch {
            m: seq_q,
            k1: d_k,
            k2: k_dims[1],
            n: seq_k,
        });
    }

    let scale_factor = scale.unwrap_or(1.0 / (d_k as f32).sqrt());

    // scores = Q @ K^T * scale  [seq_q, seq_k]
    let k_t = key.transpose()?;
    let scores_tensor = matmul_f32(query, &k_t)?;
    let mut scores = scores_tensor.as_f32_slice().unwrap().to_vec();
    for s in scores.iter_mut() {
        *s *= scale_factor;
    }

    // Softmax over last dimension (seq_k), max-subtracted for stability
    for i in 0..seq_q {
        let row = &mut scores[i * seq_k..(i + 1) * seq_k];

        let max_val = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let mut sum = 0.0f32;
        for v in row.iter_mut() {
            *v = (*v - max_val).exp();
            sum += *v;
        }
        let inv_sum = 1.0 / sum;
        for v in row.iter_mut() {
            *v *= inv_sum;
        }
    }

    Ok(Tensor::from_f32(&scores, &[seq_q, seq_k]))
}

/// Scaled dot-product attention.
///
/// # Arguments
/// * `query` - [seq_q, d_k]
/// * `key`   - [seq_k, d_k]
/// * `value` - [seq_k, d_v]
/// * `scale` - Optional scaling factor (default: 1/sqrt(d_k))
///
/// # Returns
/// * `output` - [seq_q, d_v]
pub fn scaled_dot_product_attention(
    query: &Tensor,
    key: &Tensor,
    value: &Tensor,
    scale: Option<f32>,
) -> Result<Tensor, TensileError> {
    let v_dims = value.shape().dims();
    if v_dims.len() != 2 {
        return Err(TensileError::ShapeMismatch {
            expected: vec![0, 0],
            got: v_dims.to_vec(),
        });
    }
    if v_dims[0] != key.shape().dims()[0] {
        return Err(TensileError::ShapeMismatch {
            expected: key.shape().dims().to_vec(),
            got: v_dims.to_vec(),
        });
    }

    let weights = attention_weights(query, key, scale)?;

    // output = weights @ V  [seq_q, d_v]
    matmul_f32(&weights, value)
}
