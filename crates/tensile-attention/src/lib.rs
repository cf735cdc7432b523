//! # tensile-attention
//!
//! Attention primitives for tensile.
//!
//! Provides:
//! - Scaled dot-product attention (single head)
//! - Multi-query attention: per-head queries over one shared key/value pair

pub mod scaled_dot;
pub mod multiquery;

pub use multiquery::multi_query_attention;
pub use scaled_dot::{attention_weights, scaled_dot_product_attention};
