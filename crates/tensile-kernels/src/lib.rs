//! # tensile-kernels
//!
//! CPU SIMD kernel dispatch for tensile.
//!
//! Provides:
//! - Runtime SIMD capability detection (AVX2, AVX-512, NEON)
//! - Tiled CPU matmul with SIMD inner loops

pub mod simd;
pub mod cpu_matmul;

pub use simd::SimdCapability;
