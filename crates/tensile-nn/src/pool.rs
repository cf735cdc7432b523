//! Overlapping 2D max pooling.
//!
//! Operates on 4D tensors with shape `[batch, channels, height, width]`.
//! Output size uses ceil-mode: `out = ceil((in - kernel) / stride) + 1`,
//! so windows may overhang the bottom/right edge. Out-of-bounds positions
//! contribute `-inf`, matching explicit `-inf` edge padding.

use tensile_core::{Tensor, TensileError};

/// 2D max pooling layer with overlapping windows.
///
/// Input shape: `[batch, channels, height, width]`
/// Output shape: `[batch, channels, out_h, out_w]`
pub struct MaxPool2d {
    kernel_size: usize,
    stride: usize,
}

impl MaxPool2d {
    /// Create a new MaxPool2d layer.
    ///
    /// # Panics
    /// Panics if `kernel_size` or `stride` is zero.
    pub fn new(kernel_size: usize, stride: usize) -> Self {
        assert!(kernel_size > 0, "MaxPool2d: kernel_size must be > 0");
        assert!(stride > 0, "MaxPool2d: stride must be > 0");
        Self { kernel_size, stride }
    }

    /// The classic overlapping configuration: 3×3 kernel, stride 2.
    pub fn overlapping() -> Self {
        Self::new(3, 2)
    }

    /// Compute output dimensions (ceil-mode).
    pub fn output_size(&self, in_h: usize, in_w: usize) -> tensile_core::Result<(usize, usize)> {
        if in_h < self.kernel_size || in_w < self.kernel_size {
            return Err(TensileError::ShapeMismatch {
                expected: vec![self.kernel_size, self.kernel_size],
                got: vec![in_h, in_w],
            });
        }
        let out_h = (in_h - self.kernel_size).div_ceil(self.stride) + 1;
        let out_w = (in_w - self.kernel_size).div_ceil(self.stride) + 1;
        Ok((out_h, out_w))
    }

    /// Forward pass over `[batch, channels, height, width]`.
    pub fn forward(&self, input: &Tensor) -> tensile_core::Result<Tensor> {
        let data = input.contiguous();
        let dims = data.shape().dims().to_vec();
        if dims.len() != 4 {
            return Err(TensileError::ShapeMismatch {
                expected: vec![0, 0, 0, 0],
                got: dims,
            });
        }

        let batch = dims[0];
        let channels = dims[1];
        let in_h = dims[2];
        let in_w = dims[3];
        let (out_h, out_w) = self.output_size(in_h, in_w)?;
        let x = data
            .as_f32_slice()
            .ok_or_else(|| TensileError::UnsupportedDType(data.dtype()))?;

        let mut output = vec![f32::NEG_INFINITY; batch * channels * out_h * out_w];

        for b in 0..batch {
            for c in 0..channels {
                for oh in 0..out_h {
                    for ow in 0..out_w {
                        let mut max_val = f32::NEG_INFINITY;

                        for kh in 0..self.kernel_size {
                            for kw in 0..self.kernel_size {
                                let ih = oh * self.stride + kh;
                                let iw = ow * self.stride + kw;

                                // Overhanging positions act as -inf padding
                                if ih >= in_h || iw >= in_w {
                                    continue;
                                }

                                let idx = b * channels * in_h * in_w
                                    + c * in_h * in_w
                                    + ih * in_w
                                    + iw;
                                max_val = max_val.max(x[idx]);
                            }
                        }

                        let o_idx = b * channels * out_h * out_w
                            + c * out_h * out_w
                            + oh * out_w
                            + ow;
                        output[o_idx] = max_val;
                    }
                }
            }
        }

        Ok(Tensor::from_f32(&output, &[batch, channels, out_h, out_w]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_4x4() {
        let pool = MaxPool2d::overlapping();
        // [1, 1, 4, 4], kernel=3, stride=2 → ceil((4-3)/2)+1 = 2 per side
        let input = Tensor::from_f32(&[
            1.0, 2.0, 3.0, 4.0,
            5.0, 6.0, 7.0, 8.0,
            9.0, 10.0, 11.0, 12.0,
            13.0, 14.0, 15.0, 16.0,
        ], &[1, 1, 4, 4]);

        let output = pool.forward(&input).unwrap();
        assert_eq!(output.shape().dims(), &[1, 1, 2, 2]);
        let data = output.as_f32_slice().unwrap();
        // Bottom/right windows overhang and ignore the padding
        assert_eq!(data, &[11.0, 12.0, 15.0, 16.0]);
    }

    #[test]
    fn test_exact_fit_5x5() {
        let pool = MaxPool2d::overlapping();
        // ceil((5-3)/2)+1 = 2: windows at offsets 0 and 2 fit exactly
        let data: Vec<f32> = (1..=25).map(|i| i as f32).collect();
        let input = Tensor::from_f32(&data, &[1, 1, 5, 5]);

        let output = pool.forward(&input).unwrap();
        assert_eq!(output.shape().dims(), &[1, 1, 2, 2]);
        let data = output.as_f32_slice().unwrap();
        assert_eq!(data, &[13.0, 15.0, 23.0, 25.0]);
    }

    #[test]
    fn test_overhang_6x6() {
        let pool = MaxPool2d::overlapping();
        // ceil((6-3)/2)+1 = 3: the last window starts at row 4 and overhangs
        let data: Vec<f32> = (1..=36).map(|i| i as f32).collect();
        let input = Tensor::from_f32(&data, &[1, 1, 6, 6]);

        let output = pool.forward(&input).unwrap();
        assert_eq!(output.shape().dims(), &[1, 1, 3, 3]);
        let data = output.as_f32_slice().unwrap();
        assert_eq!(data, &[
            15.0, 17.0, 18.0,
            27.0, 29.0, 30.0,
            33.0, 35.0, 36.0,
        ]);
    }

    #[test]
    fn test_non_overlapping_stride() {
        let pool = MaxPool2d::new(2, 2);
        let input = Tensor::from_f32(&[
            1.0, 2.0, 3.0, 4.0,
            5.0, 6.0, 7.0, 8.0,
            9.0, 10.0, 11.0, 12.0,
            13.0, 14.0, 15.0, 16.0,
        ], &[1, 1, 4, 4]);

        let output = pool.forward(&input).unwrap();
        assert_eq!(output.shape().dims(), &[1, 1, 2, 2]);
        let data = output.as_f32_slice().unwrap();
        assert_eq!(data, &[6.0, 8.0, 14.0, 16.0]);
    }

    #[test]
    fn test_multichannel() {
        let pool = MaxPool2d::new(2, 2);
        // [1, 2, 2, 2] → [1, 2, 1, 1]
        let input = Tensor::from_f32(&[
            1.0, 2.0, 3.0, 4.0,  // channel 0
            5.0, 6.0, 7.0, 8.0,  // channel 1
        ], &[1, 2, 2, 2]);

        let output = pool.forward(&input).unwrap();
        assert_eq!(output.shape().dims(), &[1, 2, 1, 1]);
        let data = output.as_f32_slice().unwrap();
        assert_eq!(data, &[4.0, 8.0]);
    }

    #[test]
    fn test_batched() {
        let pool = MaxPool2d::overlapping();
        let data: Vec<f32> = (0..2 * 1 * 4 * 4).map(|i| i as f32).collect();
        let input = Tensor::from_f32(&data, &[2, 1, 4, 4]);

        let output = pool.forward(&input).unwrap();
        assert_eq!(output.shape().dims(), &[2, 1, 2, 2]);
        let out = output.as_f32_slice().unwrap();
        assert_eq!(out, &[10.0, 11.0, 14.0, 15.0, 26.0, 27.0, 30.0, 31.0]);
    }

    #[test]
    fn test_negative_values() {
        // Maxima below zero must survive the -inf initialization
        let pool = MaxPool2d::new(2, 2);
        let input = Tensor::from_f32(&[
            -5.0, -2.0,
            -8.0, -3.0,
        ], &[1, 1, 2, 2]);

        let output = pool.forward(&input).unwrap();
        assert_eq!(output.as_f32_slice().unwrap(), &[-2.0]);
    }

    #[test]
    fn test_non_4d_rejected() {
        let pool = MaxPool2d::overlapping();
        let input = Tensor::ones(&[4, 4]);
        assert!(pool.forward(&input).is_err());
    }

    #[test]
    fn test_input_smaller_than_kernel_rejected() {
        let pool = MaxPool2d::overlapping();
        let input = Tensor::ones(&[1, 1, 2, 2]);
        assert!(pool.forward(&input).is_err());
    }
}
