//! Tensor manipulation operations: cat, stack.

use crate::error::TensileError;
use crate::tensor::Tensor;
use crate::Result;

impl Tensor {
    /// Concatenate tensors along a given axis.
    ///
    /// All tensors must have the same shape except along `axis`.
    pub fn cat(tensors: &[&Tensor], axis: isize) -> Result<Tensor> {
        if tensors.is_empty() {
            return Err(TensileError::StorageError("cat: empty tensor list".into()));
        }
        let first = tensors[0];
        let ndim = first.ndim();
        if ndim == 0 {
            return Err(TensileError::StorageError("cat: cannot concatenate scalars".into()));
        }

        let axis = if axis < 0 { (ndim as isize + axis) as usize } else { axis as usize };
        if axis >= ndim {
            return Err(TensileError::StorageError(format!(
                "cat: axis {} out of range for {}D tensor",
                axis, ndim
            )));
        }

        // Validate shapes match on all non-cat axes
        for t in &tensors[1..] {
            if t.ndim() != ndim {
                return Err(TensileError::ShapeMismatch {
                    expected: first.shape().dims().to_vec(),
                    got: t.shape().dims().to_vec(),
                });
            }
            for d in 0..ndim {
                if d != axis && t.shape().dims()[d] != first.shape().dims()[d] {
                    return Err(TensileError::ShapeMismatch {
                        expected: first.shape().dims().to_vec(),
                        got: t.shape().dims().to_vec(),
                    });
                }
            }
        }

        // Compute output shape
        let mut out_shape: Vec<usize> = first.shape().dims().to_vec();
        let cat_dim: usize = tensors.iter().map(|t| t.shape().dims()[axis]).sum();
        out_shape[axis] = cat_dim;

        let numel: usize = out_shape.iter().product();
        let mut result = vec![0.0f32; numel];

        // Compute strides for output
        let outer: usize = out_shape[..axis].iter().product();
        let inner: usize = out_shape[axis + 1..].iter().product();

        let mut cat_offset = 0;
        for t in tensors {
            let t_cont = t.contiguous();
            let t_data = t_cont
                .as_f32_slice()
                .ok_or(TensileError::UnsupportedDType(t.dtype()))?;
            let t_axis_size = t.shape().dims()[axis];

            for o in 0..outer {
                for a in 0..t_axis_size {
                    let src_start = (o * t_axis_size + a) * inner;
                    let dst_start = (o * cat_dim + (cat_offset + a)) * inner;
                    result[dst_start..dst_start + inner]
                        .copy_from_slice(&t_data[src_start..src_start + inner]);
                }
            }
            cat_offset += t_axis_size;
        }

        Ok(Tensor::from_f32(&result, &out_shape))
    }

    /// Stack tensors along a new axis.
    ///
    /// All tensors must have the same shape. A new dimension is inserted at `axis`.
    pub fn stack(tensors: &[&Tensor], axis: isize) -> Result<Tensor> {
        if tensors.is_empty() {
            return Err(TensileError::StorageError("stack: empty tensor list".into()));
        }
        let first = tensors[0];
        let ndim = first.ndim();
        let axis = if axis < 0 { (ndim as isize + 1 + axis) as usize } else { axis as usize };
        if axis > ndim {
            return Err(TensileError::StorageError(format!("stack: axis {} out of range", axis)));
        }

        // Validate all shapes match
        for t in &tensors[1..] {
            if t.shape().dims() != first.shape().dims() {
                return Err(TensileError::ShapeMismatch {
                    expected: first.shape().dims().to_vec(),
                    got: t.shape().dims().to_vec(),
                });
            }
        }

        // Unsqueeze each tensor at axis, then cat
        let mut unsqueezed: Vec<Tensor> = Vec::with_capacity(tensors.len());
        for t in tensors {
            let mut new_shape: Vec<isize> = t.shape().dims().iter().map(|&d| d as isize).collect();
            new_shape.insert(axis, 1);
            unsqueezed.push(t.reshape(&new_shape)?);
        }

        let refs: Vec<&Tensor> = unsqueezed.iter().collect();
        Tensor::cat(&refs, axis as isize)
    }
}
