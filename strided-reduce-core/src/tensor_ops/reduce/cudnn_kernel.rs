use super::{ReduceKernel, ReduceOp, ReduceSpec};
use crate::{
    dtypes::Dtype,
    shapes::ReduceLayout,
    tensor::{Cuda, Error},
};

use cudarc::{
    cudnn::{
        sys::{cudnnNanPropagation_t, cudnnReduceTensorOp_t},
        CudnnDataType, ReduceTensor,
    },
    driver::{CudaSlice, DeviceSlice},
};
use std::vec::Vec;

fn cudnn_op(op: ReduceOp) -> cudnnReduceTensorOp_t {
    match op {
        ReduceOp::Add => cudnnReduceTensorOp_t::CUDNN_REDUCE_TENSOR_ADD,
        ReduceOp::Mul => cudnnReduceTensorOp_t::CUDNN_REDUCE_TENSOR_MUL,
        ReduceOp::Min => cudnnReduceTensorOp_t::CUDNN_REDUCE_TENSOR_MIN,
        ReduceOp::Max => cudnnReduceTensorOp_t::CUDNN_REDUCE_TENSOR_MAX,
        ReduceOp::AMax => cudnnReduceTensorOp_t::CUDNN_REDUCE_TENSOR_AMAX,
        ReduceOp::Avg => cudnnReduceTensorOp_t::CUDNN_REDUCE_TENSOR_AVG,
        ReduceOp::Norm1 => cudnnReduceTensorOp_t::CUDNN_REDUCE_TENSOR_NORM1,
        ReduceOp::Norm2 => cudnnReduceTensorOp_t::CUDNN_REDUCE_TENSOR_NORM2,
        ReduceOp::MulNoZeros => cudnnReduceTensorOp_t::CUDNN_REDUCE_TENSOR_MUL_NO_ZEROS,
    }
}

fn cudnn_nan_opt(propagate_nan: bool) -> cudnnNanPropagation_t {
    if propagate_nan {
        cudnnNanPropagation_t::CUDNN_PROPAGATE_NAN
    } else {
        cudnnNanPropagation_t::CUDNN_NOT_PROPAGATE_NAN
    }
}

/// cuDNN tensor descriptors need at least 4 dims, so lower ranks are padded
/// with leading length 1 axes.
fn make_at_least_4d(dims: &[usize], strides: &[usize]) -> Result<(Vec<i32>, Vec<i32>), Error> {
    let to_i32 = |x: usize| {
        i32::try_from(x).map_err(|_| {
            Error::InvalidArgument(format!("{x} does not fit a cuDNN tensor descriptor"))
        })
    };
    let numel: usize = dims.iter().product();
    let pad = 4usize.saturating_sub(dims.len());
    let mut padded_dims = Vec::with_capacity(pad + dims.len());
    let mut padded_strides = Vec::with_capacity(pad + dims.len());
    for _ in 0..pad {
        padded_dims.push(1);
        padded_strides.push(to_i32(numel)?);
    }
    for (&d, &s) in dims.iter().zip(strides.iter()) {
        padded_dims.push(to_i32(d)?);
        padded_strides.push(to_i32(s)?);
    }
    Ok((padded_dims, padded_strides))
}

impl<E: Dtype + CudnnDataType> ReduceKernel<E> for Cuda {
    fn try_reduce(
        &self,
        layout: &ReduceLayout,
        spec: &ReduceSpec,
        alpha: E,
        beta: E,
        inp: &CudaSlice<E>,
        out: &mut CudaSlice<E>,
        indices: Option<&mut CudaSlice<u32>>,
    ) -> Result<(), Error> {
        if layout.rank() > 8 {
            return Err(Error::InvalidArgument(format!(
                "cuDNN reductions support up to 8 dims, got {}",
                layout.rank()
            )));
        }
        Error::check_len(layout.input().num_elements(), inp.len())?;
        Error::check_len(layout.output().num_elements(), out.len())?;

        let a = {
            let (dims, strides) =
                make_at_least_4d(layout.input().lengths(), layout.input().strides())?;
            self.cudnn.create_nd_tensor::<E>(&dims, &strides)?
        };
        let c = {
            let (dims, strides) =
                make_at_least_4d(layout.output().lengths(), layout.output().strides())?;
            self.cudnn.create_nd_tensor::<E>(&dims, &strides)?
        };

        let op = cudnn_op(spec.op);
        let nan_opt = cudnn_nan_opt(spec.propagate_nan);

        match indices {
            Some(indices) if spec.produces_indices() => {
                let reduce = self
                    .cudnn
                    .create_reduction_flat_indices::<E>(op, nan_opt)?;
                let op = ReduceTensor {
                    reduce: &reduce,
                    a: &a,
                    c: &c,
                };
                let num_bytes = op.get_indices_size()?;
                if num_bytes > indices.num_bytes() {
                    return Err(Error::SizeMismatch {
                        expected: num_bytes / std::mem::size_of::<u32>(),
                        actual: indices.len(),
                    });
                }
                let mut workspace = self.get_workspace(op.get_workspace_size()?)?;
                unsafe { op.launch(indices, &mut *workspace, (alpha, beta), inp, out) }?;
            }
            _ => {
                let reduce = self.cudnn.create_reduction_no_indices::<E>(op, nan_opt)?;
                let op = ReduceTensor {
                    reduce: &reduce,
                    a: &a,
                    c: &c,
                };
                let mut workspace = self.get_workspace(op.get_workspace_size()?)?;
                unsafe { op.launch(&mut *workspace, (alpha, beta), inp, out) }?;
            }
        }
        Ok(())
    }
}
