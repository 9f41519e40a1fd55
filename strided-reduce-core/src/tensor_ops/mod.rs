//! Reductions over strided tensors.
//!
//! A reduction is described by two things:
//!
//! 1. A [crate::shapes::ReduceLayout] - which axes of which input are reduced
//! 2. A [ReduceSpec] - the [ReduceOp] to fold with and whether NaNs propagate and indices are tracked
//!
//! [reduce] runs it on host slices, and [ReduceKernel] runs it on a device's own
//! buffers:
//!
//! ```rust
//! # use strided_reduce_core::prelude::*;
//! let dev: Cpu = Default::default();
//! let layout = resolve(&[2, 3], &[1]).unwrap();
//! let spec = ReduceSpec::new(ReduceOp::Add);
//! let inp = Storage::<f32>::try_upload(&dev, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
//! let mut out = Storage::<f32>::try_alloc_zeros(&dev, 2).unwrap();
//! ReduceKernel::<f32>::try_reduce(&dev, &layout, &spec, 1.0, 0.0, &inp, &mut out, None).unwrap();
//! assert_eq!(out, [6.0, 15.0]);
//! ```

mod reduce;
pub(crate) mod utilities;

pub use reduce::{reduce, ReduceKernel, ReduceOp, ReduceSpec};
