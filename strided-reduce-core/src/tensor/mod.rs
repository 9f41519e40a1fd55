//! Devices that hold reduction buffers and run reductions.
//!
//! There are two devices:
//!
//! 1. [Cpu] - buffers are plain host [Vec]s, and reductions run the reference kernel
//! 2. `Cuda` (feature `cudnn`) - buffers live in GPU memory and reductions run through cuDNN
//!
//! Both implement [Storage] and [Synchronize], so a benchmark can be written once
//! and pointed at either:
//!
//! ```rust
//! # use strided_reduce_core::prelude::*;
//! let dev: Cpu = Default::default();
//! let buf = Storage::<f32>::try_upload(&dev, &[1.0, 2.0, 3.0]).unwrap();
//! dev.synchronize();
//! assert_eq!(Storage::<f32>::try_download(&dev, &buf).unwrap(), [1.0, 2.0, 3.0]);
//! ```

pub(crate) mod cpu;
#[cfg(feature = "cudnn")]
pub(crate) mod cuda;
mod error;
mod storage_traits;

pub use cpu::Cpu;
#[cfg(feature = "cudnn")]
pub use cuda::Cuda;
pub use error::Error;
pub use storage_traits::{RandomFill, Storage, Synchronize};
