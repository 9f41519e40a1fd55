//! Benchmark driver for strided tensor reductions.
//!
//! Reads a reduction from the command line ([config::Args]), runs it on a
//! device twice, once to warm up and once timed, and optionally checks the
//! warm-up result against the host reference kernel ([app::BenchApp]).
//!
//! Everything from `strided-reduce-core` is re-exported:
//!
//! ```rust
//! use strided_reduce::prelude::*;
//! let layout = resolve(&[4, 8], &[0]).unwrap();
//! assert_eq!(layout.output().lengths(), &[1, 8]);
//! ```

pub mod app;
pub mod config;
pub mod timer;

pub use strided_reduce_core::*;
