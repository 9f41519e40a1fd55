//! Layouts of the tensors a reduction reads and writes.
//!
//! All tensors are dense and row-major (C-order): [TensorLayout] only stores
//! axis lengths and derives strides from them. A [ReduceLayout] pairs the input
//! layout with the output layout of a reduction, where every reduced axis is
//! kept as a length 1 axis.

mod layout;

pub use layout::{resolve, row_major_strides, ReduceLayout, TensorLayout};
