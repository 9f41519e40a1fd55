//! Checks a reduction computed elsewhere against the host reference kernel.
//!
//! ```rust
//! # use strided_reduce_core::prelude::*;
//! let v = verify(&[6.0f32, 15.0], &[6.00001, 15.0], 0.00002).unwrap();
//! assert!(v.passed);
//! let v = verify(&[6.0f32, 15.0], &[6.1, 15.0], 0.00002).unwrap();
//! assert!(!v.passed);
//! ```

use crate::{
    dtypes::{DataType, Dtype},
    shapes::ReduceLayout,
    tensor::Error,
    tensor_ops::{reduce, ReduceOp, ReduceSpec},
};
use std::vec::Vec;

/// Largest max absolute error a verification passes with, by default.
pub const DEFAULT_TOLERANCE: f32 = 0.00002;

/// [DEFAULT_TOLERANCE] in `E`.
pub fn default_tolerance<E: Dtype>() -> E {
    E::from_f32(DEFAULT_TOLERANCE).unwrap_or_else(E::epsilon)
}

/// The outcome of comparing two buffers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verification<E> {
    pub max_abs_error: E,
    pub passed: bool,
}

/// Compares `candidate` against `reference` element-wise.
///
/// `passed` is true when the largest absolute difference is strictly below
/// `tolerance`. A NaN difference is never below the tolerance. The outcome is
/// logged, a failed comparison is not an error.
pub fn verify<E: Dtype>(
    reference: &[E],
    candidate: &[E],
    tolerance: E,
) -> Result<Verification<E>, Error> {
    Error::check_len(reference.len(), candidate.len())?;

    let mut max_abs_error = E::zero();
    for (&r, &c) in reference.iter().zip(candidate.iter()) {
        let err = (r - c).abs();
        if err.is_nan() || err > max_abs_error {
            max_abs_error = err;
        }
    }
    let passed = max_abs_error < tolerance;

    if passed {
        tracing::info!(max_error = %max_abs_error, %tolerance, "verification succeeded");
    } else {
        tracing::warn!(max_error = %max_abs_error, %tolerance, "verification failed");
    }

    Ok(Verification {
        max_abs_error,
        passed,
    })
}

/// A configuration the reference check does not cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedConfiguration {
    pub op: ReduceOp,
    pub data_type: DataType,
}

impl std::fmt::Display for UnsupportedConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "verification only covers `add` on float tensors, not `{}` on {} tensors",
            self.op, self.data_type
        )
    }
}

/// Whether [ReferenceCheck] covers a configuration. Only sums of `f32`
/// tensors are checked.
pub fn supports_verification(op: ReduceOp, data_type: DataType) -> bool {
    op == ReduceOp::Add && data_type == DataType::Float
}

/// Result of a [ReferenceCheck].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict<E> {
    Checked(Verification<E>),
    Skipped(UnsupportedConfiguration),
}

/// Recomputes a reduction on the host and compares it with a result
/// produced elsewhere with the same layout, spec and scaling.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceCheck<'a, E> {
    pub layout: &'a ReduceLayout,
    pub spec: &'a ReduceSpec,
    pub alpha: E,
    pub beta: E,
    pub tolerance: E,
}

impl<'a, E: Dtype> ReferenceCheck<'a, E> {
    /// `previous` is the output buffer the candidate was accumulated into.
    pub fn run(&self, inp: &[E], previous: &[E], candidate: &[E]) -> Result<Verdict<E>, Error> {
        if !supports_verification(self.spec.op, E::DATA_TYPE) {
            let skipped = UnsupportedConfiguration {
                op: self.spec.op,
                data_type: E::DATA_TYPE,
            };
            tracing::info!("skipping verification: {skipped}");
            return Ok(Verdict::Skipped(skipped));
        }

        let mut reference: Vec<E> = previous.to_vec();
        reduce(
            inp,
            self.layout,
            self.spec,
            self.alpha,
            self.beta,
            &mut reference,
            None,
        )?;
        verify(&reference, candidate, self.tolerance).map(Verdict::Checked)
    }
}
