use super::{accumulator::*, ReduceKernel, ReduceOp, ReduceSpec};
use crate::{
    dtypes::Dtype,
    shapes::ReduceLayout,
    tensor::{Cpu, Error},
    tensor_ops::utilities::reduction_utils::{index_for_reductions, ReductionIndex},
};

use rayon::prelude::*;
use std::vec::Vec;

/// Reduces `inp` on the host: `out = alpha * reduce(inp) + beta * out`.
///
/// Output elements are visited in row-major order of the invariant axes, and
/// each one folds its reduced elements in row-major order of the reduced axes
/// starting from the operator's identity. `out` is only read when `beta` is
/// non-zero.
///
/// If `spec` [produces indices](ReduceSpec::produces_indices) and `indices` is
/// given, `indices[i]` is the flattened input index of the element selected for
/// `out[i]`. Ties keep the first element met. Otherwise `indices` is left as is.
///
/// ```rust
/// # use strided_reduce_core::prelude::*;
/// let layout = resolve(&[2, 3], &[1]).unwrap();
/// let spec = ReduceSpec::new(ReduceOp::Max).with_indices(true);
/// let mut out = [0.0f32; 2];
/// let mut indices = [0u32; 2];
/// let inp = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
/// reduce(&inp, &layout, &spec, 1.0, 0.0, &mut out, Some(&mut indices)).unwrap();
/// assert_eq!(out, [3.0, 6.0]);
/// assert_eq!(indices, [2, 5]);
/// ```
pub fn reduce<E: Dtype>(
    inp: &[E],
    layout: &ReduceLayout,
    spec: &ReduceSpec,
    alpha: E,
    beta: E,
    out: &mut [E],
    indices: Option<&mut [u32]>,
) -> Result<(), Error> {
    Error::check_len(layout.input().num_elements(), inp.len())?;
    Error::check_len(layout.output().num_elements(), out.len())?;
    let indices = match indices {
        Some(indices) if spec.produces_indices() => {
            Error::check_len(out.len(), indices.len())?;
            if inp.len() - 1 > u32::MAX as usize {
                return Err(Error::InvalidArgument(format!(
                    "{} input elements can't be indexed with 32 bit indices",
                    inp.len()
                )));
            }
            Some(indices)
        }
        _ => None,
    };

    let num_reduced = E::from_usize(layout.num_reduced()).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "{} reduced elements can't be represented as {}",
            layout.num_reduced(),
            E::DATA_TYPE
        ))
    })?;

    let kernel = Fold {
        idx: index_for_reductions(layout),
        inp,
        propagate_nan: spec.propagate_nan,
        num_reduced,
        alpha,
        beta,
    };

    match spec.op {
        ReduceOp::Add => kernel.run::<Add>(out, indices),
        ReduceOp::Mul => kernel.run::<Mul>(out, indices),
        ReduceOp::Min => kernel.run::<Min>(out, indices),
        ReduceOp::Max => kernel.run::<Max>(out, indices),
        ReduceOp::AMax => kernel.run::<AMax>(out, indices),
        ReduceOp::Avg => kernel.run::<Avg>(out, indices),
        ReduceOp::Norm1 => kernel.run::<Norm1>(out, indices),
        ReduceOp::Norm2 => kernel.run::<Norm2>(out, indices),
        ReduceOp::MulNoZeros => kernel.run::<MulNoZeros>(out, indices),
    }
    Ok(())
}

struct Fold<'a, E> {
    idx: ReductionIndex,
    inp: &'a [E],
    propagate_nan: bool,
    num_reduced: E,
    alpha: E,
    beta: E,
}

impl<'a, E: Dtype> Fold<'a, E> {
    /// Folds every element reduced into output element `i`, returning the
    /// result and the input index of the element an extremal fold selected.
    #[inline]
    fn fold<A: Accumulator<E>>(&self, i: usize) -> (E, usize) {
        let base = self.idx.bases.get_strided_index(i);
        let mut accum = A::init();
        let mut arg = base;
        for &offset in self.idx.reduced.iter() {
            let j = base + offset;
            let item = self.inp[j];
            if self.propagate_nan && item.is_nan() {
                return (item, j);
            }
            if A::accum(&mut accum, item) {
                arg = j;
            }
        }
        (A::finish(accum, self.num_reduced), arg)
    }

    #[inline]
    fn scale(&self, accum: E, prev: E) -> E {
        if self.beta == E::zero() {
            self.alpha * accum
        } else {
            self.alpha * accum + self.beta * prev
        }
    }

    fn run<A: Accumulator<E>>(&self, out: &mut [E], indices: Option<&mut [u32]>) {
        match indices {
            Some(indices) if A::EXTREMAL => {
                out.par_iter_mut()
                    .zip(indices.par_iter_mut())
                    .enumerate()
                    .for_each(|(i, (o, idx))| {
                        let (accum, arg) = self.fold::<A>(i);
                        *o = self.scale(accum, *o);
                        *idx = arg as u32;
                    });
            }
            _ => {
                out.par_iter_mut().enumerate().for_each(|(i, o)| {
                    let (accum, _) = self.fold::<A>(i);
                    *o = self.scale(accum, *o);
                });
            }
        }
    }
}

impl<E: Dtype> ReduceKernel<E> for Cpu {
    fn try_reduce(
        &self,
        layout: &ReduceLayout,
        spec: &ReduceSpec,
        alpha: E,
        beta: E,
        inp: &Vec<E>,
        out: &mut Vec<E>,
        indices: Option<&mut Vec<u32>>,
    ) -> Result<(), Error> {
        reduce(
            inp,
            layout,
            spec,
            alpha,
            beta,
            out,
            indices.map(|v| v.as_mut_slice()),
        )
    }
}
