use crate::dtypes::Dtype;

/// The fold of one [super::ReduceOp].
pub(super) trait Accumulator<E: Dtype> {
    /// Whether `accum` selects one of its operands.
    const EXTREMAL: bool = false;

    fn init() -> E;

    /// Folds `item` into `accum`. Returns true if `item` became the new extremum.
    fn accum(accum: &mut E, item: E) -> bool;

    /// Post-processing once all `num_reduced` elements are folded in.
    #[inline(always)]
    fn finish(accum: E, _num_reduced: E) -> E {
        accum
    }
}

pub(super) struct Add;
impl<E: Dtype> Accumulator<E> for Add {
    #[inline(always)]
    fn init() -> E {
        E::zero()
    }
    #[inline(always)]
    fn accum(accum: &mut E, item: E) -> bool {
        *accum += item;
        false
    }
}

pub(super) struct Mul;
impl<E: Dtype> Accumulator<E> for Mul {
    #[inline(always)]
    fn init() -> E {
        E::one()
    }
    #[inline(always)]
    fn accum(accum: &mut E, item: E) -> bool {
        *accum *= item;
        false
    }
}

pub(super) struct MulNoZeros;
impl<E: Dtype> Accumulator<E> for MulNoZeros {
    #[inline(always)]
    fn init() -> E {
        E::one()
    }
    #[inline(always)]
    fn accum(accum: &mut E, item: E) -> bool {
        if item != E::zero() {
            *accum *= item;
        }
        false
    }
}

// NaN operands fail the strict comparisons below, so extremal folds skip
// them unless the kernel propagates NaN itself.

pub(super) struct Min;
impl<E: Dtype> Accumulator<E> for Min {
    const EXTREMAL: bool = true;
    #[inline(always)]
    fn init() -> E {
        E::infinity()
    }
    #[inline(always)]
    fn accum(accum: &mut E, item: E) -> bool {
        let replaced = item < *accum;
        if replaced {
            *accum = item;
        }
        replaced
    }
}

pub(super) struct Max;
impl<E: Dtype> Accumulator<E> for Max {
    const EXTREMAL: bool = true;
    #[inline(always)]
    fn init() -> E {
        E::neg_infinity()
    }
    #[inline(always)]
    fn accum(accum: &mut E, item: E) -> bool {
        let replaced = item > *accum;
        if replaced {
            *accum = item;
        }
        replaced
    }
}

pub(super) struct AMax;
impl<E: Dtype> Accumulator<E> for AMax {
    const EXTREMAL: bool = true;
    #[inline(always)]
    fn init() -> E {
        E::zero()
    }
    #[inline(always)]
    fn accum(accum: &mut E, item: E) -> bool {
        let item = item.abs();
        let replaced = item > *accum;
        if replaced {
            *accum = item;
        }
        replaced
    }
}

pub(super) struct Avg;
impl<E: Dtype> Accumulator<E> for Avg {
    #[inline(always)]
    fn init() -> E {
        E::zero()
    }
    #[inline(always)]
    fn accum(accum: &mut E, item: E) -> bool {
        *accum += item;
        false
    }
    #[inline(always)]
    fn finish(accum: E, num_reduced: E) -> E {
        accum / num_reduced
    }
}

pub(super) struct Norm1;
impl<E: Dtype> Accumulator<E> for Norm1 {
    #[inline(always)]
    fn init() -> E {
        E::zero()
    }
    #[inline(always)]
    fn accum(accum: &mut E, item: E) -> bool {
        *accum += item.abs();
        false
    }
}

pub(super) struct Norm2;
impl<E: Dtype> Accumulator<E> for Norm2 {
    #[inline(always)]
    fn init() -> E {
        E::zero()
    }
    #[inline(always)]
    fn accum(accum: &mut E, item: E) -> bool {
        *accum += item * item;
        false
    }
    #[inline(always)]
    fn finish(accum: E, _num_reduced: E) -> E {
        accum.sqrt()
    }
}
