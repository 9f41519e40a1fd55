use crate::{shapes::ReduceLayout, tensor::cpu::NdIndex};
use std::vec::Vec;

/// Splits the input of a reduction into the two coordinate spaces the
/// reference kernel walks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReductionIndex {
    /// Walks the invariant axes with input strides. The `i`th coordinate is the
    /// input offset where the fold for output element `i` starts.
    pub(crate) bases: NdIndex,
    /// Input offsets, relative to a base, of every element folded into one
    /// output element, in row-major order of the reduced axes.
    pub(crate) reduced: Vec<usize>,
}

/// Builds the [ReductionIndex] of a reduction.
///
/// For example reducing (2, 3, 4) along axis 1 walks bases over shape (2, 4)
/// with strides (12, 1), and folds offsets `[0, 4, 8]` into every base.
pub(crate) fn index_for_reductions(layout: &ReduceLayout) -> ReductionIndex {
    let lengths = layout.input().lengths();
    let strides = layout.input().strides();

    let (base_shape, base_strides) = layout
        .invariant_axes()
        .iter()
        .map(|&ax| (lengths[ax], strides[ax]))
        .unzip();
    let bases = NdIndex::new(base_shape, base_strides);

    let (red_shape, red_strides) = layout
        .reduced_axes()
        .iter()
        .map(|&ax| (lengths[ax], strides[ax]))
        .unzip();
    let mut walk = NdIndex::new(red_shape, red_strides);
    let mut reduced = Vec::with_capacity(walk.num_elements());
    while let Some(i) = walk.next() {
        reduced.push(i);
    }

    debug_assert_eq!(bases.num_elements(), layout.output().num_elements());
    ReductionIndex { bases, reduced }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::resolve;

    #[test]
    fn test_index_for_1d_reductions() {
        let layout = resolve(&[2, 3, 4], &[2]).unwrap();
        let idx = index_for_reductions(&layout);
        assert_eq!(idx.bases, NdIndex::new(std::vec![2, 3], std::vec![12, 4]));
        assert_eq!(idx.reduced, [0, 1, 2, 3]);

        let layout = resolve(&[2, 3, 4], &[1]).unwrap();
        let idx = index_for_reductions(&layout);
        assert_eq!(idx.bases, NdIndex::new(std::vec![2, 4], std::vec![12, 1]));
        assert_eq!(idx.reduced, [0, 4, 8]);

        let layout = resolve(&[2, 3, 4], &[0]).unwrap();
        let idx = index_for_reductions(&layout);
        assert_eq!(idx.bases, NdIndex::new(std::vec![3, 4], std::vec![4, 1]));
        assert_eq!(idx.reduced, [0, 12]);
    }

    #[test]
    fn test_index_for_2d_reductions() {
        let layout = resolve(&[2, 3, 4], &[0, 2]).unwrap();
        let idx = index_for_reductions(&layout);
        assert_eq!(idx.bases, NdIndex::new(std::vec![3], std::vec![4]));
        assert_eq!(idx.reduced, [0, 1, 2, 3, 12, 13, 14, 15]);
    }

    #[test]
    fn test_index_for_full_reduction() {
        let layout = resolve(&[2, 2], &[1, 0]).unwrap();
        let idx = index_for_reductions(&layout);
        assert_eq!(idx.bases.num_elements(), 1);
        assert_eq!(idx.bases.get_strided_index(0), 0);
        assert_eq!(idx.reduced, [0, 1, 2, 3]);
    }

    #[test]
    fn test_length_one_reduced_axis_on_both_sides() {
        let layout = resolve(&[3, 1, 2], &[1]).unwrap();
        let idx = index_for_reductions(&layout);
        assert_eq!(idx.bases, NdIndex::new(std::vec![3, 1, 2], std::vec![2, 2, 1]));
        assert_eq!(idx.reduced, [0]);
    }
}
