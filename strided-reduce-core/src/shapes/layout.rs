use crate::tensor::Error;
use std::vec::Vec;

/// Row-major strides for `lengths`: the last axis has stride 1 and every
/// preceding axis strides over the whole of the next one.
pub fn row_major_strides(lengths: &[usize]) -> Vec<usize> {
    let mut strides = std::vec![0; lengths.len()];
    if let Some(last) = strides.last_mut() {
        *last = 1;
    }
    for i in (0..lengths.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * lengths[i + 1];
    }
    strides
}

/// The lengths and dense C-order strides of a tensor.
///
/// Strides are always derived from the lengths, they can't be set on their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TensorLayout {
    lengths: Vec<usize>,
    strides: Vec<usize>,
}

impl TensorLayout {
    /// Builds a layout from axis lengths. Fails if there are no axes, if any
    /// axis has zero length, or if the element count doesn't fit a `usize`.
    pub fn try_new(lengths: Vec<usize>) -> Result<Self, Error> {
        if lengths.is_empty() {
            return Err(Error::InvalidArgument(
                "a tensor layout needs at least one axis".into(),
            ));
        }
        if let Some(axis) = lengths.iter().position(|&l| l == 0) {
            return Err(Error::InvalidArgument(format!(
                "axis {axis} has zero length in {lengths:?}"
            )));
        }
        // every stride is a suffix product, so it is bounded by the element count
        if lengths
            .iter()
            .try_fold(1usize, |acc, &l| acc.checked_mul(l))
            .is_none()
        {
            return Err(Error::InvalidArgument(format!(
                "{lengths:?} has more elements than a usize can count"
            )));
        }
        Ok(Self::from_lengths(lengths))
    }

    fn from_lengths(lengths: Vec<usize>) -> Self {
        let strides = row_major_strides(&lengths);
        Self { lengths, strides }
    }

    #[inline]
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.lengths.len()
    }

    #[inline]
    pub fn num_elements(&self) -> usize {
        self.lengths.iter().product()
    }
}

/// The input and output layouts of a reduction along with how their axes
/// are classified.
///
/// Produced by [resolve]. Immutable: a different shape or axis selection
/// means resolving a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReduceLayout {
    input: TensorLayout,
    output: TensorLayout,
    invariant_axes: Vec<usize>,
    reduced_axes: Vec<usize>,
}

impl ReduceLayout {
    #[inline]
    pub fn input(&self) -> &TensorLayout {
        &self.input
    }

    #[inline]
    pub fn output(&self) -> &TensorLayout {
        &self.output
    }

    /// Axes whose length is the same in the input and the output.
    ///
    /// Note that a length 1 axis that was asked to be reduced also ends up
    /// here, since its length doesn't change.
    #[inline]
    pub fn invariant_axes(&self) -> &[usize] {
        &self.invariant_axes
    }

    /// The reduced axes, sorted and without duplicates.
    #[inline]
    pub fn reduced_axes(&self) -> &[usize] {
        &self.reduced_axes
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.input.rank()
    }

    /// Number of input elements folded into each output element.
    pub fn num_reduced(&self) -> usize {
        self.reduced_axes
            .iter()
            .map(|&ax| self.input.lengths[ax])
            .product()
    }
}

/// Derives the output layout, both tensors' strides and the invariant axes
/// for reducing `input_lengths` along `reduced_axes`.
///
/// ```rust
/// # use strided_reduce_core::prelude::*;
/// let layout = resolve(&[2, 3], &[1]).unwrap();
/// assert_eq!(layout.output().lengths(), &[2, 1]);
/// assert_eq!(layout.input().strides(), &[3, 1]);
/// assert_eq!(layout.output().strides(), &[1, 1]);
/// assert_eq!(layout.invariant_axes(), &[0]);
/// ```
pub fn resolve(input_lengths: &[usize], reduced_axes: &[usize]) -> Result<ReduceLayout, Error> {
    if input_lengths.is_empty() {
        return Err(Error::InvalidArgument("no input dimension lengths".into()));
    }
    if reduced_axes.is_empty() {
        return Err(Error::InvalidArgument("no dimensions to reduce".into()));
    }
    let rank = input_lengths.len();
    if reduced_axes.len() > rank {
        return Err(Error::InvalidArgument(format!(
            "{} dimensions to reduce but the input only has {rank}",
            reduced_axes.len()
        )));
    }
    if let Some(&ax) = reduced_axes.iter().find(|&&ax| ax >= rank) {
        return Err(Error::InvalidArgument(format!(
            "dimension {ax} to reduce is out of range for rank {rank}"
        )));
    }

    let input = TensorLayout::try_new(input_lengths.to_vec())?;

    let mut output_lengths = input_lengths.to_vec();
    for &ax in reduced_axes {
        output_lengths[ax] = 1;
    }
    let output = TensorLayout::from_lengths(output_lengths);

    let invariant_axes = (0..rank)
        .filter(|&i| input.lengths[i] == output.lengths[i])
        .collect();

    let mut reduced_axes = reduced_axes.to_vec();
    reduced_axes.sort_unstable();
    reduced_axes.dedup();

    Ok(ReduceLayout {
        input,
        output,
        invariant_axes,
        reduced_axes,
    })
}
