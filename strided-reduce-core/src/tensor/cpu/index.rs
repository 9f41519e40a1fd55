use std::vec::Vec;

/// Walks a (shape, strides) pair in row-major order, yielding the strided
/// offset of every coordinate.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct NdIndex {
    pub(crate) indices: Vec<usize>,
    pub(crate) shape: Vec<usize>,
    pub(crate) strides: Vec<usize>,
    pub(crate) next: Option<usize>,
}

impl NdIndex {
    #[inline]
    pub(crate) fn new(shape: Vec<usize>, strides: Vec<usize>) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        let empty = shape.iter().any(|&d| d == 0);
        Self {
            indices: std::vec![0; shape.len()],
            shape,
            strides,
            next: (!empty).then_some(0),
        }
    }

    /// Number of coordinates this index walks over.
    #[inline]
    pub(crate) fn num_elements(&self) -> usize {
        self.shape.iter().product()
    }

    /// Strided offset of the `idx`th coordinate in row-major order.
    pub(crate) fn get_strided_index(&self, mut idx: usize) -> usize {
        let mut out = 0;

        for (dim, stride) in self.shape.iter().zip(self.strides.iter()).rev() {
            out += (idx % dim) * stride;
            idx /= dim;
        }

        out
    }

    #[inline(always)]
    pub(crate) fn next(&mut self) -> Option<usize> {
        let i = self.next.as_mut()?;
        let idx = *i;
        if self.shape.is_empty() {
            self.next = None;
            return Some(idx);
        }
        let mut dim = self.shape.len() - 1;
        loop {
            self.indices[dim] += 1;
            *i += self.strides[dim];

            if self.indices[dim] < self.shape[dim] {
                break;
            }

            *i -= self.shape[dim] * self.strides[dim];
            self.indices[dim] = 0;

            if dim == 0 {
                self.next = None;
                break;
            }

            dim -= 1;
        }
        Some(idx)
    }
}
