use std::vec::Vec;

use crate::dtypes::Unit;

use super::Error;

/// Something that can store flat buffers of `E` and move them to and from the host.
pub trait Storage<E: Unit>: 'static + std::fmt::Debug + Clone {
    /// Generic Storage type
    type Vec: 'static + std::fmt::Debug + Send + Sync;

    /// Allocates `len` zeroed elements.
    fn try_alloc_zeros(&self, len: usize) -> Result<Self::Vec, Error>;

    /// Allocates a buffer holding a copy of `src`.
    fn try_upload(&self, src: &[E]) -> Result<Self::Vec, Error>;

    /// Copies a buffer back into host memory.
    fn try_download(&self, src: &Self::Vec) -> Result<Vec<E>, Error>;

    fn len(&self, v: &Self::Vec) -> usize;
}

pub trait Synchronize {
    /// Blocks until all work on device to complete. Useful for benchmarking.
    fn synchronize(&self) {
        self.try_synchronize().unwrap()
    }

    /// Blocks until all work on device to complete. Useful for benchmarking.
    fn try_synchronize(&self) -> Result<(), Error>;
}

/// Fills host buffers with random values.
pub trait RandomFill {
    /// Fills `dst` with values drawn uniformly from `[low, high)`.
    fn try_fill_uniform<E>(&self, dst: &mut [E], low: E, high: E) -> Result<(), Error>
    where
        E: Unit + rand_distr::uniform::SampleUniform;
}
