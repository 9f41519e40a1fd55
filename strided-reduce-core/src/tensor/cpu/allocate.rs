use crate::{
    dtypes::Unit,
    tensor::{Error, RandomFill, Storage},
};

use super::Cpu;

use rand::distributions::Distribution;
use rand_distr::{uniform::SampleUniform, Uniform};
use std::vec::Vec;

impl Cpu {
    #[inline]
    pub(crate) fn try_alloc_elem<E: Unit>(&self, numel: usize, elem: E) -> Result<Vec<E>, Error> {
        let mut data: Vec<E> = Vec::new();
        data.try_reserve(numel).map_err(|_| Error::OutOfMemory)?;
        data.resize(numel, elem);
        Ok(data)
    }
}

impl<E: Unit> Storage<E> for Cpu {
    type Vec = Vec<E>;

    fn try_alloc_zeros(&self, len: usize) -> Result<Self::Vec, Error> {
        self.try_alloc_elem::<E>(len, Default::default())
    }

    fn try_upload(&self, src: &[E]) -> Result<Self::Vec, Error> {
        let mut data: Vec<E> = Vec::new();
        data.try_reserve(src.len()).map_err(|_| Error::OutOfMemory)?;
        data.extend_from_slice(src);
        Ok(data)
    }

    fn try_download(&self, src: &Self::Vec) -> Result<Vec<E>, Error> {
        Storage::<E>::try_upload(self, src)
    }

    fn len(&self, v: &Self::Vec) -> usize {
        v.len()
    }
}

impl RandomFill for Cpu {
    fn try_fill_uniform<E>(&self, dst: &mut [E], low: E, high: E) -> Result<(), Error>
    where
        E: Unit + SampleUniform,
    {
        if !(low < high) {
            return Err(Error::InvalidArgument(format!(
                "empty sampling range [{low:?}, {high:?})"
            )));
        }
        let dist = Uniform::new(low, high);
        let mut rng = self.rng.lock().unwrap();
        for x in dst.iter_mut() {
            *x = dist.sample(&mut *rng);
        }
        Ok(())
    }
}
