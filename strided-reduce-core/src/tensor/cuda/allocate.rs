use crate::{
    dtypes::Unit,
    tensor::{Error, Storage},
};

use super::Cuda;

use cudarc::driver::{CudaSlice, DeviceSlice};
use std::vec::Vec;

impl<E: Unit> Storage<E> for Cuda {
    type Vec = CudaSlice<E>;

    fn try_alloc_zeros(&self, len: usize) -> Result<Self::Vec, Error> {
        Ok(self.dev.alloc_zeros::<E>(len)?)
    }

    fn try_upload(&self, src: &[E]) -> Result<Self::Vec, Error> {
        Ok(self.dev.htod_sync_copy(src)?)
    }

    fn try_download(&self, src: &Self::Vec) -> Result<Vec<E>, Error> {
        Ok(self.dev.dtoh_sync_copy(src)?)
    }

    fn len(&self, v: &Self::Vec) -> usize {
        v.len()
    }
}
