use crate::tensor::{Error, Synchronize};

use cudarc::driver::{CudaDevice, CudaSlice, DeviceSlice};
use std::sync::{Arc, Mutex, MutexGuard};

/// A Cuda device that holds buffers in GPU memory and runs reductions
/// through cuDNN.
///
/// Every buffer is a [CudaSlice], which frees its memory when dropped.
#[derive(Clone, Debug)]
pub struct Cuda {
    pub(crate) dev: Arc<CudaDevice>,
    pub(crate) cudnn: Arc<cudarc::cudnn::Cudnn>,
    /// Scratch space handed to cuDNN reductions, grown on demand.
    pub(crate) workspace: Arc<Mutex<CudaSlice<u8>>>,
}

impl Default for Cuda {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Cuda {
    /// Opens the device with the given ordinal. Panics if it can't be opened,
    /// see [Cuda::try_build].
    pub fn new(ordinal: usize) -> Self {
        Self::try_build(ordinal).unwrap()
    }

    /// Opens the device with the given ordinal along with a cuDNN handle.
    pub fn try_build(ordinal: usize) -> Result<Self, Error> {
        let dev = CudaDevice::new(ordinal)?;
        let cudnn = cudarc::cudnn::Cudnn::new(dev.clone())?;
        let workspace = Arc::new(Mutex::new(dev.alloc_zeros::<u8>(0)?));
        Ok(Self {
            dev,
            cudnn,
            workspace,
        })
    }

    pub(crate) fn get_workspace(
        &self,
        num_bytes: usize,
    ) -> Result<MutexGuard<CudaSlice<u8>>, Error> {
        let mut workspace = self.workspace.as_ref().lock().unwrap();

        // re-allocate a larger workspace
        if workspace.num_bytes() < num_bytes {
            *workspace = self.dev.alloc_zeros::<u8>(num_bytes)?;
        }

        Ok(workspace)
    }
}

impl Synchronize for Cuda {
    fn try_synchronize(&self) -> Result<(), Error> {
        self.dev.synchronize().map_err(Error::from)
    }
}
