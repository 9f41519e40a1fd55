/// Represents a number of different errors that can occur from resolving layouts
/// or launching reductions. This encompasses both Cpu and CUDA errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or out of range shape/axis data.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Two buffers that must have the same number of elements don't.
    #[error("size mismatch: expected {expected} elements, found {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    /// Device is out of memory
    #[error("out of memory")]
    OutOfMemory,
    #[cfg(feature = "cuda")]
    #[error("cuda driver error: {0:?}")]
    CudaDriverError(#[from] cudarc::driver::DriverError),
    #[cfg(feature = "cudnn")]
    #[error("cudnn error: {0:?}")]
    CudnnError(#[from] cudarc::cudnn::CudnnError),
}

impl Error {
    pub(crate) fn check_len(expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::SizeMismatch { expected, actual })
        }
    }
}
