mod allocate;
mod device;

pub use device::Cuda;
