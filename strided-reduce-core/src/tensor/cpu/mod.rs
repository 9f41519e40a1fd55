mod allocate;
mod device;
mod index;

pub use device::Cpu;
pub(crate) use index::NdIndex;
