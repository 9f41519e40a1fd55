//! Module for data type related traits and enums. Contains things like [Unit], [Dtype], and [DataType].
//!
//! Reductions are computed in the element type itself, so the compute type of a
//! reduction is always the same as its [DataType].

pub use half::f16;

use crate::tensor::Error;

/// Represents a type where all 0 bits is a valid pattern.
#[cfg(not(feature = "cuda"))]
pub trait SafeZeros {}

/// Represents a type where all 0 bits is a valid pattern.
#[cfg(feature = "cuda")]
pub trait SafeZeros: cudarc::driver::ValidAsZeroBits + cudarc::driver::DeviceRepr {}

/// Represents a unit type, but no arithmetic.
pub trait Unit:
    'static
    + Copy
    + Clone
    + Default
    + std::fmt::Debug
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + std::marker::Unpin
    + SafeZeros
{
    const ONE: Self;
}

macro_rules! unit {
    ($type:ty, $one:expr) => {
        impl SafeZeros for $type {}
        impl Unit for $type {
            const ONE: Self = $one;
        }
    };
}

unit!(f32, 1.0);
unit!(f64, 1.0);
unit!(f16, f16::ONE);
unit!(u32, 1);

/// Represents a floating point element that reductions can be computed on.
///
/// The main difference between [Dtype] and [Unit] is that [`u32`] (the type
/// of flattened indices) is [Unit], but not [Dtype].
pub trait Dtype:
    Unit
    + num_traits::Float
    + num_traits::FromPrimitive
    + num_traits::ToPrimitive
    + std::ops::AddAssign
    + std::ops::MulAssign
    + std::fmt::Display
{
    /// The runtime tag of this element type.
    const DATA_TYPE: DataType;
}

impl Dtype for f32 {
    const DATA_TYPE: DataType = DataType::Float;
}

impl Dtype for f64 {
    const DATA_TYPE: DataType = DataType::Double;
}

impl Dtype for f16 {
    const DATA_TYPE: DataType = DataType::Half;
}

/// Runtime tag for the precision of a tensor's elements.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 32-bit IEEE float.
    #[default]
    Float,
    /// 64-bit IEEE float.
    Double,
    /// 16-bit IEEE float.
    Half,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Float => "float",
            Self::Double => "double",
            Self::Half => "half",
        })
    }
}

impl std::str::FromStr for DataType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "float" | "f32" => Ok(Self::Float),
            "double" | "f64" => Ok(Self::Double),
            "half" | "f16" => Ok(Self::Half),
            other => Err(Error::InvalidArgument(format!(
                "unknown data type `{other}` (expected float, double or half)"
            ))),
        }
    }
}
