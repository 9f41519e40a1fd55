//! # strided-reduce-core
//!
//! Strided N-dimensional tensor reductions: a host reference kernel that
//! accelerated reductions are checked against.
//!
//! A reduction collapses some axes of a tensor into length 1 axes by folding
//! every element along them with an associative operator ([tensor_ops::ReduceOp]).
//!
//! # Layouts
//!
//! *See [shapes] for more information.*
//!
//! Tensors are dense and row-major. [shapes::resolve] takes the input axis
//! lengths and the axes to reduce, and derives the output lengths, the strides
//! of both tensors, and which axes are invariant:
//!
//! ```rust
//! # use strided_reduce_core::prelude::*;
//! let layout = resolve(&[64, 320, 80], &[0, 1]).unwrap();
//! assert_eq!(layout.output().lengths(), &[1, 1, 80]);
//! assert_eq!(layout.invariant_axes(), &[2]);
//! ```
//!
//! # Devices
//!
//! *See [tensor] for more information.*
//!
//! 1. [tensor::Cpu] - host buffers, runs the reference kernel
//! 2. `tensor::Cuda` - GPU buffers, runs cuDNN reductions (feature `cudnn`)
//!
//! # Verification
//!
//! *See [verify] for more information.*
//!
//! [verify::ReferenceCheck] recomputes a reduction with the reference kernel
//! and compares it against what a device produced.
//!
//! # Feature flags
//!
//! - `cuda` - cudarc driver errors and device-safe dtypes
//! - `cudnn` - the [tensor] `Cuda` device (implies `cuda`)

pub mod dtypes;
pub mod shapes;
pub mod tensor;
pub mod tensor_ops;
pub mod verify;

/// Contains subset of all public exports.
pub mod prelude {
    pub use crate::dtypes::*;
    pub use crate::shapes::*;
    pub use crate::tensor::*;
    pub use crate::tensor_ops::*;
    pub use crate::verify::*;
}

#[cfg(test)]
pub(crate) mod tests {
    #[cfg(not(feature = "cudnn"))]
    pub type TestDevice = crate::tensor::Cpu;

    #[cfg(feature = "cudnn")]
    pub type TestDevice = crate::tensor::Cuda;

    #[cfg(not(feature = "test-f64"))]
    pub type TestDtype = f32;

    #[cfg(feature = "test-f64")]
    pub type TestDtype = f64;

    pub trait AssertClose {
        type Elem: std::fmt::Display + std::fmt::Debug + Copy;
        const DEFAULT_TOLERANCE: Self::Elem;
        fn get_default_tol(&self) -> Self::Elem {
            Self::DEFAULT_TOLERANCE
        }
        fn get_far_pair(
            &self,
            rhs: &Self,
            tolerance: Self::Elem,
        ) -> Option<(Self::Elem, Self::Elem)>;
        fn assert_close(&self, rhs: &Self, tolerance: Self::Elem)
        where
            Self: std::fmt::Debug,
        {
            if let Some((l, r)) = self.get_far_pair(rhs, tolerance) {
                panic!("lhs != rhs | {l} != {r}\n\n{self:?}\n\n{rhs:?}");
            }
        }
    }

    impl AssertClose for f32 {
        type Elem = f32;
        const DEFAULT_TOLERANCE: Self::Elem = 1e-6;
        fn get_far_pair(&self, rhs: &Self, tolerance: f32) -> Option<(f32, f32)> {
            if (self - rhs).abs() > tolerance {
                Some((*self, *rhs))
            } else {
                None
            }
        }
    }

    impl AssertClose for f64 {
        type Elem = f64;
        const DEFAULT_TOLERANCE: Self::Elem = 1e-6;
        fn get_far_pair(&self, rhs: &Self, tolerance: f64) -> Option<(f64, f64)> {
            if (self - rhs).abs() > tolerance {
                Some((*self, *rhs))
            } else {
                None
            }
        }
    }

    impl<T: AssertClose, const M: usize> AssertClose for [T; M] {
        type Elem = T::Elem;
        const DEFAULT_TOLERANCE: Self::Elem = T::DEFAULT_TOLERANCE;
        fn get_far_pair(
            &self,
            rhs: &Self,
            tolerance: Self::Elem,
        ) -> Option<(Self::Elem, Self::Elem)> {
            for (l, r) in self.iter().zip(rhs.iter()) {
                if let Some(pair) = l.get_far_pair(r, tolerance) {
                    return Some(pair);
                }
            }
            None
        }
    }

    pub fn assert_close<T: AssertClose + std::fmt::Debug>(a: &T, b: &T) {
        a.assert_close(b, a.get_default_tol())
    }
}
