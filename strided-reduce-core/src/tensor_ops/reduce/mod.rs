mod accumulator;
mod cpu_kernel;

#[cfg(feature = "cudnn")]
mod cudnn_kernel;

use crate::{
    dtypes::Dtype,
    shapes::ReduceLayout,
    tensor::{Error, Storage},
};

pub use cpu_kernel::reduce;

/// The operator a reduction folds elements with.
///
/// The discriminants are the operator ids shared by the cuDNN and MIOpen
/// reduce-tensor vocabularies, and are what the command line takes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ReduceOp {
    #[default]
    Add = 0,
    Mul = 1,
    Min = 2,
    Max = 3,
    /// Maximum of absolute values.
    AMax = 4,
    /// Arithmetic mean.
    Avg = 5,
    /// Sum of absolute values.
    Norm1 = 6,
    /// Square root of the sum of squares.
    Norm2 = 7,
    /// Product of the non-zero elements.
    MulNoZeros = 8,
}

impl ReduceOp {
    pub const ALL: [Self; 9] = [
        Self::Add,
        Self::Mul,
        Self::Min,
        Self::Max,
        Self::AMax,
        Self::Avg,
        Self::Norm1,
        Self::Norm2,
        Self::MulNoZeros,
    ];

    #[inline]
    pub const fn id(&self) -> u32 {
        *self as u32
    }

    /// Whether this operator selects one of its operands, and so can report
    /// which element it selected.
    #[inline]
    pub const fn is_extremal(&self) -> bool {
        matches!(self, Self::Min | Self::Max | Self::AMax)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Mul => "mul",
            Self::Min => "min",
            Self::Max => "max",
            Self::AMax => "amax",
            Self::Avg => "avg",
            Self::Norm1 => "norm1",
            Self::Norm2 => "norm2",
            Self::MulNoZeros => "mul_no_zeros",
        }
    }
}

impl TryFrom<u32> for ReduceOp {
    type Error = Error;
    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|op| op.id() == id)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown reduce op id {id}")))
    }
}

impl std::str::FromStr for ReduceOp {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.parse::<u32>() {
            Ok(id) => Self::try_from(id),
            Err(_) => Self::ALL
                .into_iter()
                .find(|op| op.name().eq_ignore_ascii_case(s))
                .ok_or_else(|| Error::InvalidArgument(format!("unknown reduce op `{s}`"))),
        }
    }
}

impl std::fmt::Display for ReduceOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Describes how a reduction combines elements. Which axes are reduced is
/// described by the [ReduceLayout] it runs with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReduceSpec {
    pub op: ReduceOp,
    /// Any NaN met while folding makes the result NaN.
    pub propagate_nan: bool,
    /// Record the flattened input index of the selected element. Only has an
    /// effect for [ReduceOp::is_extremal] operators.
    pub track_indices: bool,
}

impl ReduceSpec {
    pub fn new(op: ReduceOp) -> Self {
        Self {
            op,
            ..Default::default()
        }
    }

    pub fn with_nan_propagation(mut self, propagate_nan: bool) -> Self {
        self.propagate_nan = propagate_nan;
        self
    }

    pub fn with_indices(mut self, track_indices: bool) -> Self {
        self.track_indices = track_indices;
        self
    }

    /// Whether a reduction with this spec produces indices.
    #[inline]
    pub fn produces_indices(&self) -> bool {
        self.track_indices && self.op.is_extremal()
    }

    /// Number of indices a reduction over `layout` produces, 0 if it produces none.
    pub fn indices_len(&self, layout: &ReduceLayout) -> usize {
        if self.produces_indices() {
            layout.output().num_elements()
        } else {
            0
        }
    }
}

/// Runs reductions on buffers owned by a device.
///
/// Computes `out = alpha * reduce(inp) + beta * out`. `out` is only read when
/// `beta` is non-zero. When `spec` [produces indices](ReduceSpec::produces_indices)
/// and `indices` is given, it receives the flattened row-major input index of
/// every selected element.
pub trait ReduceKernel<E: Dtype>: Storage<E> + Storage<u32> {
    #[allow(clippy::too_many_arguments)]
    fn try_reduce(
        &self,
        layout: &ReduceLayout,
        spec: &ReduceSpec,
        alpha: E,
        beta: E,
        inp: &<Self as Storage<E>>::Vec,
        out: &mut <Self as Storage<E>>::Vec,
        indices: Option<&mut <Self as Storage<u32>>::Vec>,
    ) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{shapes::resolve, tensor::Cpu, tests::*};

    #[test]
    fn test_op_ids_round_trip() {
        for op in ReduceOp::ALL {
            assert_eq!(ReduceOp::try_from(op.id()).unwrap(), op);
        }
        assert!(ReduceOp::try_from(9).is_err());
    }

    #[test]
    fn test_parse_op() {
        assert_eq!("0".parse::<ReduceOp>().unwrap(), ReduceOp::Add);
        assert_eq!("3".parse::<ReduceOp>().unwrap(), ReduceOp::Max);
        assert_eq!("AMAX".parse::<ReduceOp>().unwrap(), ReduceOp::AMax);
        assert_eq!("norm2".parse::<ReduceOp>().unwrap(), ReduceOp::Norm2);
        assert!("42".parse::<ReduceOp>().is_err());
        assert!("median".parse::<ReduceOp>().is_err());
    }

    #[test]
    fn test_indices_len() {
        let layout = resolve(&[4, 5], &[1]).unwrap();
        let max = ReduceSpec::new(ReduceOp::Max);
        assert_eq!(max.indices_len(&layout), 0);
        assert_eq!(max.with_indices(true).indices_len(&layout), 4);
        let add = ReduceSpec::new(ReduceOp::Add).with_indices(true);
        assert!(!add.produces_indices());
        assert_eq!(add.indices_len(&layout), 0);
    }

    #[test]
    fn test_kernel_through_device_buffers() {
        let dev: TestDevice = Default::default();
        let layout = resolve(&[2, 3], &[1]).unwrap();
        let spec = ReduceSpec::new(ReduceOp::Min).with_indices(true);
        let inp = Storage::<TestDtype>::try_upload(&dev, &[3.0, 1.0, 2.0, -4.0, 5.0, -4.0]).unwrap();
        let mut out = Storage::<TestDtype>::try_alloc_zeros(&dev, 2).unwrap();
        let mut idx = Storage::<u32>::try_alloc_zeros(&dev, spec.indices_len(&layout)).unwrap();
        ReduceKernel::<TestDtype>::try_reduce(
            &dev,
            &layout,
            &spec,
            1.0,
            0.0,
            &inp,
            &mut out,
            Some(&mut idx),
        )
        .unwrap();
        assert_eq!(Storage::<TestDtype>::try_download(&dev, &out).unwrap(), [1.0, -4.0]);
        // cuDNN counts indices within each reduced slice
        #[cfg(not(feature = "cudnn"))]
        assert_eq!(Storage::<u32>::try_download(&dev, &idx).unwrap(), [1, 3]);
        #[cfg(feature = "cudnn")]
        assert_eq!(Storage::<u32>::try_download(&dev, &idx).unwrap(), [1, 0]);
    }

    #[test]
    fn test_cpu_is_a_reduce_kernel() {
        fn assert_kernel<D: ReduceKernel<f32> + ReduceKernel<f64>>() {}
        assert_kernel::<Cpu>();
    }
}
