//! Command line arguments and the benchmark configuration built from them.

use clap::Parser;
use strided_reduce_core::{
    dtypes::DataType,
    shapes::{resolve, ReduceLayout},
    tensor::Error,
    tensor_ops::{ReduceOp, ReduceSpec},
};

/// Benchmarks an N-dimensional tensor reduction and checks it against the
/// host reference kernel.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "reduce-bench")]
#[command(version)]
pub struct Args {
    /// The lengths of the input tensor dimensions, e.g. `64,320,80`
    #[arg(long = "dimLengths", value_delimiter = ',', required = true)]
    pub dim_lengths: Vec<usize>,

    /// The indexes of the dimensions to reduce, e.g. `0,1`
    #[arg(long = "reduceDims", value_delimiter = ',', required = true)]
    pub reduce_dims: Vec<usize>,

    /// The id of the reduce operation (0 for add, 1 for mul, 2 for min, ...) or its name
    #[arg(long = "reduceOp", default_value_t)]
    pub reduce_op: ReduceOp,

    /// Enable NaN propagation
    #[arg(long = "nanPropa")]
    pub nan_propa: bool,

    /// Enable the reduce indices
    #[arg(long)]
    pub indices: bool,

    /// Verify the device computed result by comparing to the host computed result
    #[arg(long)]
    pub verify: bool,

    /// Element type of the tensors
    #[arg(long = "dataType", default_value_t)]
    pub data_type: DataType,

    /// Seed of the random input
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

/// A validated benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub layout: ReduceLayout,
    pub spec: ReduceSpec,
    pub data_type: DataType,
    pub verify: bool,
    pub seed: u64,
}

impl TryFrom<&Args> for BenchConfig {
    type Error = Error;
    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let layout = resolve(&args.dim_lengths, &args.reduce_dims)?;
        let spec = ReduceSpec::new(args.reduce_op)
            .with_nan_propagation(args.nan_propa)
            .with_indices(args.indices);
        if args.indices && !spec.produces_indices() {
            tracing::info!(op = %spec.op, "indices are only produced by min, max and amax");
        }
        Ok(Self {
            layout,
            spec,
            data_type: args.data_type,
            verify: args.verify,
            seed: args.seed,
        })
    }
}

impl TryFrom<Args> for BenchConfig {
    type Error = Error;
    fn try_from(args: Args) -> Result<Self, Self::Error> {
        Self::try_from(&args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("reduce-bench").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_minimal() {
        let args = parse(&["--dimLengths", "64,320,80", "--reduceDims", "0,1"]).unwrap();
        assert_eq!(args.dim_lengths, [64, 320, 80]);
        assert_eq!(args.reduce_dims, [0, 1]);
        assert_eq!(args.reduce_op, ReduceOp::Add);
        assert!(!args.nan_propa);
        assert!(!args.indices);
        assert!(!args.verify);
        assert_eq!(args.data_type, DataType::Float);
        assert_eq!(args.seed, 0);
    }

    #[test]
    fn test_parse_everything() {
        let args = parse(&[
            "--dimLengths=4,5",
            "--reduceDims=1",
            "--reduceOp",
            "3",
            "--nanPropa",
            "--indices",
            "--verify",
            "--dataType",
            "double",
            "--seed",
            "7",
        ])
        .unwrap();
        assert_eq!(args.reduce_op, ReduceOp::Max);
        assert!(args.nan_propa && args.indices && args.verify);
        assert_eq!(args.data_type, DataType::Double);
        assert_eq!(args.seed, 7);

        let config = BenchConfig::try_from(&args).unwrap();
        assert_eq!(config.layout.output().lengths(), &[4, 1]);
        assert_eq!(
            config.spec,
            ReduceSpec::new(ReduceOp::Max)
                .with_nan_propagation(true)
                .with_indices(true)
        );
        assert!(config.verify);
    }

    #[test]
    fn test_reduce_op_by_name() {
        let args = parse(&["--dimLengths", "4", "--reduceDims", "0", "--reduceOp", "norm2"]).unwrap();
        assert_eq!(args.reduce_op, ReduceOp::Norm2);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--dimLengths", "4,5"]).is_err());
        assert!(parse(&["--dimLengths", "4,x", "--reduceDims", "0"]).is_err());
        assert!(parse(&["--dimLengths", "4,5", "--reduceDims", "-1"]).is_err());
        assert!(parse(&["--dimLengths", "4", "--reduceDims", "0", "--reduceOp", "9"]).is_err());
        assert!(parse(&["--dimLengths", "4", "--reduceDims", "0", "--dataType", "int8"]).is_err());
        assert!(parse(&["--dimLengths", "4", "--reduceDims", "0", "--bogus"]).is_err());
    }

    #[test]
    fn test_help_is_not_a_failure() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_invalid_layouts_are_rejected() {
        let args = parse(&["--dimLengths", "4,5", "--reduceDims", "2"]).unwrap();
        assert!(matches!(
            BenchConfig::try_from(&args),
            Err(Error::InvalidArgument(_))
        ));

        let args = parse(&["--dimLengths", "4", "--reduceDims", "0,0"]).unwrap();
        assert!(BenchConfig::try_from(&args).is_err());

        let args = parse(&["--dimLengths", "4,0", "--reduceDims", "0"]).unwrap();
        assert!(BenchConfig::try_from(args).is_err());

        let lengths = format!("{},2", usize::MAX);
        let args = parse(&["--dimLengths", &lengths, "--reduceDims", "0"]).unwrap();
        assert!(matches!(
            BenchConfig::try_from(&args),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
