//! `reduce-bench`: benchmark a strided tensor reduction on the default device.
//!
//! ```bash
//! # sum a 64x320x80 tensor over its first two dims and check the result
//! reduce-bench --dimLengths 64,320,80 --reduceDims 0,1 --verify
//!
//! # max over the last dim, tracking where each maximum came from
//! reduce-bench --dimLengths 64,320,80 --reduceDims 2 --reduceOp 3 --indices
//! ```
//!
//! Logging is controlled with `RUST_LOG`.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use strided_reduce::{
    app::{execute, Outcome},
    config::{Args, BenchConfig},
};

#[cfg(feature = "cudnn")]
type Dev = strided_reduce::tensor::Cuda;

#[cfg(not(feature = "cudnn"))]
type Dev = strided_reduce::tensor::Cpu;

#[cfg(feature = "cudnn")]
fn open_device() -> Result<Dev> {
    Dev::try_build(0).context("failed to open cuda device 0")
}

#[cfg(not(feature = "cudnn"))]
fn open_device() -> Result<Dev> {
    Ok(Dev::default())
}

/// `RUST_LOG` if it is set and valid, `info` otherwise.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();

    let args = Args::parse();
    let config = BenchConfig::try_from(&args).context("invalid reduction arguments")?;

    let dev = open_device()?;
    tracing::info!(
        device = std::any::type_name::<Dev>(),
        dtype = %config.data_type,
        op = %config.spec.op,
        "running reduction"
    );

    let summary = execute(dev, &config).context("reduction failed")?;

    // a failed verification is reported above and doesn't change the exit code
    if let Outcome::Failed { max_error } = summary.outcome {
        tracing::debug!(max_error, "finished with a failed verification");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_rust_log_sets_verbosity() {
        std::env::set_var("RUST_LOG", "debug");
        assert_eq!(env_filter().max_level_hint(), Some(LevelFilter::DEBUG));

        std::env::set_var("RUST_LOG", "warn");
        assert_eq!(env_filter().max_level_hint(), Some(LevelFilter::WARN));

        std::env::remove_var("RUST_LOG");
        assert_eq!(env_filter().max_level_hint(), Some(LevelFilter::INFO));
    }
}
