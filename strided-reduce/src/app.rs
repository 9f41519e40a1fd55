//! Sequences a benchmark run on a device.
//!
//! 1. [BenchApp::prepare] generates a uniform random input on the host, uploads
//!    it and allocates a zeroed output (and an index buffer when the reduction
//!    produces indices)
//! 2. [BenchApp::run] reduces once to warm up, optionally checks that result
//!    against the host reference kernel, then reduces again under the timer
//! 3. [BenchApp::show_test] prints the solving time line

use num_traits::ToPrimitive;
use rand_distr::uniform::SampleUniform;
use strided_reduce_core::{
    dtypes::{f16, DataType, Dtype},
    tensor::{Cpu, Error, RandomFill, Storage, Synchronize},
    tensor_ops::ReduceKernel,
    verify::{default_tolerance, ReferenceCheck, UnsupportedConfiguration, Verdict},
};

use crate::{config::BenchConfig, timer::AppTimer};

/// Output of [BenchApp::run], copied back to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport<E> {
    /// Output of the timed reduction.
    pub output: Vec<E>,
    /// Indices of the timed reduction, if it produces any.
    pub indices: Option<Vec<u32>>,
    /// `None` unless verification was requested.
    pub verdict: Option<Verdict<E>>,
}

/// How a benchmark run ended, independent of the element type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Unverified,
    Passed { max_error: f64 },
    Failed { max_error: f64 },
    Skipped(UnsupportedConfiguration),
}

impl<E: Dtype> From<&Option<Verdict<E>>> for Outcome {
    fn from(verdict: &Option<Verdict<E>>) -> Self {
        match verdict {
            None => Self::Unverified,
            Some(Verdict::Skipped(skipped)) => Self::Skipped(*skipped),
            Some(Verdict::Checked(v)) => {
                let max_error = v.max_abs_error.to_f64().unwrap_or(f64::NAN);
                if v.passed {
                    Self::Passed { max_error }
                } else {
                    Self::Failed { max_error }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchSummary {
    pub outcome: Outcome,
    pub timer: AppTimer,
}

/// A reduction benchmark with its buffers resident on `D`.
///
/// Buffers are owned by the app and released when it is dropped.
#[derive(Debug)]
pub struct BenchApp<E: Dtype, D: ReduceKernel<E>> {
    dev: D,
    config: BenchConfig,
    host_input: Vec<E>,
    inp: <D as Storage<E>>::Vec,
    out: <D as Storage<E>>::Vec,
    indices: Option<<D as Storage<u32>>::Vec>,
    timer: AppTimer,
}

impl<E, D> BenchApp<E, D>
where
    E: Dtype + SampleUniform,
    D: ReduceKernel<E> + Synchronize,
{
    pub fn prepare(dev: D, config: BenchConfig) -> Result<Self, Error> {
        let layout = &config.layout;

        let host = Cpu::seed_from_u64(config.seed);
        let mut host_input = Storage::<E>::try_alloc_zeros(&host, layout.input().num_elements())?;
        host.try_fill_uniform(&mut host_input, -E::ONE, E::ONE)?;

        let inp = Storage::<E>::try_upload(&dev, &host_input)?;
        let out = Storage::<E>::try_alloc_zeros(&dev, layout.output().num_elements())?;
        let indices = if config.spec.produces_indices() {
            Some(Storage::<u32>::try_alloc_zeros(
                &dev,
                config.spec.indices_len(layout),
            )?)
        } else {
            None
        };

        tracing::debug!(
            device = std::any::type_name::<D>(),
            dtype = %E::DATA_TYPE,
            input = ?layout.input().lengths(),
            output = ?layout.output().lengths(),
            op = %config.spec.op,
            "prepared reduction"
        );

        Ok(Self {
            dev,
            config,
            host_input,
            inp,
            out,
            indices,
            timer: AppTimer::start(),
        })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// The input that was uploaded to the device.
    pub fn host_input(&self) -> &[E] {
        &self.host_input
    }

    pub fn timer(&self) -> &AppTimer {
        &self.timer
    }

    fn reduce_once(&mut self) -> Result<(), Error> {
        ReduceKernel::<E>::try_reduce(
            &self.dev,
            &self.config.layout,
            &self.config.spec,
            E::ONE,
            E::zero(),
            &self.inp,
            &mut self.out,
            self.indices.as_mut(),
        )
    }

    fn download_indices(&self) -> Result<Option<Vec<u32>>, Error> {
        self.indices
            .as_ref()
            .map(|idx| Storage::<u32>::try_download(&self.dev, idx))
            .transpose()
    }

    fn check(&self, candidate: &[E]) -> Result<Verdict<E>, Error> {
        // the benchmark overwrites a zeroed output, so zeros are the previous values
        let previous = std::vec![E::zero(); candidate.len()];
        let check = ReferenceCheck {
            layout: &self.config.layout,
            spec: &self.config.spec,
            alpha: E::ONE,
            beta: E::zero(),
            tolerance: default_tolerance(),
        };
        let verdict = check.run(&self.host_input, &previous, candidate)?;
        if let Verdict::Checked(v) = &verdict {
            println!("max_error = {}", v.max_abs_error);
            if v.passed {
                println!("Verification succeeded!");
            } else {
                println!("Verification failed!");
            }
        }
        Ok(verdict)
    }

    pub fn run(&mut self) -> Result<RunReport<E>, Error> {
        self.timer = AppTimer::start();

        // the first invocation may include one-off setup work on the device
        self.reduce_once()?;
        let warm_up = Storage::<E>::try_download(&self.dev, &self.out)?;
        let verdict = if self.config.verify {
            Some(self.check(&warm_up)?)
        } else {
            None
        };

        self.dev.try_synchronize()?;
        self.timer.mark_exec_start();
        self.reduce_once()?;
        self.dev.try_synchronize()?;
        self.timer.mark_exec_end();

        Ok(RunReport {
            output: Storage::<E>::try_download(&self.dev, &self.out)?,
            indices: self.download_indices()?,
            verdict,
        })
    }

    pub fn show_test(&self) {
        self.timer.show_solving_time(
            self.config.layout.input().lengths(),
            self.config.layout.reduced_axes(),
        );
    }
}

fn run_typed<E, D>(dev: D, config: &BenchConfig) -> Result<BenchSummary, Error>
where
    E: Dtype + SampleUniform,
    D: ReduceKernel<E> + Synchronize,
{
    let mut app = BenchApp::<E, D>::prepare(dev, config.clone())?;
    let report = app.run()?;
    app.show_test();
    Ok(BenchSummary {
        outcome: Outcome::from(&report.verdict),
        timer: *app.timer(),
    })
}

/// Prepares and runs `config` on `dev` with the element type it names.
pub fn execute<D>(dev: D, config: &BenchConfig) -> Result<BenchSummary, Error>
where
    D: ReduceKernel<f32> + ReduceKernel<f64> + ReduceKernel<f16> + Synchronize,
{
    match config.data_type {
        DataType::Float => run_typed::<f32, D>(dev, config),
        DataType::Double => run_typed::<f64, D>(dev, config),
        DataType::Half => run_typed::<f16, D>(dev, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strided_reduce_core::{shapes::resolve, tensor_ops::ReduceOp, tensor_ops::ReduceSpec};

    fn config(lengths: &[usize], axes: &[usize], spec: ReduceSpec, verify: bool) -> BenchConfig {
        BenchConfig {
            layout: resolve(lengths, axes).unwrap(),
            spec,
            data_type: DataType::Float,
            verify,
            seed: 0,
        }
    }

    #[test]
    fn test_input_is_seeded_and_in_range() {
        let cfg = config(&[8, 16], &[1], ReduceSpec::new(ReduceOp::Add), false);
        let a = BenchApp::<f32, Cpu>::prepare(Cpu::default(), cfg.clone()).unwrap();
        let b = BenchApp::<f32, Cpu>::prepare(Cpu::default(), cfg).unwrap();
        assert_eq!(a.host_input().len(), 128);
        assert_eq!(a.host_input(), b.host_input());
        assert!(a.host_input().iter().all(|x| (-1.0..1.0).contains(x)));
    }

    #[test]
    fn test_run_sums_match_host_input() {
        let cfg = config(&[3, 5], &[1], ReduceSpec::new(ReduceOp::Add), true);
        let mut app = BenchApp::<f32, Cpu>::prepare(Cpu::default(), cfg).unwrap();
        let report = app.run().unwrap();
        let want: Vec<f32> = app
            .host_input()
            .chunks(5)
            .map(|row| row.iter().sum())
            .collect();
        assert_eq!(report.output, want);
        assert_eq!(report.indices, None);
        assert!(matches!(
            Outcome::from(&report.verdict),
            Outcome::Passed { max_error } if max_error == 0.0
        ));
    }

    #[test]
    fn test_run_with_indices() {
        let spec = ReduceSpec::new(ReduceOp::Max).with_indices(true);
        let cfg = config(&[4, 6], &[1], spec, true);
        let mut app = BenchApp::<f32, Cpu>::prepare(Cpu::default(), cfg).unwrap();
        let report = app.run().unwrap();
        let indices = report.indices.unwrap();
        assert_eq!(indices.len(), 4);
        for (row, &i) in indices.iter().enumerate() {
            assert_eq!(i as usize / 6, row);
            assert_eq!(app.host_input()[i as usize], report.output[row]);
        }
        assert!(matches!(
            Outcome::from(&report.verdict),
            Outcome::Skipped(UnsupportedConfiguration {
                op: ReduceOp::Max,
                ..
            })
        ));
    }

    #[test]
    fn test_outcome_from_verdict() {
        assert_eq!(Outcome::from(&None::<Verdict<f32>>), Outcome::Unverified);
    }

    #[test]
    fn test_execute_every_dtype() {
        for data_type in [DataType::Float, DataType::Double, DataType::Half] {
            let mut cfg = config(&[2, 3, 4], &[0, 2], ReduceSpec::new(ReduceOp::Add), true);
            cfg.data_type = data_type;
            let summary = execute(Cpu::default(), &cfg).unwrap();
            match data_type {
                DataType::Float => {
                    assert!(matches!(summary.outcome, Outcome::Passed { .. }))
                }
                _ => assert!(matches!(summary.outcome, Outcome::Skipped(_))),
            }
        }
    }
}
