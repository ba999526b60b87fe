//! qsim Experiment Runner
//!
//! Measurement sampling and repeated-trial experiments.
//!
//! Builds on [`qsim_core`]: a [`Sampler`] draws basis-state outcomes from an
//! evolved [`AmplitudeVector`](qsim_core::AmplitudeVector) according to the
//! Born rule, and an [`ExperimentRunner`] repeats circuit construction,
//! execution and measurement over many trials, optionally in parallel.
//!
//! Randomness is always injected. Seed a generator for reproducible
//! measurements, or set [`ExperimentConfig::seed`] for reproducible
//! experiments.
//!
//! # Quick start
//!
//! ```rust
//! use qsim_core::Circuit;
//! use qsim_experiment::{ExperimentConfig, ExperimentRunner, TrialSetup};
//!
//! // Fair coin: H on |0⟩, measured 1000 times
//! let runner = ExperimentRunner::new(ExperimentConfig::default().with_seed(42));
//! let result = runner.run(&|_trial: usize| {
//!     let mut circuit = Circuit::new(1)?;
//!     circuit.h(0)?;
//!     TrialSetup::from_zero(circuit)
//! })?;
//!
//! assert_eq!(result.trials(), 1000);
//! assert!((result.frequency(0) - 0.5).abs() < 0.1);
//! # Ok::<(), qsim_experiment::RunnerError>(())
//! ```

pub mod config;
pub mod error;
pub mod experiment;
pub mod measurement;
pub mod result;

pub use config::{ConfigError, ExperimentConfig, LoggingConfig, RunnerConfig, SimulationConfig};
pub use error::{RunnerError, RunnerResult};
pub use experiment::{CircuitFactory, ExperimentRunner, TrialSetup, derive_seed};
pub use measurement::{MeasurementOutcome, Sampler, measure, measure_with_tolerance};
pub use result::{ExperimentResult, Tally};
