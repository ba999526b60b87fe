//! Repeated-trial experiments.
//!
//! Each trial builds a fresh circuit and initial state, evolves the state and
//! measures it once. Trials are independent, so they can run sequentially or
//! be split across a `rayon` pool:
//!
//! - trials are divided into contiguous chunks, one per worker
//! - worker `w` owns a [`StdRng`] seeded with [`derive_seed`]`(base, w)`
//! - each worker counts into its own [`Tally`]; tallies are merged at the end
//!
//! The same base seed and worker count always give the same result.

use std::ops::Range;
use std::time::Instant;

use qsim_core::{AmplitudeVector, Circuit, NORM_TOLERANCE, QsimResult, check_tolerance};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::config::{ExperimentConfig, RunnerConfig};
use crate::error::{RunnerError, RunnerResult};
use crate::measurement::{Sampler, measure_with_tolerance};
use crate::result::{ExperimentResult, Tally};

/// The circuit and initial state of one trial.
#[derive(Debug, Clone)]
pub struct TrialSetup {
    pub circuit: Circuit,
    pub initial: AmplitudeVector,
}

impl TrialSetup {
    pub fn new(circuit: Circuit, initial: AmplitudeVector) -> Self {
        Self { circuit, initial }
    }

    /// Start `circuit` from `|0...0⟩`.
    pub fn from_zero(circuit: Circuit) -> QsimResult<Self> {
        let initial = AmplitudeVector::zero(circuit.num_qubits())?;
        Ok(Self { circuit, initial })
    }
}

/// Produces the setup for each trial.
///
/// Implemented for every `Fn(usize) -> QsimResult<TrialSetup> + Sync`; the
/// argument is the trial number.
pub trait CircuitFactory: Sync {
    fn build(&self, trial: usize) -> QsimResult<TrialSetup>;
}

impl<F> CircuitFactory for F
where
    F: Fn(usize) -> QsimResult<TrialSetup> + Sync,
{
    fn build(&self, trial: usize) -> QsimResult<TrialSetup> {
        self(trial)
    }
}

/// Seed of worker `worker` for base seed `base`.
pub fn derive_seed(base: u64, worker: usize) -> u64 {
    base ^ (worker as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Runs experiments according to an [`ExperimentConfig`].
#[derive(Debug, Clone)]
pub struct ExperimentRunner {
    config: ExperimentConfig,
    tolerance: f64,
}

impl ExperimentRunner {
    pub fn new(config: ExperimentConfig) -> Self {
        Self {
            config,
            tolerance: NORM_TOLERANCE,
        }
    }

    /// Build a runner from the experiment and simulation sections.
    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(config.experiment.clone()).with_tolerance(config.simulation.tolerance)
    }

    /// Normalization tolerance used when measuring.
    ///
    /// Checked when the runner starts; it must lie in `(0, 1)`.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Run `config.trials` trials and count the outcomes.
    ///
    /// The first failing trial aborts the experiment.
    #[instrument(skip_all, fields(trials = self.config.trials, workers = self.config.workers))]
    pub fn run<F: CircuitFactory + ?Sized>(&self, factory: &F) -> RunnerResult<ExperimentResult> {
        let trials = self.config.trials;
        if trials == 0 {
            return Err(RunnerError::InvalidTrials(trials));
        }
        check_tolerance(self.tolerance)?;
        if self.config.workers == 0 {
            return Err(RunnerError::InvalidWorkers(self.config.workers));
        }

        let start = Instant::now();
        let base_seed = self.base_seed();
        let workers = self.config.workers.min(trials);
        debug!(base_seed, workers, "Starting experiment");

        let tally = if workers == 1 {
            self.run_chunk(factory, 0..trials, derive_seed(base_seed, 0))?
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|e| RunnerError::ThreadPool(e.to_string()))?;
            pool.install(|| {
                (0..workers)
                    .into_par_iter()
                    .map(|worker| {
                        self.run_chunk(
                            factory,
                            chunk(trials, workers, worker),
                            derive_seed(base_seed, worker),
                        )
                    })
                    .try_reduce(Tally::new, Tally::merge)
            })?
        };

        let result = tally.finalize()?;
        debug!(
            outcomes = result.counts().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Experiment complete"
        );
        Ok(result)
    }

    /// Evolve `initial` once and sample it `shots` times.
    ///
    /// Equivalent in distribution to running `shots` trials of a fixed
    /// circuit, without re-running the circuit per shot.
    #[instrument(skip_all, fields(circuit = circuit.name(), shots))]
    pub fn sample_shots(
        &self,
        circuit: &Circuit,
        initial: &AmplitudeVector,
        shots: usize,
    ) -> RunnerResult<ExperimentResult> {
        if shots == 0 {
            return Err(RunnerError::InvalidTrials(shots));
        }
        check_tolerance(self.tolerance)?;

        let start = Instant::now();
        let state = circuit.run(initial)?;
        let sampler = Sampler::new(&state, self.tolerance)?;
        let mut rng = StdRng::seed_from_u64(derive_seed(self.base_seed(), 0));

        let mut tally = Tally::new();
        for (index, count) in sampler.sample_counts(shots, &mut rng) {
            tally.record_count(sampler.num_qubits(), index, count)?;
        }

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Shot sampling complete"
        );
        tally.finalize()
    }

    fn base_seed(&self) -> u64 {
        self.config.seed.unwrap_or_else(|| {
            let seed = rand::random::<u64>();
            info!(seed, "No seed configured, using a random base seed");
            seed
        })
    }

    fn run_chunk<F: CircuitFactory + ?Sized>(
        &self,
        factory: &F,
        trials: Range<usize>,
        seed: u64,
    ) -> RunnerResult<Tally> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tally = Tally::new();
        for trial in trials {
            let setup = factory.build(trial)?;
            let state = setup.circuit.run(&setup.initial)?;
            let outcome = measure_with_tolerance(&state, self.tolerance, &mut rng)?;
            tally.record(outcome)?;
        }
        Ok(tally)
    }
}

/// Trial range of `worker` when `trials` are split over `workers`.
fn chunk(trials: usize, workers: usize, worker: usize) -> Range<usize> {
    (worker * trials / workers)..((worker + 1) * trials / workers)
}
