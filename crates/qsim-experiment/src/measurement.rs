//! Born-rule sampling of basis-state outcomes.
//!
//! Measurement never modifies the state; it only draws an index with
//! probability `|amplitude|²`. The random source is always passed in, so a
//! seeded generator makes every draw reproducible.

use std::fmt;

use qsim_core::{
    AmplitudeVector, NORM_TOLERANCE, QsimError, QsimResult, index_to_bitstring, qubit_mask,
};
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A sampled basis state of an `n`-qubit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeasurementOutcome {
    index: usize,
    num_qubits: usize,
}

impl MeasurementOutcome {
    pub fn new(index: usize, num_qubits: usize) -> Self {
        Self { index, num_qubits }
    }

    /// Basis index in `[0, 2^n)`.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The outcome as a bitstring, qubit 0 leftmost.
    pub fn bitstring(&self) -> String {
        index_to_bitstring(self.index, self.num_qubits)
    }

    /// Value of `qubit` in this outcome.
    pub fn qubit_value(&self, qubit: usize) -> QsimResult<bool> {
        if qubit >= self.num_qubits {
            return Err(QsimError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
                gate_name: None,
            });
        }
        Ok(self.index & qubit_mask(qubit, self.num_qubits) != 0)
    }
}

impl fmt::Display for MeasurementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|{}⟩", self.bitstring())
    }
}

/// Measure `state` once with the default tolerance.
pub fn measure<R: Rng + ?Sized>(
    state: &AmplitudeVector,
    rng: &mut R,
) -> QsimResult<MeasurementOutcome> {
    measure_with_tolerance(state, NORM_TOLERANCE, rng)
}

/// Measure `state` once; fails if it is not normalized within `tolerance`.
pub fn measure_with_tolerance<R: Rng + ?Sized>(
    state: &AmplitudeVector,
    tolerance: f64,
    rng: &mut R,
) -> QsimResult<MeasurementOutcome> {
    Ok(Sampler::new(state, tolerance)?.sample(rng))
}

/// Cumulative distribution of a validated state, for drawing many shots.
#[derive(Debug, Clone)]
pub struct Sampler {
    cumulative: Vec<f64>,
    num_qubits: usize,
    /// Highest index with non-zero probability.
    last_nonzero: usize,
}

impl Sampler {
    /// Build the distribution for `state`.
    ///
    /// `tolerance` must lie in `(0, 1)`; anything else is an
    /// [`QsimError::InvalidArgument`].
    pub fn new(state: &AmplitudeVector, tolerance: f64) -> QsimResult<Self> {
        state.check_normalized(tolerance)?;

        let mut total = 0.0;
        let mut last_nonzero = 0;
        let cumulative = state
            .probabilities()
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                if p > 0.0 {
                    last_nonzero = i;
                }
                total += p;
                total
            })
            .collect();
        if total <= 0.0 {
            return Err(QsimError::InvalidState {
                norm_sqr: total,
                tolerance,
            });
        }

        Ok(Self {
            cumulative,
            num_qubits: state.num_qubits(),
            last_nonzero,
        })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Draw one outcome.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> MeasurementOutcome {
        // Draw against the summed total, not 1.0, so the top bucket has no gap.
        let total = self.cumulative[self.cumulative.len() - 1];
        let r = rng.gen_range(0.0..total);
        let index = self.cumulative.partition_point(|&c| c <= r);
        MeasurementOutcome::new(index.min(self.last_nonzero), self.num_qubits)
    }

    /// Draw `shots` outcomes and count them by basis index.
    pub fn sample_counts<R: Rng + ?Sized>(&self, shots: usize, rng: &mut R) -> FxHashMap<usize, u64> {
        let mut counts = FxHashMap::default();
        for _ in 0..shots {
            *counts.entry(self.sample(rng).index()).or_insert(0) += 1;
        }
        counts
    }
}
