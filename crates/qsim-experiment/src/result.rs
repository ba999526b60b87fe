//! Outcome tallies and finalized experiment results.

use std::collections::BTreeMap;

use qsim_core::{MAX_QUBITS, QsimError, index_to_bitstring, qubit_mask};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{RunnerError, RunnerResult};
use crate::measurement::MeasurementOutcome;

/// Running outcome counts for one worker.
///
/// Tallies from independent workers are combined with [`Tally::merge`] and
/// turned into an [`ExperimentResult`] once all trials are done.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    num_qubits: Option<usize>,
    trials: usize,
    counts: FxHashMap<usize, u64>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one outcome.
    pub fn record(&mut self, outcome: MeasurementOutcome) -> RunnerResult<()> {
        self.check_register(outcome.num_qubits())?;
        self.trials += 1;
        *self.counts.entry(outcome.index()).or_insert(0) += 1;
        Ok(())
    }

    /// Record `count` occurrences of basis index `index`.
    pub fn record_count(&mut self, num_qubits: usize, index: usize, count: u64) -> RunnerResult<()> {
        self.check_register(num_qubits)?;
        self.trials += count as usize;
        *self.counts.entry(index).or_insert(0) += count;
        Ok(())
    }

    /// Combine two tallies.
    pub fn merge(mut self, other: Tally) -> RunnerResult<Tally> {
        if let Some(n) = other.num_qubits {
            self.check_register(n)?;
        }
        self.trials += other.trials;
        for (index, count) in other.counts {
            *self.counts.entry(index).or_insert(0) += count;
        }
        Ok(self)
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Freeze the counts. Fails if nothing was recorded.
    pub fn finalize(self) -> RunnerResult<ExperimentResult> {
        let num_qubits = match self.num_qubits {
            Some(n) if self.trials > 0 => n,
            _ => return Err(RunnerError::InvalidTrials(0)),
        };
        Ok(ExperimentResult {
            num_qubits,
            trials: self.trials,
            counts: self.counts.into_iter().collect(),
        })
    }

    fn check_register(&mut self, num_qubits: usize) -> RunnerResult<()> {
        match self.num_qubits {
            Some(expected) if expected != num_qubits => Err(RunnerError::RegisterMismatch {
                expected,
                got: num_qubits,
            }),
            Some(_) => Ok(()),
            None => {
                self.num_qubits = Some(num_qubits);
                Ok(())
            }
        }
    }
}

/// Outcome counts of a completed experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExperimentResult")]
pub struct ExperimentResult {
    num_qubits: usize,
    trials: usize,
    /// Observed basis indices and how often each occurred.
    counts: BTreeMap<usize, u64>,
}

impl ExperimentResult {
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Total number of recorded outcomes.
    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn counts(&self) -> &BTreeMap<usize, u64> {
        &self.counts
    }

    /// How often `index` was observed.
    pub fn count(&self, index: usize) -> u64 {
        self.counts.get(&index).copied().unwrap_or(0)
    }

    /// Fraction of trials that produced `index`.
    pub fn frequency(&self, index: usize) -> f64 {
        self.count(index) as f64 / self.trials as f64
    }

    /// Frequencies of every observed outcome; they sum to 1.
    pub fn frequencies(&self) -> BTreeMap<usize, f64> {
        self.counts
            .iter()
            .map(|(&index, &count)| (index, count as f64 / self.trials as f64))
            .collect()
    }

    /// Frequencies keyed by bitstring, qubit 0 leftmost.
    pub fn bitstring_frequencies(&self) -> BTreeMap<String, f64> {
        self.frequencies()
            .into_iter()
            .map(|(index, freq)| (index_to_bitstring(index, self.num_qubits), freq))
            .collect()
    }

    /// Observed `[P(0), P(1)]` for a single qubit.
    pub fn marginal(&self, qubit: usize) -> RunnerResult<[f64; 2]> {
        if qubit >= self.num_qubits {
            return Err(QsimError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
                gate_name: None,
            }
            .into());
        }
        let mask = qubit_mask(qubit, self.num_qubits);
        let ones: u64 = self
            .counts
            .iter()
            .filter(|&(&index, _)| index & mask != 0)
            .map(|(_, &count)| count)
            .sum();
        let p1 = ones as f64 / self.trials as f64;
        Ok([1.0 - p1, p1])
    }

    /// Marginals of every qubit, in qubit order.
    pub fn marginals(&self) -> Vec<[f64; 2]> {
        (0..self.num_qubits)
            .filter_map(|q| self.marginal(q).ok())
            .collect()
    }

    /// The most common outcome and its count; ties go to the lowest index.
    pub fn most_frequent(&self) -> Option<(usize, u64)> {
        self.counts
            .iter()
            .map(|(&index, &count)| (index, count))
            .fold(None, |best, (index, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((index, count)),
            })
    }
}

/// Serialized form of [`ExperimentResult`], checked on the way in.
#[derive(Deserialize)]
struct RawExperimentResult {
    num_qubits: usize,
    trials: usize,
    counts: BTreeMap<usize, u64>,
}

impl TryFrom<RawExperimentResult> for ExperimentResult {
    type Error = RunnerError;

    fn try_from(raw: RawExperimentResult) -> RunnerResult<Self> {
        if raw.num_qubits == 0 || raw.num_qubits > MAX_QUBITS {
            return Err(QsimError::InvalidArgument(format!(
                "result register of {} qubits is outside 1..={MAX_QUBITS}",
                raw.num_qubits
            ))
            .into());
        }
        if raw.trials == 0 {
            return Err(RunnerError::InvalidTrials(0));
        }
        if let Some(&index) = raw.counts.keys().find(|&&i| i >> raw.num_qubits != 0) {
            return Err(QsimError::InvalidArgument(format!(
                "outcome {index} does not fit in {} qubits",
                raw.num_qubits
            ))
            .into());
        }
        let counted: u64 = raw.counts.values().sum();
        if counted != raw.trials as u64 {
            return Err(QsimError::InvalidArgument(format!(
                "counts sum to {counted} but trials is {}",
                raw.trials
            ))
            .into());
        }
        Ok(Self {
            num_qubits: raw.num_qubits,
            trials: raw.trials,
            counts: raw.counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(num_qubits: usize, outcomes: &[usize]) -> Tally {
        let mut t = Tally::new();
        for &index in outcomes {
            t.record(MeasurementOutcome::new(index, num_qubits)).unwrap();
        }
        t
    }

    #[test]
    fn test_frequencies_sum_to_one() {
        let result = tally(2, &[0, 3, 3, 1]).finalize().unwrap();
        assert_eq!(result.trials(), 4);
        assert_eq!(result.count(3), 2);
        assert_eq!(result.count(2), 0);
        assert!((result.frequency(3) - 0.5).abs() < 1e-12);
        let total: f64 = result.frequencies().values().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bitstring_frequencies() {
        let result = tally(2, &[2, 2]).finalize().unwrap();
        let freqs = result.bitstring_frequencies();
        assert_eq!(freqs.get("10"), Some(&1.0));
        assert_eq!(freqs.len(), 1);
    }

    #[test]
    fn test_marginals() {
        // |10⟩ twice, |11⟩ twice
        let result = tally(2, &[0b10, 0b10, 0b11, 0b11]).finalize().unwrap();
        assert_eq!(result.marginal(0).unwrap(), [0.0, 1.0]);
        assert_eq!(result.marginal(1).unwrap(), [0.5, 0.5]);
        assert_eq!(result.marginals().len(), 2);
        assert!(result.marginal(2).is_err());
    }

    #[test]
    fn test_merge() {
        let merged = tally(1, &[0, 1]).merge(tally(1, &[1])).unwrap();
        let result = merged.finalize().unwrap();
        assert_eq!(result.trials(), 3);
        assert_eq!(result.most_frequent(), Some((1, 2)));

        let err = tally(1, &[0]).merge(tally(2, &[0])).unwrap_err();
        assert!(matches!(err, RunnerError::RegisterMismatch { expected: 1, got: 2 }));

        // merging an empty tally is a no-op
        let merged = tally(1, &[0]).merge(Tally::new()).unwrap();
        assert_eq!(merged.trials(), 1);
    }

    #[test]
    fn test_most_frequent_tie_breaks_low() {
        let result = tally(2, &[3, 1, 3, 1]).finalize().unwrap();
        assert_eq!(result.most_frequent(), Some((1, 2)));
    }

    #[test]
    fn test_empty_tally_cannot_finalize() {
        assert!(Tally::new().finalize().is_err());
    }

    #[test]
    fn test_serializes_to_json() {
        let result = tally(1, &[0, 1, 1]).finalize().unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["num_qubits"], 1);
        assert_eq!(json["trials"], 3);
        assert_eq!(json["counts"]["1"], 2);

        let back: ExperimentResult =
            serde_json::from_str(&serde_json::to_string(&result).unwrap()).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_deserialize_rejects_inconsistent_results() {
        for bad in [
            r#"{"num_qubits":1,"trials":0,"counts":{}}"#,
            r#"{"num_qubits":0,"trials":1,"counts":{"0":1}}"#,
            r#"{"num_qubits":1,"trials":2,"counts":{"2":2}}"#,
            r#"{"num_qubits":2,"trials":5,"counts":{"0":1,"3":1}}"#,
        ] {
            assert!(serde_json::from_str::<ExperimentResult>(bad).is_err(), "{bad}");
        }
        let ok: ExperimentResult =
            serde_json::from_str(r#"{"num_qubits":2,"trials":2,"counts":{"0":1,"3":1}}"#).unwrap();
        assert!((ok.frequency(3) - 0.5).abs() < 1e-12);
    }
}
