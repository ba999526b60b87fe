//! Amplitude vectors.
//!
//! Basis index `i` of an `n`-qubit register encodes qubit `q` in bit
//! `n - 1 - q`: qubit 0 is the most significant bit, so `|q0 q1 … qn-1⟩`
//! reads left to right like the binary representation of the index.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{QsimError, QsimResult};
use crate::unitary::qubits_for_dim;

/// Largest register a state vector may describe (2^24 amplitudes, 256 MiB).
pub const MAX_QUBITS: usize = 24;

/// Bit mask of qubit `qubit` within an `num_qubits`-qubit basis index.
#[inline]
pub fn qubit_mask(qubit: usize, num_qubits: usize) -> usize {
    1 << (num_qubits - 1 - qubit)
}

/// Reject normalization tolerances outside `(0, 1)`.
///
/// A tolerance of 1 or more would accept the all-zero vector as normalized.
pub fn check_tolerance(tolerance: f64) -> QsimResult<()> {
    if tolerance > 0.0 && tolerance < 1.0 {
        Ok(())
    } else {
        Err(QsimError::InvalidArgument(format!(
            "tolerance must be positive and below 1, got {tolerance}"
        )))
    }
}

/// The complex amplitudes of an `n`-qubit register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAmplitudes")]
pub struct AmplitudeVector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl AmplitudeVector {
    /// Create a new state initialized to |0...0⟩.
    pub fn zero(num_qubits: usize) -> QsimResult<Self> {
        Self::basis(num_qubits, 0)
    }

    /// Create the computational basis state `|index⟩`.
    pub fn basis(num_qubits: usize, index: usize) -> QsimResult<Self> {
        check_register(num_qubits)?;
        let size = 1 << num_qubits;
        if index >= size {
            return Err(QsimError::InvalidArgument(format!(
                "basis index {index} out of range for {num_qubits} qubits"
            )));
        }
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Wrap caller-supplied amplitudes.
    ///
    /// The length must be a power of two of at least 2. Normalization is not
    /// checked here; see [`AmplitudeVector::check_normalized`].
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> QsimResult<Self> {
        let len = amplitudes.len();
        let num_qubits = qubits_for_dim(len).ok_or(QsimError::NotPowerOfTwo { len })?;
        check_register(num_qubits)?;
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Wrap real amplitudes.
    pub fn from_real(amplitudes: &[f64]) -> QsimResult<Self> {
        Self::from_amplitudes(
            amplitudes
                .iter()
                .map(|&a| Complex64::new(a, 0.0))
                .collect(),
        )
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of amplitudes, `2^n`.
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    /// Always `false`; a register has at least one qubit.
    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Amplitude of basis state `index`.
    pub fn amplitude(&self, index: usize) -> Option<Complex64> {
        self.amplitudes.get(index).copied()
    }

    /// Sum of squared magnitudes.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Born-rule probabilities, one per basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Fail with [`QsimError::InvalidState`] unless the squared norm is 1
    /// within `tolerance`, which must lie in `(0, 1)`.
    pub fn check_normalized(&self, tolerance: f64) -> QsimResult<()> {
        check_tolerance(tolerance)?;
        let norm_sqr = self.norm_sqr();
        if (norm_sqr - 1.0).abs() > tolerance || !norm_sqr.is_finite() {
            return Err(QsimError::InvalidState {
                norm_sqr,
                tolerance,
            });
        }
        Ok(())
    }

    /// Rescale to unit norm.
    pub fn normalize(&mut self) -> QsimResult<()> {
        let norm = self.norm_sqr().sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return Err(QsimError::InvalidState {
                norm_sqr: norm * norm,
                tolerance: 0.0,
            });
        }
        for amp in &mut self.amplitudes {
            *amp /= norm;
        }
        Ok(())
    }

    /// Entry-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.num_qubits == other.num_qubits
            && self
                .amplitudes
                .iter()
                .zip(&other.amplitudes)
                .all(|(a, b)| (a - b).norm() <= tolerance)
    }

    /// Squared overlap `|⟨self|other⟩|²`; insensitive to global phase.
    pub fn fidelity(&self, other: &Self) -> QsimResult<f64> {
        if self.len() != other.len() {
            return Err(QsimError::StateLengthMismatch {
                num_qubits: self.num_qubits,
                expected: self.len(),
                got: other.len(),
            });
        }
        let overlap: Complex64 = self
            .amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum();
        Ok(overlap.norm_sqr())
    }

    /// Convert a basis index to its bitstring, qubit 0 leftmost.
    pub fn outcome_to_bitstring(&self, outcome: usize) -> String {
        index_to_bitstring(outcome, self.num_qubits)
    }
}

/// Serialized form of [`AmplitudeVector`], checked on the way in.
#[derive(Deserialize)]
struct RawAmplitudes {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl TryFrom<RawAmplitudes> for AmplitudeVector {
    type Error = QsimError;

    fn try_from(raw: RawAmplitudes) -> QsimResult<Self> {
        let state = Self::from_amplitudes(raw.amplitudes)?;
        if state.num_qubits != raw.num_qubits {
            return Err(QsimError::StateLengthMismatch {
                num_qubits: raw.num_qubits,
                expected: 1usize.checked_shl(raw.num_qubits as u32).unwrap_or(usize::MAX),
                got: state.len(),
            });
        }
        Ok(state)
    }
}

/// Format `index` as an `num_qubits`-character bitstring, qubit 0 leftmost.
pub fn index_to_bitstring(index: usize, num_qubits: usize) -> String {
    format!("{index:0num_qubits$b}")
}

/// Reject empty registers and ones too large to hold in memory.
pub(crate) fn check_register(num_qubits: usize) -> QsimResult<()> {
    if num_qubits == 0 {
        return Err(QsimError::InvalidArgument(
            "a register needs at least one qubit".into(),
        ));
    }
    if num_qubits > MAX_QUBITS {
        return Err(QsimError::RegisterTooLarge {
            num_qubits,
            max: MAX_QUBITS,
            what: "state vectors",
        });
    }
    Ok(())
}
