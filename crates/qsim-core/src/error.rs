//! Error types for the core crate.

use thiserror::Error;

/// Coarse classification of [`QsimError`]s.
///
/// Callers that only need to decide whether to abort or skip can match on the
/// kind instead of the individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Target indices, arities or vector lengths do not fit the register.
    DimensionMismatch,
    /// An amplitude vector fails the normalization check.
    InvalidState,
    /// A numeric argument is outside its valid range.
    InvalidArgument,
    /// A gate matrix is not unitary.
    NonUnitaryGate,
}

/// Errors that can occur while building or running circuits.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum QsimError {
    /// A target index does not address a qubit of the register.
    #[error(
        "Qubit {qubit} out of range for a {num_qubits}-qubit register{}",
        format_gate_context(.gate_name)
    )]
    QubitOutOfRange {
        /// The offending index.
        qubit: usize,
        /// Size of the register.
        num_qubits: usize,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// The same qubit appears twice in one target list.
    #[error("Duplicate target qubit {qubit}{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The repeated index.
        qubit: usize,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires a different number of targets.
    #[error("Gate '{gate_name}' acts on {expected} qubits, got {got} targets")]
    ArityMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Arity of the gate.
        expected: usize,
        /// Number of targets supplied.
        got: usize,
    },

    /// Amplitude vector length does not match the register size.
    #[error("State has {got} amplitudes but a {num_qubits}-qubit register needs {expected}")]
    StateLengthMismatch {
        /// Register size.
        num_qubits: usize,
        /// Required length, `2^num_qubits`.
        expected: usize,
        /// Supplied length.
        got: usize,
    },

    /// A vector or matrix dimension is not a power of two of at least 2.
    #[error("Dimension {len} is not a power of two >= 2")]
    NotPowerOfTwo {
        /// The offending length.
        len: usize,
    },

    /// A gate matrix has the wrong shape.
    #[error("Gate '{gate_name}' matrix is {rows}x{cols}, expected a square 2^k x 2^k matrix")]
    MatrixShape {
        /// Name of the gate.
        gate_name: String,
        /// Number of rows supplied.
        rows: usize,
        /// Number of columns supplied.
        cols: usize,
    },

    /// Squared magnitudes do not sum to one.
    #[error("State is not normalized: squared norm {norm_sqr} deviates from 1 by more than {tolerance:e}")]
    InvalidState {
        /// Observed sum of squared magnitudes.
        norm_sqr: f64,
        /// Allowed deviation.
        tolerance: f64,
    },

    /// A custom gate matrix failed the unitarity check.
    #[error("Gate '{gate_name}' is not unitary: max |U·U† - I| entry is {deviation:e}")]
    NonUnitaryGate {
        /// Name of the gate.
        gate_name: String,
        /// Largest entry-wise deviation from the identity.
        deviation: f64,
    },

    /// The register is too large for the requested representation.
    #[error("{num_qubits} qubits exceeds the limit of {max} for {what}")]
    RegisterTooLarge {
        /// Requested register size.
        num_qubits: usize,
        /// Maximum supported size.
        max: usize,
        /// The representation that hit the limit.
        what: &'static str,
    },

    /// Any other argument outside its valid range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl QsimError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QsimError::QubitOutOfRange { .. }
            | QsimError::DuplicateQubit { .. }
            | QsimError::ArityMismatch { .. }
            | QsimError::StateLengthMismatch { .. }
            | QsimError::NotPowerOfTwo { .. }
            | QsimError::MatrixShape { .. } => ErrorKind::DimensionMismatch,
            QsimError::InvalidState { .. } => ErrorKind::InvalidState,
            QsimError::NonUnitaryGate { .. } => ErrorKind::NonUnitaryGate,
            QsimError::RegisterTooLarge { .. } | QsimError::InvalidArgument(_) => {
                ErrorKind::InvalidArgument
            }
        }
    }
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for core operations.
pub type QsimResult<T> = Result<T, QsimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_offending_values() {
        let err = QsimError::QubitOutOfRange {
            qubit: 5,
            num_qubits: 2,
            gate_name: Some("cx".into()),
        };
        assert_eq!(
            err.to_string(),
            "Qubit 5 out of range for a 2-qubit register (gate: cx)"
        );

        let err = QsimError::StateLengthMismatch {
            num_qubits: 2,
            expected: 4,
            got: 2,
        };
        assert_eq!(
            err.to_string(),
            "State has 2 amplitudes but a 2-qubit register needs 4"
        );
    }

    #[test]
    fn test_kinds() {
        let dup = QsimError::DuplicateQubit {
            qubit: 0,
            gate_name: None,
        };
        assert_eq!(dup.kind(), ErrorKind::DimensionMismatch);
        assert_eq!(
            QsimError::InvalidState {
                norm_sqr: 2.0,
                tolerance: 1e-9
            }
            .kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            QsimError::InvalidArgument("x".into()).kind(),
            ErrorKind::InvalidArgument
        );
    }
}
