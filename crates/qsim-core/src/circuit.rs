//! Circuits: ordered gate applications on a fixed-size register.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::embedding::{Embedding, MAX_DENSE_QUBITS};
use crate::error::{QsimError, QsimResult};
use crate::gate::{Gate, StandardGate};
use crate::state::{AmplitudeVector, check_register, check_tolerance};
use crate::unitary::{self, Matrix, NORM_TOLERANCE};

/// Registers up to this size run with dense operators in [`ExecutionMode::Auto`].
pub const AUTO_DENSE_MAX_QUBITS: usize = 6;

/// How gates are applied to the amplitude vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Dense for small registers, strided otherwise.
    #[default]
    Auto,
    /// Materialize each embedded `2^n × 2^n` operator.
    Dense,
    /// Apply each gate in place to the affected amplitude groups.
    Strided,
}

impl ExecutionMode {
    /// The concrete mode used for a register of `num_qubits`.
    pub fn resolve(self, num_qubits: usize) -> ExecutionMode {
        match self {
            ExecutionMode::Auto if num_qubits <= AUTO_DENSE_MAX_QUBITS => ExecutionMode::Dense,
            ExecutionMode::Auto => ExecutionMode::Strided,
            explicit => explicit,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Auto => "auto",
            ExecutionMode::Dense => "dense",
            ExecutionMode::Strided => "strided",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = QsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ExecutionMode::Auto),
            "dense" => Ok(ExecutionMode::Dense),
            "strided" => Ok(ExecutionMode::Strided),
            other => Err(QsimError::InvalidArgument(format!(
                "unknown execution mode '{other}' (expected auto, dense or strided)"
            ))),
        }
    }
}

/// A gate together with its validated placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    gate: Gate,
    embedding: Embedding,
}

impl Operation {
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn targets(&self) -> &[usize] {
        self.embedding.targets()
    }

    pub fn embedding(&self) -> &Embedding {
        &self.embedding
    }
}

/// An ordered list of gate applications on `num_qubits` qubits.
///
/// Appending validates the targets; running never mutates the circuit, so
/// the same circuit can be run any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    name: String,
    num_qubits: usize,
    ops: Vec<Operation>,
    mode: ExecutionMode,
    tolerance: f64,
}

impl Circuit {
    /// Create an empty circuit on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> QsimResult<Self> {
        check_register(num_qubits)?;
        Ok(Self {
            name: "circuit".into(),
            num_qubits,
            ops: Vec::new(),
            mode: ExecutionMode::default(),
            tolerance: NORM_TOLERANCE,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Tolerance for the normalization checks around [`Circuit::run`].
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Append `gate` acting on `targets`, in gate-local order.
    pub fn append(&mut self, gate: impl Into<Gate>, targets: &[usize]) -> QsimResult<&mut Self> {
        let gate = gate.into();
        let embedding = Embedding::new(gate.arity(), targets, self.num_qubits, gate.name())?;
        self.ops.push(Operation { gate, embedding });
        Ok(self)
    }

    // =========================================================================
    // Library gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: usize) -> QsimResult<&mut Self> {
        self.append(StandardGate::H, &[qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: usize) -> QsimResult<&mut Self> {
        self.append(StandardGate::X, &[qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: usize) -> QsimResult<&mut Self> {
        self.append(StandardGate::Y, &[qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: usize) -> QsimResult<&mut Self> {
        self.append(StandardGate::Z, &[qubit])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: usize) -> QsimResult<&mut Self> {
        self.append(StandardGate::S, &[qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: usize) -> QsimResult<&mut Self> {
        self.append(StandardGate::T, &[qubit])
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: usize, target: usize) -> QsimResult<&mut Self> {
        self.append(StandardGate::CX, &[control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: usize, target: usize) -> QsimResult<&mut Self> {
        self.append(StandardGate::CZ, &[control, target])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: usize, q2: usize) -> QsimResult<&mut Self> {
        self.append(StandardGate::Swap, &[q1, q2])
    }

    /// Apply Toffoli gate.
    pub fn ccx(&mut self, c1: usize, c2: usize, target: usize) -> QsimResult<&mut Self> {
        self.append(StandardGate::CCX, &[c1, c2, target])
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of gate applications.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Evolve `initial` through every gate in append order.
    ///
    /// `initial` must have `2^n` amplitudes and be normalized within the
    /// circuit tolerance. The input is left untouched; a new vector is
    /// returned. The result is checked for normalization again, so an
    /// error is returned rather than a corrupted state.
    #[instrument(skip_all, fields(circuit = %self.name, num_qubits = self.num_qubits, gates = self.ops.len()))]
    pub fn run(&self, initial: &AmplitudeVector) -> QsimResult<AmplitudeVector> {
        let start = Instant::now();

        if initial.num_qubits() != self.num_qubits || initial.len() != 1 << self.num_qubits {
            return Err(QsimError::StateLengthMismatch {
                num_qubits: self.num_qubits,
                expected: 1 << self.num_qubits,
                got: initial.len(),
            });
        }
        check_tolerance(self.tolerance)?;
        initial.check_normalized(self.tolerance)?;

        let mode = self.mode.resolve(self.num_qubits);
        let mut state = initial.clone();

        for (step, op) in self.ops.iter().enumerate() {
            trace!(step, gate = op.gate.name(), targets = ?op.targets(), "applying gate");
            match mode {
                ExecutionMode::Dense => {
                    let full = op.embedding.dense(op.gate.matrix())?;
                    let next = unitary::apply_to(&full, state.amplitudes());
                    state.amplitudes_mut().copy_from_slice(&next);
                }
                _ => op.embedding.apply(op.gate.matrix(), state.amplitudes_mut())?,
            }
        }

        state.check_normalized(self.tolerance)?;

        debug!(
            mode = %mode,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Circuit run complete"
        );
        Ok(state)
    }

    /// Run on `|0...0⟩`.
    pub fn run_from_zero(&self) -> QsimResult<AmplitudeVector> {
        self.run(&AmplitudeVector::zero(self.num_qubits)?)
    }

    /// The circuit undoing this one: daggered gates in reverse order.
    pub fn inverse(&self) -> Self {
        let ops = self
            .ops
            .iter()
            .rev()
            .map(|op| Operation {
                gate: op.gate.dagger(),
                embedding: op.embedding.clone(),
            })
            .collect();
        Self {
            name: format!("{}_inverse", self.name),
            num_qubits: self.num_qubits,
            ops,
            mode: self.mode,
            tolerance: self.tolerance,
        }
    }

    /// The full `2^n × 2^n` operator of the circuit.
    pub fn unitary(&self) -> QsimResult<Matrix> {
        if self.num_qubits > MAX_DENSE_QUBITS {
            return Err(QsimError::RegisterTooLarge {
                num_qubits: self.num_qubits,
                max: MAX_DENSE_QUBITS,
                what: "dense operators",
            });
        }
        self.ops
            .iter()
            .try_fold(
                unitary::identity(1 << self.num_qubits),
                |acc, op| -> QsimResult<Matrix> {
                    Ok(op.embedding.dense(op.gate.matrix())?.dot(&acc))
                },
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use num_complex::Complex64;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn assert_state(state: &AmplitudeVector, expected: &[f64]) {
        let expected = AmplitudeVector::from_real(expected).unwrap();
        assert!(
            state.approx_eq(&expected, 1e-12),
            "got {:?}, expected {:?}",
            state.amplitudes(),
            expected.amplitudes()
        );
    }

    #[test]
    fn test_hadamard_on_first_of_two_qubits() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit.h(0).unwrap();
        let out = circuit.run_from_zero().unwrap();
        assert_state(&out, &[FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2, 0.0]);
    }

    #[test]
    fn test_bell_state() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit.h(0).unwrap().cx(0, 1).unwrap();
        let out = circuit.run_from_zero().unwrap();
        assert_state(&out, &[FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2]);
    }

    #[test]
    fn test_run_leaves_input_untouched() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit.x(0).unwrap();
        let initial = AmplitudeVector::zero(1).unwrap();
        let first = circuit.run(&initial).unwrap();
        let second = circuit.run(&initial).unwrap();
        assert_eq!(first, second);
        assert_eq!(initial, AmplitudeVector::zero(1).unwrap());
        assert_state(&first, &[0.0, 1.0]);
    }

    #[test]
    fn test_single_qubit_h_then_x() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit.h(0).unwrap().x(0).unwrap();
        let out = circuit.run_from_zero().unwrap();
        assert_state(&out, &[FRAC_1_SQRT_2, FRAC_1_SQRT_2]);
    }

    #[test]
    fn test_run_rejects_wrong_length() {
        let circuit = Circuit::new(2).unwrap();
        let err = circuit.run(&AmplitudeVector::zero(1).unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
        assert!(err.to_string().contains("needs 4"));
    }

    #[test]
    fn test_run_rejects_unnormalized_input() {
        let circuit = Circuit::new(1).unwrap();
        let state = AmplitudeVector::from_real(&[1.0, 1.0]).unwrap();
        let err = circuit.run(&state).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn test_run_rejects_bad_tolerance() {
        for tolerance in [0.0, 1.0, f64::NAN] {
            let circuit = Circuit::new(1).unwrap().with_tolerance(tolerance);
            assert!(matches!(
                circuit.run_from_zero(),
                Err(QsimError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_append_rejects_duplicate_targets() {
        let mut circuit = Circuit::new(2).unwrap();
        let err = circuit.append(Gate::cnot(), &[0, 0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_modes_agree() {
        let mut circuit = Circuit::new(3).unwrap();
        circuit
            .h(0)
            .unwrap()
            .t(1)
            .unwrap()
            .cx(2, 0)
            .unwrap()
            .ccx(0, 2, 1)
            .unwrap()
            .y(2)
            .unwrap();
        let dense = circuit
            .clone()
            .with_execution_mode(ExecutionMode::Dense)
            .run_from_zero()
            .unwrap();
        let strided = circuit
            .with_execution_mode(ExecutionMode::Strided)
            .run_from_zero()
            .unwrap();
        assert!(dense.approx_eq(&strided, 1e-12));
    }

    #[test]
    fn test_inverse_restores_state() {
        let mut circuit = Circuit::new(3).unwrap();
        circuit.h(0).unwrap().s(1).unwrap().cx(0, 2).unwrap().t(2).unwrap();
        let forward = circuit.run_from_zero().unwrap();
        let back = circuit.inverse().run(&forward).unwrap();
        assert!(back.approx_eq(&AmplitudeVector::zero(3).unwrap(), 1e-12));
        assert_eq!(circuit.inverse().name(), "circuit_inverse");
    }

    #[test]
    fn test_unitary_matches_run() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit.h(1).unwrap().cx(1, 0).unwrap();
        let u = circuit.unitary().unwrap();
        assert!(unitary::is_unitary(&u, NORM_TOLERANCE));
        let column: Vec<Complex64> = u.column(0).to_vec();
        let out = circuit.run_from_zero().unwrap();
        assert!(
            out.amplitudes()
                .iter()
                .zip(&column)
                .all(|(a, b)| (a - b).norm() < 1e-12)
        );
    }

    #[test]
    fn test_mode_resolution() {
        assert_eq!(ExecutionMode::Auto.resolve(6), ExecutionMode::Dense);
        assert_eq!(ExecutionMode::Auto.resolve(7), ExecutionMode::Strided);
        assert_eq!(ExecutionMode::Dense.resolve(20), ExecutionMode::Dense);
        assert_eq!("STRIDED".parse::<ExecutionMode>().unwrap(), ExecutionMode::Strided);
        assert!("sparse".parse::<ExecutionMode>().is_err());
    }
}
