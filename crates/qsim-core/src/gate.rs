//! Gates and the standard gate library.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};
use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{QsimError, QsimResult};
use crate::unitary::{self, Matrix, NORM_TOLERANCE, from_rows, qubits_for_dim, re};

/// Gates of the built-in library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardGate {
    // Single-qubit gates
    /// Identity gate.
    I,
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
}

impl StandardGate {
    /// Every library gate, in display order.
    pub const ALL: [StandardGate; 13] = [
        StandardGate::I,
        StandardGate::H,
        StandardGate::X,
        StandardGate::Y,
        StandardGate::Z,
        StandardGate::S,
        StandardGate::Sdg,
        StandardGate::T,
        StandardGate::Tdg,
        StandardGate::CX,
        StandardGate::CZ,
        StandardGate::Swap,
        StandardGate::CCX,
    ];

    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
            StandardGate::CCX => "ccx",
        }
    }

    /// Get the number of qubits this gate acts on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        match self {
            StandardGate::I
            | StandardGate::H
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg => 1,
            StandardGate::CX | StandardGate::CZ | StandardGate::Swap => 2,
            StandardGate::CCX => 3,
        }
    }

    /// One-line description, with the role of each target for controlled gates.
    pub fn description(&self) -> &'static str {
        match self {
            StandardGate::I => "identity",
            StandardGate::H => "Hadamard",
            StandardGate::X => "Pauli-X (bit flip)",
            StandardGate::Y => "Pauli-Y",
            StandardGate::Z => "Pauli-Z (phase flip)",
            StandardGate::S => "phase gate, sqrt(Z)",
            StandardGate::Sdg => "inverse of S",
            StandardGate::T => "pi/8 gate, sqrt(S)",
            StandardGate::Tdg => "inverse of T",
            StandardGate::CX => "CNOT [control, target]",
            StandardGate::CZ => "controlled-Z [control, target]",
            StandardGate::Swap => "exchange two qubits",
            StandardGate::CCX => "Toffoli [control, control, target]",
        }
    }

    /// The gate's `2^k × 2^k` matrix. Target 0 is the most significant bit
    /// of the row and column index.
    pub fn matrix(&self) -> Matrix {
        let o = re(0.0);
        let l = re(1.0);
        let i = Complex64::new(0.0, 1.0);
        match self {
            StandardGate::I => unitary::identity(2),
            StandardGate::H => {
                let h = re(FRAC_1_SQRT_2);
                from_rows([[h, h], [h, -h]])
            }
            StandardGate::X => from_rows([[o, l], [l, o]]),
            StandardGate::Y => from_rows([[o, -i], [i, o]]),
            StandardGate::Z => from_rows([[l, o], [o, -l]]),
            StandardGate::S => from_rows([[l, o], [o, i]]),
            StandardGate::Sdg => from_rows([[l, o], [o, -i]]),
            StandardGate::T => from_rows([[l, o], [o, Complex64::from_polar(1.0, FRAC_PI_4)]]),
            StandardGate::Tdg => {
                from_rows([[l, o], [o, Complex64::from_polar(1.0, -FRAC_PI_4)]])
            }
            StandardGate::CX => from_rows([
                [l, o, o, o],
                [o, l, o, o],
                [o, o, o, l],
                [o, o, l, o],
            ]),
            StandardGate::CZ => from_rows([
                [l, o, o, o],
                [o, l, o, o],
                [o, o, l, o],
                [o, o, o, -l],
            ]),
            StandardGate::Swap => from_rows([
                [l, o, o, o],
                [o, o, l, o],
                [o, l, o, o],
                [o, o, o, l],
            ]),
            StandardGate::CCX => {
                let mut m = unitary::identity(8);
                m[[6, 6]] = o;
                m[[7, 7]] = o;
                m[[6, 7]] = l;
                m[[7, 6]] = l;
                m
            }
        }
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StandardGate {
    type Err = QsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let gate = match s.to_ascii_lowercase().as_str() {
            "i" | "id" => StandardGate::I,
            "h" => StandardGate::H,
            "x" => StandardGate::X,
            "y" => StandardGate::Y,
            "z" => StandardGate::Z,
            "s" => StandardGate::S,
            "sdg" => StandardGate::Sdg,
            "t" => StandardGate::T,
            "tdg" => StandardGate::Tdg,
            "cx" | "cnot" => StandardGate::CX,
            "cz" => StandardGate::CZ,
            "swap" => StandardGate::Swap,
            "ccx" | "ccnot" | "toffoli" => StandardGate::CCX,
            other => {
                return Err(QsimError::InvalidArgument(format!(
                    "unknown gate '{other}'"
                )));
            }
        };
        Ok(gate)
    }
}

/// An immutable unitary operator with a declared arity.
///
/// Library gates come from the named constructors; arbitrary unitaries go
/// through [`Gate::custom`], which checks shape and unitarity.
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    name: String,
    arity: usize,
    matrix: Matrix,
}

impl Gate {
    /// Build a library gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            name: gate.name().to_string(),
            arity: gate.num_qubits(),
            matrix: gate.matrix(),
        }
    }

    /// Build a gate from a `2^k × 2^k` unitary matrix.
    pub fn custom(name: impl Into<String>, matrix: Matrix) -> QsimResult<Self> {
        Self::custom_with_tolerance(name, matrix, NORM_TOLERANCE)
    }

    /// Like [`Gate::custom`] with an explicit unitarity tolerance.
    pub fn custom_with_tolerance(
        name: impl Into<String>,
        matrix: Matrix,
        tolerance: f64,
    ) -> QsimResult<Self> {
        let name = name.into();
        let (rows, cols) = matrix.dim();
        let arity = match qubits_for_dim(rows) {
            Some(k) if rows == cols => k,
            _ => {
                return Err(QsimError::MatrixShape {
                    gate_name: name,
                    rows,
                    cols,
                });
            }
        };
        let deviation = unitary::unitarity_deviation(&matrix);
        if deviation > tolerance || !deviation.is_finite() {
            return Err(QsimError::NonUnitaryGate {
                gate_name: name,
                deviation,
            });
        }
        Ok(Self {
            name,
            arity,
            matrix,
        })
    }

    /// Identity gate.
    pub fn identity() -> Self {
        Self::standard(StandardGate::I)
    }

    /// Hadamard gate.
    pub fn hadamard() -> Self {
        Self::standard(StandardGate::H)
    }

    /// Pauli-X gate.
    pub fn pauli_x() -> Self {
        Self::standard(StandardGate::X)
    }

    /// Pauli-Y gate.
    pub fn pauli_y() -> Self {
        Self::standard(StandardGate::Y)
    }

    /// Pauli-Z gate.
    pub fn pauli_z() -> Self {
        Self::standard(StandardGate::Z)
    }

    pub fn s() -> Self {
        Self::standard(StandardGate::S)
    }

    pub fn sdg() -> Self {
        Self::standard(StandardGate::Sdg)
    }

    pub fn t() -> Self {
        Self::standard(StandardGate::T)
    }

    pub fn tdg() -> Self {
        Self::standard(StandardGate::Tdg)
    }

    /// CNOT, targets `[control, target]`.
    pub fn cnot() -> Self {
        Self::standard(StandardGate::CX)
    }

    /// Controlled-Z, targets `[control, target]`.
    pub fn cz() -> Self {
        Self::standard(StandardGate::CZ)
    }

    pub fn swap() -> Self {
        Self::standard(StandardGate::Swap)
    }

    /// Toffoli, targets `[control, control, target]`.
    pub fn toffoli() -> Self {
        Self::standard(StandardGate::CCX)
    }

    /// The inverse gate.
    pub fn dagger(&self) -> Self {
        let name = match self.name.strip_suffix("_dg") {
            Some(base) => base.to_string(),
            None => format!("{}_dg", self.name),
        };
        Self {
            name,
            arity: self.arity,
            matrix: unitary::dagger(&self.matrix),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits the gate acts on.
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Self::standard(gate)
    }
}

impl FromStr for Gate {
    type Err = QsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<StandardGate>().map(Gate::standard)
    }
}
