//! qsim Core
//!
//! State-vector simulation of small quantum registers.
//!
//! An [`AmplitudeVector`] holds the `2^n` complex amplitudes of an `n`-qubit
//! register. A [`Circuit`] is an ordered list of [`Gate`]s, each placed on a
//! list of target qubits; running it embeds every gate into the full
//! register and evolves a copy of the input state.
//!
//! Qubit 0 is the most significant bit of a basis index, and the first
//! target of a gate is the most significant bit of the gate's own index.
//! CNOT targets are therefore `[control, target]`.
//!
//! # Example
//!
//! ```rust
//! use qsim_core::{AmplitudeVector, Circuit};
//! use std::f64::consts::FRAC_1_SQRT_2;
//!
//! let mut circuit = Circuit::new(2)?;
//! circuit.h(0)?.cx(0, 1)?;
//!
//! let bell = circuit.run(&AmplitudeVector::zero(2)?)?;
//! let expected = AmplitudeVector::from_real(&[FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2])?;
//! assert!(bell.approx_eq(&expected, 1e-12));
//! # Ok::<(), qsim_core::QsimError>(())
//! ```
//!
//! # Gate library
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `id` | 1 | Identity |
//! | `h` | 1 | Hadamard |
//! | `x`, `y`, `z` | 1 | Pauli gates |
//! | `s`, `sdg` | 1 | sqrt(Z) and its inverse |
//! | `t`, `tdg` | 1 | fourth root of Z and its inverse |
//! | `cx` | 2 | CNOT `[control, target]` |
//! | `cz` | 2 | Controlled-Z |
//! | `swap` | 2 | SWAP |
//! | `ccx` | 3 | Toffoli `[control, control, target]` |
//!
//! Any other unitary can be wrapped with [`Gate::custom`].

pub mod circuit;
pub mod embedding;
pub mod error;
pub mod gate;
pub mod state;
pub mod unitary;

pub use circuit::{Circuit, ExecutionMode, Operation};
pub use embedding::{Embedding, MAX_DENSE_QUBITS};
pub use error::{ErrorKind, QsimError, QsimResult};
pub use gate::{Gate, StandardGate};
pub use num_complex::Complex64;
pub use state::{AmplitudeVector, MAX_QUBITS, check_tolerance, index_to_bitstring, qubit_mask};
pub use unitary::{Matrix, NORM_TOLERANCE};
