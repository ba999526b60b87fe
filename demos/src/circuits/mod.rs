//! Circuit scenarios for demos.

pub mod basics;
pub mod grover;

pub use basics::{
    bell_circuit, bell_pair, cnot_on_superposition, coin_flip, duplicate_target_error, ghz,
    ghz_circuit, single_qubit_flip, toffoli_on,
};
pub use grover::{grover_circuit, optimal_iterations, success_probability};
