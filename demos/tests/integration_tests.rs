//! Integration tests for the demo suite.
//!
//! These tests run every scenario end to end with fixed seeds.

use qsim_core::{Complex64, ErrorKind};
use qsim_demos::circuits::{
    bell_pair, cnot_on_superposition, coin_flip, duplicate_target_error, ghz, ghz_circuit,
    grover_circuit, optimal_iterations, single_qubit_flip, toffoli_on,
};

const H: f64 = std::f64::consts::FRAC_1_SQRT_2;

fn assert_amplitudes(actual: &[Complex64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, &e) in actual.iter().zip(expected) {
        assert!(
            (a.re - e).abs() < 1e-9 && a.im.abs() < 1e-9,
            "got {actual:?}, expected {expected:?}"
        );
    }
}

#[test]
fn test_single_qubit_flip() {
    let state = single_qubit_flip().unwrap();
    assert_amplitudes(state.amplitudes(), &[H, H]);
}

#[test]
fn test_bell_pair() {
    let state = bell_pair().unwrap();
    assert_amplitudes(state.amplitudes(), &[H, 0.0, 0.0, H]);
}

#[test]
fn test_cnot_on_superposition() {
    let state = cnot_on_superposition().unwrap();
    assert_amplitudes(state.amplitudes(), &[H, 0.0, 0.0, H]);
}

/// GHZ states only populate the two extreme basis states.
#[test]
fn test_ghz_scaling() {
    for n in 1..=8 {
        let probs = ghz(n).unwrap().probabilities();
        let last = (1 << n) - 1;
        assert!((probs[0] - 0.5).abs() < 1e-9, "n = {n}");
        assert!((probs[last] - 0.5).abs() < 1e-9, "n = {n}");
        let rest: f64 = probs[1..last].iter().sum();
        assert!(rest.abs() < 1e-9, "n = {n}");
    }
    assert_eq!(ghz_circuit(5).unwrap().len(), 5);
}

#[test]
fn test_toffoli_on_non_adjacent_qubits() {
    // qubits 0, 2 and 4 of 5 set: 10101
    let state = toffoli_on(0, 2, 4, 5).unwrap();
    assert!((state.probabilities()[0b10101] - 1.0).abs() < 1e-12);

    // target above the controls: 11 -> 111 on qubits (1, 2, 0)
    let state = toffoli_on(1, 2, 0, 3).unwrap();
    assert!((state.probabilities()[0b111] - 1.0).abs() < 1e-12);
}

#[test]
fn test_coin_flip() {
    let result = coin_flip(1000, 42).unwrap();
    assert_eq!(result.trials(), 1000);
    assert_eq!(result.count(0) + result.count(1), 1000);
    assert!((result.frequency(0) - 0.5).abs() < 0.06);

    // Same seed, same counts.
    assert_eq!(coin_flip(1000, 42).unwrap(), result);
}

#[test]
fn test_coin_flip_rejects_zero_trials() {
    let err = coin_flip(0, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_duplicate_target_error() {
    let err = duplicate_target_error();
    assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
}

#[test]
fn test_three_qubit_grover() {
    let iterations = optimal_iterations(3);
    for marked in 0..8 {
        let circuit = grover_circuit(3, marked, iterations).unwrap();
        let probs = circuit.run_from_zero().unwrap().probabilities();
        assert!(probs[marked] > 0.94, "marked {marked}: {probs:?}");
    }
}
