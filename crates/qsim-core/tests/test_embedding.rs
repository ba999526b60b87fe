//! Integration tests for gate embedding and circuit execution.

use num_complex::Complex64;
use qsim_core::unitary::{self, apply_to, kron};
use qsim_core::{
    AmplitudeVector, Circuit, Embedding, ErrorKind, ExecutionMode, Gate, QsimError, StandardGate,
};
use std::f64::consts::FRAC_1_SQRT_2;

fn real(values: &[f64]) -> AmplitudeVector {
    AmplitudeVector::from_real(values).unwrap()
}

fn run_all_modes(circuit: &Circuit, initial: &AmplitudeVector) -> Vec<AmplitudeVector> {
    [ExecutionMode::Dense, ExecutionMode::Strided, ExecutionMode::Auto]
        .into_iter()
        .map(|mode| {
            circuit
                .clone()
                .with_execution_mode(mode)
                .run(initial)
                .unwrap()
        })
        .collect()
}

// =============================================================================
// Canonical scenarios
// =============================================================================

#[test]
fn test_hadamard_on_qubit_zero_of_two() {
    let mut circuit = Circuit::new(2).unwrap();
    circuit.append(Gate::hadamard(), &[0]).unwrap();
    let expected = real(&[FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2, 0.0]);
    for out in run_all_modes(&circuit, &real(&[1.0, 0.0, 0.0, 0.0])) {
        assert!(out.approx_eq(&expected, 1e-12));
    }
}

#[test]
fn test_embedding_is_not_bare_matrix_product() {
    // The bare 2x2 matrix cannot act on a 4-vector; the embedded one must.
    let h = Gate::hadamard();
    let e = Embedding::new(1, &[0], 2, "h").unwrap();
    let full = e.dense(h.matrix()).unwrap();
    assert_eq!(full.dim(), (4, 4));
    let expected = kron(h.matrix(), &unitary::identity(2));
    assert!(unitary::approx_eq(&full, &expected, 1e-15));
}

#[test]
fn test_cnot_creates_bell_state() {
    let mut circuit = Circuit::new(2).unwrap();
    circuit.append(Gate::cnot(), &[0, 1]).unwrap();
    let expected = real(&[FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2]);
    for out in run_all_modes(&circuit, &real(&[FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2, 0.0])) {
        assert!(out.approx_eq(&expected, 1e-12));
    }
}

#[test]
fn test_duplicate_cnot_targets_rejected() {
    let mut circuit = Circuit::new(2).unwrap();
    let err = circuit.append(Gate::cnot(), &[0, 0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
}

#[test]
fn test_short_initial_state_rejected() {
    let mut circuit = Circuit::new(2).unwrap();
    circuit.h(0).unwrap();
    let err = circuit.run(&real(&[1.0, 0.0])).unwrap_err();
    assert!(matches!(
        err,
        QsimError::StateLengthMismatch {
            num_qubits: 2,
            expected: 4,
            got: 2
        }
    ));
}

// =============================================================================
// Target order and non-adjacent targets
// =============================================================================

#[test]
fn test_reversed_cnot_roles() {
    // control = qubit 1, target = qubit 0: |01⟩ → |11⟩
    let mut circuit = Circuit::new(2).unwrap();
    circuit.cx(1, 0).unwrap();
    for out in run_all_modes(&circuit, &AmplitudeVector::basis(2, 0b01).unwrap()) {
        assert!(out.approx_eq(&AmplitudeVector::basis(2, 0b11).unwrap(), 1e-12));
    }
    // |10⟩ has the control clear and stays put
    for out in run_all_modes(&circuit, &AmplitudeVector::basis(2, 0b10).unwrap()) {
        assert!(out.approx_eq(&AmplitudeVector::basis(2, 0b10).unwrap(), 1e-12));
    }
}

#[test]
fn test_non_adjacent_cnot() {
    let mut circuit = Circuit::new(3).unwrap();
    circuit.cx(0, 2).unwrap();
    for index in 0..8 {
        let expected = if index & 0b100 != 0 { index ^ 0b001 } else { index };
        let initial = AmplitudeVector::basis(3, index).unwrap();
        for out in run_all_modes(&circuit, &initial) {
            assert!(
                out.approx_eq(&AmplitudeVector::basis(3, expected).unwrap(), 1e-12),
                "|{index:03b}⟩ should map to |{expected:03b}⟩"
            );
        }
    }
}

#[test]
fn test_toffoli_on_scattered_targets() {
    // controls 3 and 0, target 1 on four qubits
    let mut circuit = Circuit::new(4).unwrap();
    circuit.ccx(3, 0, 1).unwrap();
    for index in 0..16 {
        let controls_set = index & 0b1000 != 0 && index & 0b0001 != 0;
        let expected = if controls_set { index ^ 0b0100 } else { index };
        let initial = AmplitudeVector::basis(4, index).unwrap();
        for out in run_all_modes(&circuit, &initial) {
            assert!(out.approx_eq(&AmplitudeVector::basis(4, expected).unwrap(), 1e-12));
        }
    }
}

#[test]
fn test_swap_exchanges_qubits() {
    let mut circuit = Circuit::new(3).unwrap();
    circuit.swap(0, 2).unwrap();
    let out = circuit.run(&AmplitudeVector::basis(3, 0b100).unwrap()).unwrap();
    assert!(out.approx_eq(&AmplitudeVector::basis(3, 0b001).unwrap(), 1e-12));
}

#[test]
fn test_ghz_state() {
    let mut circuit = Circuit::new(3).unwrap();
    circuit.h(0).unwrap().cx(0, 1).unwrap().cx(1, 2).unwrap();
    let mut expected = vec![0.0; 8];
    expected[0] = FRAC_1_SQRT_2;
    expected[7] = FRAC_1_SQRT_2;
    for out in run_all_modes(&circuit, &AmplitudeVector::zero(3).unwrap()) {
        assert!(out.approx_eq(&real(&expected), 1e-12));
    }
}

// =============================================================================
// Realizations agree
// =============================================================================

#[test]
fn test_projection_matches_kron_for_every_contiguous_placement() {
    for gate in StandardGate::ALL {
        let k = gate.num_qubits();
        let matrix = gate.matrix();
        for n in k..=4 {
            for start in 0..=(n - k) {
                let targets: Vec<usize> = (start..start + k).collect();
                let e = Embedding::new(k, &targets, n, gate.name()).unwrap();
                let by_kron = e.dense_by_kron(&matrix).unwrap().unwrap();
                let by_projection = e.dense_by_projection(&matrix).unwrap();
                assert!(
                    unitary::approx_eq(&by_kron, &by_projection, 1e-15),
                    "{gate} on {targets:?} of {n}"
                );
            }
        }
    }
}

#[test]
fn test_strided_matches_dense_for_scattered_targets() {
    let y = StandardGate::Y.matrix();
    let custom = kron(&StandardGate::H.matrix(), &y);
    let gate = Gate::custom("hy", custom).unwrap();

    let initial: Vec<Complex64> = (0..16)
        .map(|i| Complex64::new(i as f64, -(i as f64) / 2.0))
        .collect();

    for targets in [[0, 3], [3, 0], [2, 1], [1, 3]] {
        let e = Embedding::new(2, &targets, 4, gate.name()).unwrap();
        let dense = apply_to(&e.dense(gate.matrix()).unwrap(), &initial);
        let mut strided = initial.clone();
        e.apply(gate.matrix(), &mut strided).unwrap();
        for (a, b) in dense.iter().zip(&strided) {
            assert!((a - b).norm() < 1e-12, "targets {targets:?}");
        }
    }
}

#[test]
fn test_custom_gate_in_circuit() {
    // sqrt(X) twice is X
    let sx = Gate::custom(
        "sx",
        ndarray::array![
            [Complex64::new(0.5, 0.5), Complex64::new(0.5, -0.5)],
            [Complex64::new(0.5, -0.5), Complex64::new(0.5, 0.5)],
        ],
    )
    .unwrap();
    let mut circuit = Circuit::new(2).unwrap();
    circuit.append(sx.clone(), &[1]).unwrap();
    circuit.append(sx, &[1]).unwrap();
    let out = circuit.run_from_zero().unwrap();
    assert!(out.approx_eq(&AmplitudeVector::basis(2, 0b01).unwrap(), 1e-12));
}
