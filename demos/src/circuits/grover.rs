//! Grover's search on small registers.
//!
//! The oracle and the diffusion operator both reduce to a phase flip on
//! `|1...1⟩`: a CZ on two qubits, or H·CCX·H on three. Larger registers
//! would need ancilla qubits for the multi-controlled Z and are rejected.

use std::f64::consts::PI;

use qsim_core::{Circuit, QsimError, QsimResult};

/// Generate a Grover search circuit over `num_qubits` ∈ {2, 3}.
///
/// `marked` is a register index, so qubit 0 is its most significant bit.
pub fn grover_circuit(num_qubits: usize, marked: usize, iterations: usize) -> QsimResult<Circuit> {
    if !(2..=3).contains(&num_qubits) {
        return Err(QsimError::InvalidArgument(format!(
            "grover supports 2 or 3 qubits, got {num_qubits}"
        )));
    }
    if marked >= 1 << num_qubits {
        return Err(QsimError::InvalidArgument(format!(
            "marked state {marked} does not fit in {num_qubits} qubits"
        )));
    }

    let mut circuit = Circuit::new(num_qubits)?.with_name("grover");
    for q in 0..num_qubits {
        circuit.h(q)?;
    }

    for _ in 0..iterations {
        apply_oracle(&mut circuit, marked)?;
        apply_diffusion(&mut circuit)?;
    }

    Ok(circuit)
}

/// Optimal iteration count, `⌊π / 4θ⌋` with `sin θ = 1/√N`.
pub fn optimal_iterations(num_qubits: usize) -> usize {
    let theta = rotation_angle(num_qubits);
    ((PI / (4.0 * theta)).floor() as usize).max(1)
}

/// Analytic probability of measuring the marked state after `iterations`.
pub fn success_probability(num_qubits: usize, iterations: usize) -> f64 {
    let theta = rotation_angle(num_qubits);
    ((2 * iterations + 1) as f64 * theta).sin().powi(2)
}

fn rotation_angle(num_qubits: usize) -> f64 {
    let n = (1usize << num_qubits) as f64;
    (1.0 / n.sqrt()).asin()
}

// Phase-flip the marked basis state.
fn apply_oracle(circuit: &mut Circuit, marked: usize) -> QsimResult<()> {
    let n = circuit.num_qubits();
    let zeros: Vec<usize> = (0..n)
        .filter(|&q| (marked >> (n - 1 - q)) & 1 == 0)
        .collect();

    for &q in &zeros {
        circuit.x(q)?;
    }
    apply_phase_flip_all_ones(circuit)?;
    for &q in &zeros {
        circuit.x(q)?;
    }
    Ok(())
}

// Inversion about the mean: H X (phase flip on |1...1⟩) X H.
fn apply_diffusion(circuit: &mut Circuit) -> QsimResult<()> {
    let n = circuit.num_qubits();
    for q in 0..n {
        circuit.h(q)?.x(q)?;
    }
    apply_phase_flip_all_ones(circuit)?;
    for q in 0..n {
        circuit.x(q)?.h(q)?;
    }
    Ok(())
}

fn apply_phase_flip_all_ones(circuit: &mut Circuit) -> QsimResult<()> {
    match circuit.num_qubits() {
        2 => {
            circuit.cz(0, 1)?;
        }
        3 => {
            circuit.h(2)?.ccx(0, 1, 2)?.h(2)?;
        }
        n => {
            return Err(QsimError::InvalidArgument(format!(
                "no multi-controlled Z for {n} qubits"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_iterations() {
        assert_eq!(optimal_iterations(2), 1);
        assert_eq!(optimal_iterations(3), 2);
    }

    #[test]
    fn test_success_probability() {
        // One iteration is exact on two qubits.
        assert!((success_probability(2, 1) - 1.0).abs() < 1e-12);
        assert!(success_probability(3, 2) > 0.94);
    }

    #[test]
    fn test_two_qubit_search_is_exact() {
        for marked in 0..4 {
            let state = grover_circuit(2, marked, 1).unwrap().run_from_zero().unwrap();
            assert!((state.probabilities()[marked] - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rejects_unsupported_sizes() {
        assert!(grover_circuit(4, 0, 1).is_err());
        assert!(grover_circuit(2, 4, 1).is_err());
    }
}
