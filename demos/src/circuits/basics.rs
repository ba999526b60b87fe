//! The basic scenarios: single-qubit evolution, entanglement and a
//! repeated-trial experiment.

use qsim_core::{AmplitudeVector, Circuit, QsimError, QsimResult};
use qsim_experiment::{
    ExperimentConfig, ExperimentResult, ExperimentRunner, RunnerResult, TrialSetup,
};

/// H then X on a single qubit starting in `|0⟩`.
///
/// Both amplitudes end at `1/√2`: X swaps the two equal components.
pub fn single_qubit_flip() -> QsimResult<AmplitudeVector> {
    let mut circuit = Circuit::new(1)?.with_name("single_qubit_flip");
    circuit.h(0)?.x(0)?;
    circuit.run_from_zero()
}

/// H on qubit 0 followed by CNOT(0, 1).
pub fn bell_circuit() -> QsimResult<Circuit> {
    let mut circuit = Circuit::new(2)?.with_name("bell");
    circuit.h(0)?.cx(0, 1)?;
    Ok(circuit)
}

/// The Bell state `(|00⟩ + |11⟩)/√2`.
pub fn bell_pair() -> QsimResult<AmplitudeVector> {
    bell_circuit()?.run_from_zero()
}

/// H on qubit 0 followed by a CNOT ladder down the register.
pub fn ghz_circuit(num_qubits: usize) -> QsimResult<Circuit> {
    let mut circuit = Circuit::new(num_qubits)?.with_name(format!("ghz_{num_qubits}"));
    circuit.h(0)?;
    for q in 1..num_qubits {
        circuit.cx(q - 1, q)?;
    }
    Ok(circuit)
}

/// The n-qubit GHZ state `(|0...0⟩ + |1...1⟩)/√2`.
pub fn ghz(num_qubits: usize) -> QsimResult<AmplitudeVector> {
    ghz_circuit(num_qubits)?.run_from_zero()
}

/// Set both controls to 1 and apply a Toffoli on `(c0, c1, target)`.
///
/// The result is the basis state with exactly the three named qubits set.
pub fn toffoli_on(
    c0: usize,
    c1: usize,
    target: usize,
    num_qubits: usize,
) -> QsimResult<AmplitudeVector> {
    let mut circuit = Circuit::new(num_qubits)?.with_name("toffoli");
    circuit.x(c0)?.x(c1)?.ccx(c0, c1, target)?;
    circuit.run_from_zero()
}

/// Flip a fair quantum coin `trials` times.
///
/// Each trial prepares `|0⟩`, applies H and measures.
pub fn coin_flip(trials: usize, seed: u64) -> RunnerResult<ExperimentResult> {
    let config = ExperimentConfig::default()
        .with_trials(trials)
        .with_seed(seed);
    let runner = ExperimentRunner::new(config);
    let factory = |_trial: usize| -> QsimResult<TrialSetup> {
        let mut circuit = Circuit::new(1)?.with_name("coin");
        circuit.h(0)?;
        TrialSetup::from_zero(circuit)
    };
    runner.run(&factory)
}

/// The two-qubit scenario on an explicit input, `[1/√2, 0, 1/√2, 0]`.
///
/// Qubit 0 starts superposed and qubit 1 at 0; CNOT(0, 1) entangles them.
pub fn cnot_on_superposition() -> QsimResult<AmplitudeVector> {
    let h = std::f64::consts::FRAC_1_SQRT_2;
    let initial = AmplitudeVector::from_real(&[h, 0.0, h, 0.0])?;
    let mut circuit = Circuit::new(2)?.with_name("cnot");
    circuit.cx(0, 1)?;
    circuit.run(&initial)
}

/// A deliberately broken circuit: CNOT on the same qubit twice.
pub fn duplicate_target_error() -> QsimError {
    match Circuit::new(2).and_then(|mut c| c.cx(0, 0).map(|_| ())) {
        Err(err) => err,
        Ok(()) => QsimError::InvalidArgument("duplicate targets were accepted".into()),
    }
}
