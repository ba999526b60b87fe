//! GHZ State Demo
//!
//! Prepares an n-qubit GHZ state and samples it repeatedly. Only the
//! all-zeros and all-ones outcomes should ever appear.

use clap::Parser;

use qsim_core::{AmplitudeVector, ExecutionMode};
use qsim_demos::circuits::ghz_circuit;
use qsim_demos::{
    create_spinner, init_logging, print_frequencies, print_header, print_result, print_section,
    print_state, print_success,
};
use qsim_experiment::{ExperimentConfig, ExperimentRunner};

#[derive(Parser, Debug)]
#[command(name = "demo-ghz")]
#[command(about = "Prepare and sample a GHZ state")]
struct Args {
    /// Number of qubits
    #[arg(short = 'n', long, default_value = "5")]
    qubits: usize,

    /// Number of shots
    #[arg(short, long, default_value = "10000")]
    shots: usize,

    /// Worker threads
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Seed
    #[arg(long, default_value = "7")]
    seed: u64,

    /// Execution mode (auto, dense, strided)
    #[arg(short, long, default_value = "auto")]
    mode: ExecutionMode,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    print_header("GHZ State Demo");

    print_section("Circuit");
    let circuit = ghz_circuit(args.qubits)?.with_execution_mode(args.mode);
    print_result("Qubits", args.qubits);
    print_result("Gates", circuit.len());
    print_result("Mode", circuit.execution_mode().resolve(args.qubits));

    print_section("Final state");
    let state = circuit.run_from_zero()?;
    print_state(&state);

    print_section("Sampling");
    let config = ExperimentConfig::default()
        .with_trials(args.shots)
        .with_seed(args.seed)
        .with_workers(args.workers);
    let runner = ExperimentRunner::new(config);

    let initial = AmplitudeVector::zero(args.qubits)?;
    let spinner = create_spinner("Sampling...");
    let result = runner.sample_shots(&circuit, &initial, args.shots);
    spinner.finish_and_clear();
    let result = result?;

    print_frequencies(&result);
    print_result("Distinct outcomes", result.counts().len());
    print_success("GHZ demo complete!");
    Ok(())
}
