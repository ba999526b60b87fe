//! Grover's Search Algorithm Demo
//!
//! Amplifies one marked basis state of a 2- or 3-qubit register.

use clap::Parser;

use qsim_core::AmplitudeVector;
use qsim_demos::circuits::{grover_circuit, optimal_iterations, success_probability};
use qsim_demos::{
    init_logging, print_frequencies, print_header, print_result, print_section, print_state,
    print_success,
};
use qsim_experiment::{ExperimentConfig, ExperimentRunner};

#[derive(Parser, Debug)]
#[command(name = "demo-grover")]
#[command(about = "Demonstrate Grover's search algorithm")]
struct Args {
    /// Number of qubits (2 or 3)
    #[arg(short = 'n', long, default_value = "3")]
    qubits: usize,

    /// Marked state to search for (0 to 2^n - 1)
    #[arg(short, long, default_value = "5")]
    marked: usize,

    /// Number of Grover iterations (0 = optimal)
    #[arg(short, long, default_value = "0")]
    iterations: usize,

    /// Shots to sample
    #[arg(short, long, default_value = "1000")]
    shots: usize,

    /// Seed
    #[arg(long, default_value = "42")]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    print_header("Grover's Search Algorithm Demo");

    let iterations = if args.iterations == 0 {
        optimal_iterations(args.qubits)
    } else {
        args.iterations
    };

    print_section("Problem Setup");
    print_result("Qubits", args.qubits);
    print_result("Search space size", 1usize << args.qubits);
    print_result(
        "Marked state",
        format!(
            "|{}⟩ = |{:0width$b}⟩",
            args.marked,
            args.marked,
            width = args.qubits
        ),
    );
    print_result("Iterations", iterations);

    let circuit = grover_circuit(args.qubits, args.marked, iterations)?;
    print_result("Gates", circuit.len());

    print_section("Final state");
    let state = circuit.run_from_zero()?;
    print_state(&state);
    print_result(
        "Expected success",
        format!("{:.1}%", success_probability(args.qubits, iterations) * 100.0),
    );

    print_section("Sampling");
    let config = ExperimentConfig::default()
        .with_trials(args.shots)
        .with_seed(args.seed);
    let initial = AmplitudeVector::zero(args.qubits)?;
    let result = ExperimentRunner::new(config).sample_shots(&circuit, &initial, args.shots)?;
    print_frequencies(&result);
    print_result(
        "Observed success",
        format!("{:.1}%", result.frequency(args.marked) * 100.0),
    );

    print_success("Grover demo complete!");
    Ok(())
}
