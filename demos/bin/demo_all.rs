//! Complete Demo Suite
//!
//! Runs the basic scenarios in sequence: single-qubit evolution, Bell-pair
//! entanglement, a repeated coin-flip experiment and the error paths.

use std::time::Instant;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use qsim_demos::circuits::{
    bell_pair, cnot_on_superposition, coin_flip, duplicate_target_error, ghz, single_qubit_flip,
    toffoli_on,
};
use qsim_demos::{
    create_spinner, init_logging, print_frequencies, print_header, print_info, print_result,
    print_section, print_state, print_success,
};
use qsim_experiment::measure;

#[derive(Parser, Debug)]
#[command(name = "demo-all")]
#[command(about = "Run the complete demo suite")]
struct Args {
    /// Trials for the coin-flip experiment
    #[arg(short, long, default_value = "1000")]
    trials: usize,

    /// Seed for measurements and the experiment
    #[arg(long, default_value = "42")]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();
    let start = Instant::now();
    let mut rng = StdRng::seed_from_u64(args.seed);

    print_header("qsim Demo Suite");

    // =========================================================================
    // Part 1: Single qubit
    // =========================================================================
    print_section("Part 1: H then X on |0⟩");
    let state = single_qubit_flip()?;
    print_state(&state);
    print_result("Squared norm", format!("{:.12}", state.norm_sqr()));
    print_result("Measured", measure(&state, &mut rng)?);
    print_success("Single-qubit demo complete!");

    // =========================================================================
    // Part 2: Entanglement
    // =========================================================================
    print_section("Part 2: Bell pair");
    let state = bell_pair()?;
    print_state(&state);
    print_result("Measured", measure(&state, &mut rng)?);

    print_info("CNOT(0, 1) on [1/√2, 0, 1/√2, 0]:");
    let state = cnot_on_superposition()?;
    print_state(&state);

    print_info("GHZ on 4 qubits:");
    print_state(&ghz(4)?);

    print_info("Toffoli on controls 0, 2 and target 4 of 5 qubits:");
    print_state(&toffoli_on(0, 2, 4, 5)?);
    print_success("Entanglement demo complete!");

    // =========================================================================
    // Part 3: Experiment
    // =========================================================================
    print_section(&format!("Part 3: Coin flip, {} trials", args.trials));
    let spinner = create_spinner("Flipping...");
    let result = coin_flip(args.trials, args.seed);
    spinner.finish_and_clear();
    let result = result?;
    print_frequencies(&result);
    print_success("Experiment demo complete!");

    // =========================================================================
    // Part 4: Errors
    // =========================================================================
    print_section("Part 4: Rejected input");
    let err = duplicate_target_error();
    print_result("CNOT on [0, 0]", format!("{err} ({:?})", err.kind()));

    println!();
    print_result("Total time", format!("{:.2?}", start.elapsed()));
    Ok(())
}
