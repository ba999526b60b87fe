//! Run command implementation.

use anyhow::Result;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

use qsim_core::ExecutionMode;
use qsim_experiment::{RunnerConfig, measure_with_tolerance};

use super::common::{
    OutputFormat, build_circuit, format_complex, initial_state, resolve_seed,
};

/// Arguments of `qsim run`.
pub struct RunArgs {
    pub qubits: usize,
    pub gates: Vec<String>,
    pub state: Option<String>,
    pub normalize: bool,
    pub seed: Option<u64>,
    pub mode: Option<ExecutionMode>,
    pub format: OutputFormat,
}

/// Execute the run command.
pub fn execute(config: &RunnerConfig, args: &RunArgs) -> Result<()> {
    let tolerance = config.simulation.tolerance;
    let circuit = build_circuit(args.qubits, &args.gates, args.mode, config)?;
    let initial = initial_state(args.qubits, args.state.as_deref(), args.normalize, tolerance)?;

    let final_state = circuit.run(&initial)?;

    let seed = resolve_seed(args.seed, config);
    let mut rng = StdRng::seed_from_u64(seed);
    let outcome = measure_with_tolerance(&final_state, tolerance, &mut rng)?;

    let num_qubits = final_state.num_qubits();
    let probabilities = final_state.probabilities();

    match args.format {
        OutputFormat::Json => {
            let amplitudes: Vec<_> = final_state
                .amplitudes()
                .iter()
                .enumerate()
                .map(|(index, z)| {
                    json!({
                        "index": index,
                        "basis": final_state.outcome_to_bitstring(index),
                        "re": z.re,
                        "im": z.im,
                    })
                })
                .collect();
            let output = json!({
                "num_qubits": num_qubits,
                "gates": args.gates,
                "execution_mode": circuit.execution_mode().resolve(num_qubits).as_str(),
                "seed": seed,
                "amplitudes": amplitudes,
                "probabilities": probabilities,
                "measurement": {
                    "index": outcome.index(),
                    "bitstring": outcome.bitstring(),
                },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            println!(
                "{} Ran {} gate(s) on {} qubit(s) ({} mode)",
                style("→").cyan().bold(),
                circuit.len(),
                num_qubits,
                style(circuit.execution_mode().resolve(num_qubits)).yellow()
            );
            println!();
            println!("  {:<8} {:<28} {:>10}", "basis", "amplitude", "prob");
            for (index, z) in final_state.amplitudes().iter().enumerate() {
                if probabilities[index] < 1e-15 && num_qubits > 4 {
                    continue;
                }
                println!(
                    "  {:<8} {:<28} {:>10.6}",
                    style(format!("|{}⟩", final_state.outcome_to_bitstring(index))).cyan(),
                    format_complex(*z),
                    probabilities[index]
                );
            }
            println!();
            println!(
                "{} Measured {} (seed {})",
                style("✓").green().bold(),
                style(outcome).green(),
                seed
            );
        }
    }

    Ok(())
}
