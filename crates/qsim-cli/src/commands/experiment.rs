//! Experiment command implementation.

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use qsim_core::{ExecutionMode, QsimResult, index_to_bitstring};
use qsim_experiment::{ExperimentRunner, RunnerConfig, TrialSetup};

use super::common::{OutputFormat, build_circuit, initial_state, print_counts, resolve_seed};

/// Arguments of `qsim experiment`.
pub struct ExperimentArgs {
    pub qubits: usize,
    pub gates: Vec<String>,
    pub state: Option<String>,
    pub normalize: bool,
    pub trials: Option<usize>,
    pub seed: Option<u64>,
    pub workers: Option<usize>,
    pub shots: bool,
    pub mode: Option<ExecutionMode>,
    pub format: OutputFormat,
}

/// Execute the experiment command.
pub fn execute(config: &RunnerConfig, args: &ExperimentArgs) -> Result<()> {
    let mut experiment = config.experiment.clone();
    if let Some(trials) = args.trials {
        experiment.trials = trials;
    }
    if let Some(workers) = args.workers {
        experiment.workers = workers;
    }
    let seed = resolve_seed(args.seed, config);
    experiment.seed = Some(seed);

    let tolerance = config.simulation.tolerance;
    let circuit = build_circuit(args.qubits, &args.gates, args.mode, config)?;
    let initial = initial_state(args.qubits, args.state.as_deref(), args.normalize, tolerance)?;

    if args.format == OutputFormat::Table {
        println!(
            "{} {} trial(s) of {} gate(s) on {} qubit(s), seed {}, {} worker(s)",
            style("→").cyan().bold(),
            experiment.trials,
            circuit.len(),
            args.qubits,
            seed,
            experiment.workers
        );
    }

    let runner = ExperimentRunner::new(experiment.clone()).with_tolerance(tolerance);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Running trials...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = if args.shots {
        runner.sample_shots(&circuit, &initial, experiment.trials)
    } else {
        let factory = |_trial: usize| -> QsimResult<TrialSetup> {
            Ok(TrialSetup::new(circuit.clone(), initial.clone()))
        };
        runner.run(&factory)
    };
    spinner.finish_and_clear();
    let result = result?;

    match args.format {
        OutputFormat::Json => {
            let counts: serde_json::Map<_, _> = result
                .counts()
                .iter()
                .map(|(&index, &count)| {
                    (index_to_bitstring(index, result.num_qubits()), json!(count))
                })
                .collect();
            let output = json!({
                "num_qubits": result.num_qubits(),
                "trials": result.trials(),
                "seed": seed,
                "workers": experiment.workers,
                "shots": args.shots,
                "counts": counts,
                "frequencies": result.bitstring_frequencies(),
                "marginals": result.marginals(),
                "most_frequent": result
                    .most_frequent()
                    .map(|(index, _)| index_to_bitstring(index, result.num_qubits())),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            print_counts(&result);
            println!("\n  Marginals:");
            for (qubit, [p0, p1]) in result.marginals().into_iter().enumerate() {
                println!(
                    "    q{qubit}: P(0) = {}  P(1) = {}",
                    style(format!("{p0:.4}")).yellow(),
                    style(format!("{p1:.4}")).yellow()
                );
            }
        }
    }

    Ok(())
}
