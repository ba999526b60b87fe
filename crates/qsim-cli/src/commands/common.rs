//! Shared helpers for CLI commands.

use anyhow::{Context, Result};
use clap::ValueEnum;
use console::style;
use tracing::{info, warn};

use qsim_core::{AmplitudeVector, Circuit, Complex64, ExecutionMode, Gate};
use qsim_experiment::{ExperimentResult, RunnerConfig};

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Machine-readable JSON
    Json,
}

/// Parse a gate spec such as `h:0`, `cx:0,1` or `toffoli:0,1,2`.
pub fn parse_gate_spec(spec: &str) -> Result<(Gate, Vec<usize>)> {
    let (name, targets) = spec
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("expected name:q0,q1,..., got '{spec}'"))?;

    let gate: Gate = name.trim().parse()?;
    let targets = targets
        .split(',')
        .map(|t| {
            t.trim()
                .parse::<usize>()
                .with_context(|| format!("invalid qubit index '{}'", t.trim()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((gate, targets))
}

/// Build a circuit from gate specs using the configured mode and tolerance.
pub fn build_circuit(
    num_qubits: usize,
    specs: &[String],
    mode: Option<ExecutionMode>,
    config: &RunnerConfig,
) -> Result<Circuit> {
    let mut circuit = Circuit::new(num_qubits)?
        .with_name("cli")
        .with_execution_mode(mode.unwrap_or(config.simulation.execution_mode))
        .with_tolerance(config.simulation.tolerance);

    for spec in specs {
        let (gate, targets) =
            parse_gate_spec(spec).with_context(|| format!("Invalid gate '{spec}'"))?;
        circuit
            .append(gate, &targets)
            .with_context(|| format!("Invalid gate '{spec}'"))?;
    }
    Ok(circuit)
}

/// Parse comma-separated amplitudes, each `re` or `re:im`.
pub fn parse_state(spec: &str) -> Result<AmplitudeVector> {
    let amplitudes = spec
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            let (re, im) = entry.split_once(':').unwrap_or((entry, "0"));
            let re: f64 = re
                .trim()
                .parse()
                .with_context(|| format!("invalid amplitude '{entry}'"))?;
            let im: f64 = im
                .trim()
                .parse()
                .with_context(|| format!("invalid amplitude '{entry}'"))?;
            Ok(Complex64::new(re, im))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AmplitudeVector::from_amplitudes(amplitudes)?)
}

/// The initial state for `num_qubits`: the parsed `--state`, or `|0...0⟩`.
pub fn initial_state(
    num_qubits: usize,
    spec: Option<&str>,
    normalize: bool,
    tolerance: f64,
) -> Result<AmplitudeVector> {
    let Some(spec) = spec else {
        return Ok(AmplitudeVector::zero(num_qubits)?);
    };

    let mut state = parse_state(spec)?;
    if normalize {
        let norm_sqr = state.norm_sqr();
        if (norm_sqr - 1.0).abs() > tolerance {
            warn!(norm_sqr, "Rescaling initial state to unit norm");
        }
        state.normalize()?;
    }
    Ok(state)
}

/// Resolve the seed, drawing one when neither the CLI nor the config sets it.
pub fn resolve_seed(cli: Option<u64>, config: &RunnerConfig) -> u64 {
    cli.or(config.experiment.seed).unwrap_or_else(|| {
        let seed = rand::random::<u64>();
        info!(seed, "No seed given, using a random seed");
        seed
    })
}

/// Format a complex number compactly.
pub fn format_complex(z: Complex64) -> String {
    if z.im.abs() < 1e-12 {
        format!("{:+.6}", z.re)
    } else {
        format!("{:+.6}{:+.6}i", z.re, z.im)
    }
}

/// Print outcome counts as a table with bars.
pub fn print_counts(result: &ExperimentResult) {
    println!(
        "\n{} Results ({} trials):",
        style("✓").green().bold(),
        result.trials()
    );

    let mut sorted: Vec<(usize, u64)> = result.counts().iter().map(|(&i, &c)| (i, c)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    for &(index, count) in sorted.iter().take(16) {
        let prob = result.frequency(index) * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>8} ({:>6.2}%) {}",
            style(qsim_core::index_to_bitstring(index, result.num_qubits())).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }
}
