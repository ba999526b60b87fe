//! qsim Demo Suite
//!
//! Small, self-contained scenarios that exercise the simulator end to end:
//!
//! - **Single-qubit flip**: H then X on `|0⟩`
//! - **Bell pair**: H on qubit 0 followed by CNOT(0, 1)
//! - **GHZ**: an n-qubit cat state built from a CNOT ladder
//! - **Toffoli**: a doubly controlled flip on arbitrary, non-adjacent qubits
//! - **Grover's search**: amplitude amplification on 2 or 3 qubits
//! - **Coin flip**: a repeated-trial experiment over a Hadamard circuit
//!
//! ```
//! use qsim_demos::circuits::bell_pair;
//!
//! let state = bell_pair().unwrap();
//! let probs = state.probabilities();
//! assert!((probs[0] - 0.5).abs() < 1e-12);
//! assert!((probs[3] - 0.5).abs() < 1e-12);
//! ```

pub mod circuits;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use qsim_core::AmplitudeVector;
use qsim_experiment::ExperimentResult;
use tracing_subscriber::EnvFilter;

/// Install a stderr log subscriber driven by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Create a spinner for demo operations.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Print the non-negligible amplitudes of a state.
pub fn print_state(state: &AmplitudeVector) {
    for (index, z) in state.amplitudes().iter().enumerate() {
        if z.norm_sqr() < 1e-12 {
            continue;
        }
        println!(
            "    {}  {:+.4}{:+.4}i   p = {:.4}",
            style(format!("|{}⟩", state.outcome_to_bitstring(index))).cyan(),
            z.re,
            z.im,
            z.norm_sqr()
        );
    }
}

/// Print outcome frequencies of an experiment, most frequent first.
pub fn print_frequencies(result: &ExperimentResult) {
    let mut rows: Vec<(String, f64)> = result.bitstring_frequencies().into_iter().collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (bits, freq) in rows {
        let bar = "█".repeat((freq * 40.0).round() as usize);
        println!(
            "    {}  {:>6.2}%  {}",
            style(format!("|{bits}⟩")).cyan(),
            freq * 100.0,
            style(bar).green()
        );
    }
}
