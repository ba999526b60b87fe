//! qsim Command-Line Interface
//!
//! Build a circuit from gate specs, evolve a state vector through it and
//! sample measurements, once or over many trials.
//!
//! ```text
//! qsim run -n 2 -g h:0 -g cx:0,1
//! qsim experiment -n 1 -g h:0 --trials 1000 --seed 42 --format json
//! qsim gates
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use qsim_core::ExecutionMode;
use qsim_experiment::RunnerConfig;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::OutputFormat;
use commands::{experiment, gates, run, version};

/// qsim - state-vector quantum circuit simulator
#[derive(Parser)]
#[command(name = "qsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file
    #[arg(short, long, global = true, env = "QSIM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a circuit once and sample one measurement
    Run {
        /// Number of qubits
        #[arg(short = 'n', long)]
        qubits: usize,

        /// Gate to append, as name:q0,q1,... (repeatable, applied in order)
        #[arg(short, long = "gate")]
        gates: Vec<String>,

        /// Initial amplitudes, comma-separated, each `re` or `re:im` (default |0...0⟩)
        #[arg(short, long, allow_hyphen_values = true)]
        state: Option<String>,

        /// Rescale the initial state to unit norm
        #[arg(long)]
        normalize: bool,

        /// Seed for the measurement
        #[arg(long)]
        seed: Option<u64>,

        /// Execution mode (auto, dense, strided)
        #[arg(short, long)]
        mode: Option<ExecutionMode>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Repeat circuit execution and measurement, and report outcome frequencies
    Experiment {
        /// Number of qubits
        #[arg(short = 'n', long)]
        qubits: usize,

        /// Gate to append, as name:q0,q1,... (repeatable, applied in order)
        #[arg(short, long = "gate")]
        gates: Vec<String>,

        /// Initial amplitudes, comma-separated, each `re` or `re:im` (default |0...0⟩)
        #[arg(short, long, allow_hyphen_values = true)]
        state: Option<String>,

        /// Rescale the initial state to unit norm
        #[arg(long)]
        normalize: bool,

        /// Number of trials
        #[arg(short, long)]
        trials: Option<usize>,

        /// Base seed
        #[arg(long)]
        seed: Option<u64>,

        /// Worker threads
        #[arg(short, long)]
        workers: Option<usize>,

        /// Evolve once and sample every trial from the same final state
        #[arg(long)]
        shots: bool,

        /// Execution mode (auto, dense, strided)
        #[arg(short, long)]
        mode: Option<ExecutionMode>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List the gate library
    Gates,

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = RunnerConfig::load(cli.config.as_deref());

    // Setup logging
    let filter = match cli.verbose {
        0 => config
            .as_ref()
            .map_or("warn", |c| c.logging.level.as_str())
            .to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = config.map_err(anyhow::Error::from).and_then(|config| match cli.command {
        Commands::Run {
            qubits,
            gates,
            state,
            normalize,
            seed,
            mode,
            format,
        } => run::execute(
            &config,
            &run::RunArgs {
                qubits,
                gates,
                state,
                normalize,
                seed,
                mode,
                format,
            },
        ),

        Commands::Experiment {
            qubits,
            gates,
            state,
            normalize,
            trials,
            seed,
            workers,
            shots,
            mode,
            format,
        } => experiment::execute(
            &config,
            &experiment::ExperimentArgs {
                qubits,
                gates,
                state,
                normalize,
                trials,
                seed,
                workers,
                shots,
                mode,
                format,
            },
        ),

        Commands::Gates => {
            gates::execute();
            Ok(())
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    });

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
