//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - state-vector quantum circuit simulator",
        style("qsim").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qsim-core        Amplitude vectors, gates, embedding and circuits");
    println!("  qsim-experiment  Measurement sampling and repeated-trial experiments");
    println!("  qsim-cli         Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
