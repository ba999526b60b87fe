//! Gates command implementation.

use console::style;

use qsim_core::StandardGate;

/// Execute the gates command.
pub fn execute() {
    println!("{} Gate library:\n", style("qsim").cyan().bold());
    println!("  {:<8} {:>6}  {}", "name", "qubits", "description");

    for gate in StandardGate::ALL {
        println!(
            "  {:<8} {:>6}  {}",
            style(gate.name()).bold(),
            gate.num_qubits(),
            gate.description()
        );
    }

    println!();
    println!("Aliases: i = id, cnot = cx, toffoli = ccnot = ccx");
    println!(
        "Usage:   {}",
        style("-g name:q0,q1,...  e.g. -g h:0 -g cx:0,1").dim()
    );
}
