//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - Quantum Tree Generator QAOA for quadratic knapsack problems",
        style("qtg").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qtg-ir       Circuit intermediate representation");
    println!("  qtg-compile  Lowering and optimisation passes");
    println!("  qtg-core     Tree generator and state preparation");
    println!("  qtg-qaoa     Mixers, ansatz and variational loop");
    println!("  qtg-problem  Knapsack instances and heuristics");
    println!("  qtg-cli      Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
