//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qtg_ir::Circuit;
use qtg_problem::KnapsackInstance;
use qtg_qaoa::SolverConfig;

/// Load an instance file.
pub fn load_instance(path: &str) -> Result<KnapsackInstance> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    KnapsackInstance::from_file(path).with_context(|| format!("Failed to read instance: {path}"))
}

/// Load a YAML solver configuration; missing fields take their defaults.
pub fn load_config(path: &str) -> Result<SolverConfig> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read config: {path}"))?;
    serde_yaml_ng::from_str(&source).with_context(|| format!("Invalid config: {path}"))
}

/// Print one line of circuit statistics.
pub fn print_circuit_stats(label: &str, circuit: &Circuit) {
    println!(
        "  {:<10} {:>3} qubits, {:>6} ops, depth {:>5}",
        style(label).cyan(),
        circuit.num_qubits(),
        circuit.num_ops(),
        circuit.depth()
    );
}

/// Print gate counts, most frequent first.
pub fn print_gate_counts<'a>(counts: impl IntoIterator<Item = (&'a String, &'a usize)>) {
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    let line = counts
        .iter()
        .map(|(name, n)| format!("{name}: {n}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!("    {}", style(line).dim());
}

/// Print a probability table with bars.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn print_distribution<'a>(rows: impl IntoIterator<Item = (&'a str, f64)>, limit: usize) {
    for (bitstring, p) in rows.into_iter().take(limit) {
        let percent = p * 100.0;
        let bar: String = "█".repeat((percent / 2.0).round() as usize);
        println!(
            "  {}: {:>6.2}% {}",
            style(bitstring).cyan(),
            percent,
            style(bar).green()
        );
    }
}
