//! Prepare command implementation.

use anyhow::{Context, Result};
use console::style;

use qtg_adapter_sim::Statevector;
use qtg_core::StatePreparation;

use super::common::{print_circuit_stats, print_distribution, print_gate_counts};

/// Execute the prepare command.
pub fn execute(bitstrings: &[String], isometry: bool) -> Result<()> {
    let prep = StatePreparation::from_bitstrings(bitstrings)
        .context("Invalid bitstrings")?;
    println!(
        "{} Preparing {} state(s) on {} qubit(s) ({})",
        style("→").cyan().bold(),
        prep.probabilities().len(),
        prep.num_qubits(),
        if isometry { "isometry" } else { "binary tree" }
    );

    let circuit = if isometry {
        prep.build_isometry()?
    } else {
        prep.build()?
    };
    print_circuit_stats(circuit.name(), &circuit);
    print_gate_counts(&circuit.count_ops());

    let sv = Statevector::from_circuit(&circuit)?;
    let probs = sv.probabilities();
    let mut rows: Vec<(String, f64)> = probs
        .iter()
        .enumerate()
        .filter(|(_, p)| **p > 1e-12)
        .map(|(i, p)| (sv.outcome_to_bitstring(i), *p))
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    println!("\n  Simulated distribution:");
    print_distribution(rows.iter().map(|(b, p)| (b.as_str(), *p)), 32);
    Ok(())
}
