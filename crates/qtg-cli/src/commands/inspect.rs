//! Inspect command implementation.

use anyhow::Result;
use console::style;

use qtg_compile::{PassManager, PropertySet};
use qtg_problem::{greedy_deletion, selection_string};
use qtg_qaoa::{QkpSolver, SolverConfig};

use super::common::{load_instance, print_circuit_stats, print_gate_counts};

/// Execute the inspect command.
pub fn execute(path: &str) -> Result<()> {
    let instance = load_instance(path)?;
    println!(
        "{} {} ({} items, capacity {})",
        style("→").cyan().bold(),
        style(instance.label()).green(),
        instance.num_items(),
        instance.capacity()
    );

    let greedy = greedy_deletion(&instance);
    println!(
        "  Greedy:  {}  value {}",
        style(selection_string(&greedy)).cyan(),
        instance.value(&greedy)
    );

    let solver = QkpSolver::new(instance, SolverConfig::default());
    let qtg = solver.tree_generator(&greedy)?;
    let layout = qtg.layout();

    println!("\n  Register layout ({} qubits):", layout.num_qubits());
    for (name, qubits) in layout.registers() {
        let (Some(first), Some(last)) = (qubits.first(), qubits.last()) else {
            continue;
        };
        println!(
            "    {:<8} {:>3} qubit(s)  [{}..={}]",
            style(name).yellow(),
            qubits.len(),
            first.0,
            last.0
        );
    }

    let raw = qtg.build()?;
    let lowered = qtg.build_lowered()?;
    let mut optimized = raw.clone();
    let mut props = PropertySet::new();
    PassManager::optimizing().run(&mut optimized, &mut props)?;

    println!("\n  Tree generator:");
    print_circuit_stats("raw", &raw);
    print_gate_counts(&raw.count_ops());
    print_circuit_stats("lowered", &lowered);
    print_gate_counts(&lowered.count_ops());
    print_circuit_stats("optimized", &optimized);
    if let Some(stats) = &props.stats {
        print_gate_counts(&stats.counts);
    }
    println!(
        "    {} composite(s) expanded, {} gate(s) cancelled",
        props.expanded, props.cancelled
    );

    let feasible = qtg.feasible_states();
    println!(
        "\n  {} feasible selection(s) out of 2^{}",
        style(feasible.len()).green().bold(),
        qtg.num_items()
    );

    let ansatz = solver.ansatz()?;
    println!("\n  Ansatz ({} reps):", ansatz.reps());
    print_circuit_stats("qaoa", ansatz.circuit());
    println!("    parameters: {}", ansatz.parameters().join(", "));

    Ok(())
}
