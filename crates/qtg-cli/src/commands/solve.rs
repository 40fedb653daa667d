//! Solve command implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;

use qtg_adapter_sim::{SimulatorConfig, SimulatorOracle};
use qtg_qaoa::{InstanceKind, QkpSolver, SolveReport, SolverConfig};

use super::common::{load_config, load_instance, print_distribution};

/// Command-line values that override the configuration file.
#[derive(Debug, Clone, Default)]
pub struct SolveOverrides {
    pub reps: Option<usize>,
    pub shots: Option<u32>,
    pub estimator_shots: Option<u32>,
    pub bias: Option<f64>,
    pub kind: Option<String>,
    pub maxiter: Option<usize>,
    pub tol: Option<f64>,
    pub seed: Option<u64>,
    pub history: bool,
}

impl SolveOverrides {
    /// Apply the overrides on top of `config`.
    pub fn apply(&self, mut config: SolverConfig) -> Result<SolverConfig> {
        if let Some(reps) = self.reps {
            config.reps = reps;
        }
        if let Some(shots) = self.shots {
            config.shots = shots;
        }
        if self.estimator_shots.is_some() {
            config.estimator_shots = self.estimator_shots;
        }
        if let Some(bias) = self.bias {
            config.bias = bias;
        }
        if let Some(kind) = &self.kind {
            config.kind = kind.parse::<InstanceKind>()?;
        }
        if let Some(maxiter) = self.maxiter {
            config.maxiter = maxiter;
        }
        if let Some(tol) = self.tol {
            config.tol = tol;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.record_history |= self.history;
        config.validate()?;
        Ok(config)
    }
}

/// JSON form of a solve run, written by `--output`.
#[derive(Debug, Serialize)]
struct ReportFile<'a> {
    instance: &'a str,
    kind: InstanceKind,
    reps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimator_shots: Option<u32>,
    best: &'a str,
    best_value: i64,
    greedy: &'a str,
    greedy_value: i64,
    energy: f64,
    params: &'a [f64],
    counts: Vec<(&'a str, u64)>,
    #[serde(skip_serializing_if = "<[f64]>::is_empty")]
    history: &'a [f64],
}

impl<'a> ReportFile<'a> {
    fn new(label: &'a str, config: &SolverConfig, report: &'a SolveReport) -> Self {
        Self {
            instance: label,
            kind: config.kind,
            reps: config.reps,
            estimator_shots: config.estimator_shots,
            best: &report.best,
            best_value: report.best_value,
            greedy: &report.greedy,
            greedy_value: report.greedy_value,
            energy: report.energy,
            params: &report.params,
            counts: report
                .counts
                .sorted()
                .into_iter()
                .map(|(bits, n)| (bits.as_str(), n))
                .collect(),
            history: &report.history,
        }
    }
}

/// Execute the solve command.
pub fn execute(
    path: &str,
    config_path: Option<&str>,
    overrides: &SolveOverrides,
    save: bool,
    output: Option<&str>,
) -> Result<()> {
    let base = match config_path {
        Some(p) => load_config(p)?,
        None => SolverConfig::default(),
    };
    let config = overrides.apply(base)?;
    debug!(?config, "solver configuration");

    let instance = load_instance(path)?;
    println!(
        "{} Solving {} ({} items, capacity {}, {:?})",
        style("→").cyan().bold(),
        style(instance.label()).green(),
        instance.num_items(),
        instance.capacity(),
        config.kind
    );

    let oracle = SimulatorOracle::from_config(SimulatorConfig {
        shots: config.estimator_shots,
        seed: config.seed,
        ..SimulatorConfig::default()
    });
    let label = instance.label().to_string();
    let solver = QkpSolver::new(instance, config.clone());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("invalid spinner template")?,
    );
    spinner.set_message("Optimising angles...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let report = solver.solve(&oracle);
    spinner.finish_and_clear();
    let report = report.context("Solve failed")?;

    println!("{} Optimisation converged", style("✓").green().bold());
    println!(
        "  Energy:  {:.6}  (angles: {})",
        report.energy,
        report
            .params
            .iter()
            .map(|p| format!("{p:.4}"))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  QTG-QAOA: {}  value {}",
        style(&report.best).cyan(),
        style(report.best_value).yellow().bold()
    );
    println!(
        "  Greedy:   {}  value {}",
        style(&report.greedy).cyan(),
        style(report.greedy_value).yellow()
    );

    let total = report.counts.total_shots() as f64;
    println!("\n  Measured selections ({} shots):", report.counts.total_shots());
    print_distribution(
        report
            .counts
            .sorted()
            .into_iter()
            .map(|(bits, n)| (bits.as_str(), n as f64 / total)),
        16,
    );

    if !report.history.is_empty() {
        println!("\n  Cost trajectory ({} evaluations):", report.history.len());
        for (i, value) in report.history.iter().enumerate() {
            println!("    {i:>5}  {value:.6}");
        }
    }

    if let Some(out) = output {
        let json = serde_json::to_string_pretty(&ReportFile::new(&label, &config, &report))
            .context("Failed to serialize report")?;
        std::fs::write(out, json).with_context(|| format!("Failed to write report to {out}"))?;
        println!("  Report written to {}", style(out).green());
    }

    if save {
        report
            .summary()
            .append_to(path)
            .with_context(|| format!("Failed to append summary to {path}"))?;
        println!("  Summary appended to {}", style(path).green());
    }

    Ok(())
}
