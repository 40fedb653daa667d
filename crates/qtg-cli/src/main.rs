//! QTG-QAOA command-line interface.
//!
//! ```text
//! qtg solve instance.txt --reps 2 --seed 7 --save
//! qtg inspect instance.txt
//! qtg prepare 000 100 010 --isometry
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::solve::SolveOverrides;
use commands::{inspect, prepare, solve, version};

/// Quadratic knapsack solving with the Quantum Tree Generator and QAOA
#[derive(Parser)]
#[command(name = "qtg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a quadratic knapsack instance
    Solve {
        /// Instance file
        instance: String,

        /// YAML solver configuration; flags override its values
        #[arg(short, long)]
        config: Option<String>,

        /// QAOA repetitions
        #[arg(short, long)]
        reps: Option<usize>,

        /// Shots for the final measurement
        #[arg(short, long)]
        shots: Option<u32>,

        /// Estimate each cost evaluation from this many shots
        #[arg(long)]
        estimator_shots: Option<u32>,

        /// Bias per item (0 disables the biased tree)
        #[arg(long)]
        bias: Option<f64>,

        /// Instance kind (standard, densest)
        #[arg(short, long)]
        kind: Option<String>,

        /// Optimiser iteration cap
        #[arg(long)]
        maxiter: Option<usize>,

        /// Optimiser tolerance
        #[arg(long)]
        tol: Option<f64>,

        /// Simulator seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print the cost trajectory
        #[arg(long)]
        history: bool,

        /// Append the solution summary to the instance file
        #[arg(long)]
        save: bool,

        /// Write the report as JSON to this file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show the register layout and gate statistics of an instance's tree
    Inspect {
        /// Instance file
        instance: String,
    },

    /// Build a state-preparation circuit for a set of bitstrings
    Prepare {
        /// Bitstrings, character i = qubit i
        #[arg(required = true)]
        bitstrings: Vec<String>,

        /// Use the uniformly-controlled rotation decomposition
        #[arg(long)]
        isometry: bool,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Solve {
            instance,
            config,
            reps,
            shots,
            estimator_shots,
            bias,
            kind,
            maxiter,
            tol,
            seed,
            history,
            save,
            output,
        } => {
            let overrides = SolveOverrides {
                reps,
                shots,
                estimator_shots,
                bias,
                kind,
                maxiter,
                tol,
                seed,
                history,
            };
            solve::execute(&instance, config.as_deref(), &overrides, save, output.as_deref())
        }

        Commands::Inspect { instance } => inspect::execute(&instance),

        Commands::Prepare {
            bitstrings,
            isometry,
        } => prepare::execute(&bitstrings, isometry),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
