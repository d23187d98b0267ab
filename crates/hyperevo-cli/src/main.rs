//! Hyperevo CLI - run and inspect evolving node populations.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use hyperevo::prelude::UpdateOrder;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hyperevo")]
#[command(author, version, about = "Hyperevo - evolving node populations with drifting hyperedges", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default hyperevo.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Run the evolution loop
    Run {
        /// Config file (default: hyperevo.toml in this or a parent directory)
        #[arg(short, long)]
        config: Option<String>,

        /// Number of generations (overrides the config)
        #[arg(short, long)]
        generations: Option<u64>,

        /// RNG seed (overrides the config)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Log file path (overrides the config)
        #[arg(short, long)]
        log: Option<String>,

        /// Update order (overrides the config)
        #[arg(long, value_enum)]
        order: Option<OrderArg>,

        /// Write a JSON snapshot of the final state here
        #[arg(long)]
        snapshot: Option<String>,
    },

    /// Summarize a run log
    Inspect {
        /// Log file written by `hyperevo run`
        log: String,

        /// Print every Nth generation
        #[arg(short, long, default_value = "10")]
        every: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Interleaved,
    Phased,
}

impl From<OrderArg> for UpdateOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Interleaved => UpdateOrder::Interleaved,
            OrderArg::Phased => UpdateOrder::Phased,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Run {
            config,
            generations,
            seed,
            log,
            order,
            snapshot,
        } => commands::run::run(
            commands::run::RunOverrides {
                config,
                generations,
                seed,
                log,
                order: order.map(UpdateOrder::from),
                snapshot,
            },
            cli.verbose,
        ),
        Commands::Inspect { log, every } => commands::inspect::run(&log, every),
    }
}
