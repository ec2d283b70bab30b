mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use portfleet_cli::logging::{init_tracing, LogFormat};
use portfleet_cli::output::OutputFormat;
use portfleet_lib::dataset::DATA_DIR_ENV;

use crate::commands::simulate::{SimulateArgs, StrategyChoice};

#[derive(Parser, Debug)]
#[command(author, version, about = "Container fleet dispatch simulator")]
struct Cli {
    /// Directory holding ports.csv, ships.csv and containers.csv.
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print ports, ships and cargo as loaded from the dataset.
    Status,
    /// Run one or both dispatch strategies from the same starting state.
    Simulate {
        /// Strategy to run: a (fuel saver), b (throughput) or both.
        #[arg(long, value_enum, default_value_t = StrategyChoice::Both)]
        strategy: StrategyChoice,
        /// Stop after this many steps.
        #[arg(long)]
        max_steps: Option<usize>,
        /// Fuel each ship may take on over the run; unlimited when omitted.
        #[arg(long)]
        refuel_allowance: Option<f64>,
        /// Containers heavier than this many kilograms count as heavy.
        #[arg(long)]
        heavy_threshold: Option<f64>,
        /// Charge hull consumption per kilometre on top of the cargo cost.
        #[arg(long)]
        hull_consumption: bool,
        /// JSON file with a simulation configuration; flags override it.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing(LogFormat::from_env());
    let cli = Cli::parse();
    let data_dir = portfleet_lib::resolve_data_dir(cli.data_dir.as_deref());

    match cli.command {
        Command::Status => commands::status::handle_status(&data_dir, cli.format),
        Command::Simulate {
            strategy,
            max_steps,
            refuel_allowance,
            heavy_threshold,
            hull_consumption,
            config,
        } => commands::simulate::handle_simulate(
            &data_dir,
            cli.format,
            &SimulateArgs {
                strategy,
                max_steps,
                refuel_allowance,
                heavy_threshold,
                hull_consumption,
                config,
            },
        ),
    }
}
