use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use tracing::info;

use portfleet_cli::output::{self, OutputFormat};
use portfleet_cli::terminal::ColorPalette;
use portfleet_lib::output::SimulationSummary;
use portfleet_lib::{
    run_simulation, FleetSnapshot, SimulationComparison, SimulationConfig, SimulationKind,
};

use super::load_dataset;

/// Which strategies `simulate` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyChoice {
    #[value(alias = "fuel-saver")]
    A,
    #[value(alias = "throughput")]
    B,
    Both,
}

impl StrategyChoice {
    fn kinds(self) -> &'static [SimulationKind] {
        match self {
            StrategyChoice::A => &[SimulationKind::FuelSaver],
            StrategyChoice::B => &[SimulationKind::Throughput],
            StrategyChoice::Both => &[SimulationKind::FuelSaver, SimulationKind::Throughput],
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulateArgs {
    pub strategy: StrategyChoice,
    pub max_steps: Option<usize>,
    pub refuel_allowance: Option<f64>,
    pub heavy_threshold: Option<f64>,
    pub hull_consumption: bool,
    pub config: Option<PathBuf>,
}

/// JSON document printed by `simulate --format json`.
#[derive(Debug, Serialize)]
struct SimulateOutput {
    runs: Vec<SimulationSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<SimulationComparison>,
}

pub fn handle_simulate(data_dir: &Path, format: OutputFormat, args: &SimulateArgs) -> Result<()> {
    let config = build_config(args)?;
    let mut fleet = load_dataset(data_dir)?;
    let initial = FleetSnapshot::capture(&fleet);

    let mut reports = Vec::new();
    let mut runs = Vec::new();
    for (index, &kind) in args.strategy.kinds().iter().enumerate() {
        if index > 0 {
            initial
                .restore(&mut fleet)
                .context("failed to reset fleet between runs")?;
        }
        let report = run_simulation(&mut fleet, kind, &config)
            .with_context(|| format!("simulation {} ({kind}) failed", kind.letter()))?;
        runs.push(SimulationSummary::from_report(&report, &fleet)?);
        reports.push(report);
    }

    let comparison = match reports.as_slice() {
        [first, second] => Some(SimulationComparison::between(first, second)),
        _ => None,
    };
    if let Some(comparison) = &comparison {
        info!(
            more_fuel_efficient = ?comparison.more_fuel_efficient,
            fuel_burned_delta = comparison.fuel_burned_delta,
            "compared strategies"
        );
    }

    let mut out = output::stdout();
    if format == OutputFormat::Json {
        return output::write_json(&mut out, &SimulateOutput { runs, comparison });
    }

    let palette = ColorPalette::detect();
    for summary in &runs {
        output::write_summary(&mut out, summary, format, palette)?;
    }
    if let Some(comparison) = &comparison {
        output::write_comparison(&mut out, comparison, palette)?;
    }
    Ok(())
}

/// Start from the config file, if any, then apply flag overrides.
fn build_config(args: &SimulateArgs) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str::<SimulationConfig>(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    if let Some(max_steps) = args.max_steps {
        config.max_steps = max_steps;
    }
    if let Some(allowance) = args.refuel_allowance {
        config.refuel_allowance = Some(allowance);
    }
    if let Some(threshold) = args.heavy_threshold {
        config.load.heavy_threshold_kg = threshold;
    }
    if args.hull_consumption {
        config.fuel.include_hull_consumption = true;
    }

    config.validate().context("invalid simulation configuration")?;
    Ok(config)
}
