use std::path::Path;

use anyhow::{Context, Result};

use portfleet_cli::output::{self, OutputFormat};
use portfleet_cli::terminal::ColorPalette;
use portfleet_lib::output::FleetStatus;

use super::load_dataset;

pub fn handle_status(data_dir: &Path, format: OutputFormat) -> Result<()> {
    let fleet = load_dataset(data_dir)?;
    let status = FleetStatus::from_fleet(&fleet).context("failed to describe fleet")?;
    let mut out = output::stdout();
    output::write_status(&mut out, &status, format, ColorPalette::detect())
}
