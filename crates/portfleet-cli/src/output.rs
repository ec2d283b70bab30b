//! Output formatting for CLI commands.
//!
//! Text renderings come from the library summaries and are decorated here
//! with terminal colors; JSON output serialises the same summaries.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use portfleet_lib::output::{render_comparison, FleetStatus, RenderMode, SimulationSummary};
use portfleet_lib::SimulationComparison;

use crate::terminal::ColorPalette;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text.
    #[default]
    Text,
    /// Markdown-flavoured text.
    Rich,
    /// JSON document on stdout.
    Json,
}

impl OutputFormat {
    fn render_mode(self) -> RenderMode {
        match self {
            OutputFormat::Rich => RenderMode::RichText,
            OutputFormat::Text | OutputFormat::Json => RenderMode::PlainText,
        }
    }
}

/// Write `value` as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to serialise output")?;
    writeln!(out)?;
    Ok(())
}

/// Render a fleet status listing.
pub fn write_status<W: Write>(
    out: &mut W,
    status: &FleetStatus,
    format: OutputFormat,
    palette: ColorPalette,
) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, status);
    }
    let text = status.render(format.render_mode());
    write_highlighted(out, &text, palette)
}

/// Render one simulation run followed by a blank line.
pub fn write_summary<W: Write>(
    out: &mut W,
    summary: &SimulationSummary,
    format: OutputFormat,
    palette: ColorPalette,
) -> Result<()> {
    let text = summary.render(format.render_mode());
    write_highlighted(out, &text, palette)?;
    writeln!(out)?;
    Ok(())
}

/// Render the comparison of two runs.
pub fn write_comparison<W: Write>(
    out: &mut W,
    comparison: &SimulationComparison,
    palette: ColorPalette,
) -> Result<()> {
    write_highlighted(out, &render_comparison(comparison), palette)
}

/// Color the heading and the summary lines; everything else is printed as is.
fn write_highlighted<W: Write>(out: &mut W, text: &str, palette: ColorPalette) -> Result<()> {
    for (index, line) in text.lines().enumerate() {
        let color = if index == 0 {
            palette.white_bold
        } else if line.starts_with("Stranded:") {
            palette.red
        } else if line.starts_with("Voyages:") {
            palette.cyan
        } else if line.starts_with("Delivered:") {
            if line.ends_with("undelivered: 0 [none]") {
                palette.green
            } else {
                palette.red
            }
        } else {
            ""
        };
        if color.is_empty() {
            writeln!(out, "{line}")?;
        } else {
            writeln!(out, "{color}{line}{}", palette.reset)?;
        }
    }
    Ok(())
}

/// Locked stdout handle.
pub fn stdout() -> io::StdoutLock<'static> {
    io::stdout().lock()
}
