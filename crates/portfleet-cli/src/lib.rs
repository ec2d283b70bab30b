//! PortFleet CLI library.
//!
//! Terminal styling, log setup and output formatting shared by the
//! `portfleet-cli` binary.

pub mod logging;
pub mod output;
pub mod terminal;
