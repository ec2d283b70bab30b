pub mod simulate;
pub mod status;

use std::path::Path;

use anyhow::{Context, Result};
use portfleet_lib::{load_fleet, Fleet};

/// Load the dataset in `data_dir`, naming the directory on failure.
pub(crate) fn load_dataset(data_dir: &Path) -> Result<Fleet> {
    load_fleet(data_dir)
        .with_context(|| format!("failed to load dataset from {}", data_dir.display()))
}
