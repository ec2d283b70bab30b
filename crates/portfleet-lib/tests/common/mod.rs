//! Common test utilities and fixture helpers.

use std::fs;
use std::path::PathBuf;

use portfleet_lib::{load_fleet, Fleet};
use tempfile::TempDir;

/// Path to the fixture dataset used by integration tests.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Load the checked-in fixture fleet.
pub fn fixture_fleet() -> Fleet {
    load_fleet(&fixtures_dir()).expect("fixture dataset loads")
}

/// Temporary dataset directory seeded with a copy of the fixtures.
#[allow(dead_code)]
pub struct TestDataset {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TestDataset {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        for file in ["ports.csv", "ships.csv", "containers.csv"] {
            fs::copy(fixtures_dir().join(file), dir.path().join(file)).expect("copy fixture");
        }
        Self { dir }
    }

    /// Replace one dataset file with the given contents.
    pub fn write(&self, file: &str, contents: &str) {
        fs::write(self.dir.path().join(file), contents).expect("write dataset file");
    }
}
