//! Test fixture utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use std::path::{Path, PathBuf};

/// Returns the path to the fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Returns the path to a fixture of one persisted kind (`note`, `config`,
/// `app_state`) by file name.
pub fn fixture(kind: &str, name: &str) -> PathBuf {
    fixtures_dir().join(kind).join(name)
}

/// Reads a fixture file and parses it as JSON.
///
/// # Panics
///
/// Panics if the file cannot be read or is not JSON.
pub fn read_fixture_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("Fixture {} is not JSON: {}", path.display(), e))
}
