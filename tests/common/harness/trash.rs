//! Trash backend that deletes instead of touching the OS trash.

#![allow(dead_code)]

use notetree::infra::{Trash, TrashError};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Records every path it is asked to trash and removes it from disk.
///
/// Paths listed in `fail_for` are refused and left in place.
#[derive(Debug, Default)]
pub struct RecordingTrash {
    calls: Mutex<Vec<PathBuf>>,
    fail_for: Vec<PathBuf>,
}

impl RecordingTrash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that refuses the given paths.
    pub fn failing(paths: Vec<PathBuf>) -> Self {
        Self {
            calls: Mutex::default(),
            fail_for: paths,
        }
    }

    /// Returns the paths trashed so far, in call order.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().expect("trash lock poisoned").clone()
    }
}

impl Trash for RecordingTrash {
    fn trash(&self, path: &Path) -> Result<(), TrashError> {
        self.calls
            .lock()
            .expect("trash lock poisoned")
            .push(path.to_path_buf());
        if self.fail_for.iter().any(|p| p == path) {
            return Err(TrashError {
                path: path.display().to_string(),
                message: "refused by test".to_string(),
            });
        }
        std::fs::remove_dir_all(path).map_err(|e| TrashError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
