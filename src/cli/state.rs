//! Application state file: sidebar layout, expanded and selected notes.
//!
//! Unlike notes and config, this file only holds view state. When it is
//! unreadable it is replaced with defaults instead of failing the command.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::infra::FsError;
use crate::infra::fs::{read_versioned, write_json_atomic};
use crate::schema::MigrationError;
use crate::schema::app_state::{self, APP_STATE_SCHEMA_VERSION, AppState};

pub const STATE_FILE: &str = "state.json";

/// Loaded application state plus where it came from.
#[derive(Debug)]
pub struct StateFile {
    path: PathBuf,
    pub state: AppState,
    /// Set when the file on disk was written by a newer build
    read_only: bool,
}

impl StateFile {
    /// Loads `<config_dir>/state.json`.
    ///
    /// - Missing file: defaults, nothing written.
    /// - Unparsable or schema-invalid file: defaults, written back at once.
    /// - File from a newer build: defaults in memory, the file is left
    ///   alone and [`save`](Self::save) refuses to overwrite it.
    ///
    /// # Errors
    ///
    /// Only I/O failures (permissions and the like) are errors.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let path = config_dir.join(STATE_FILE);
        let mut file = StateFile {
            path,
            state: AppState::default(),
            read_only: false,
        };

        if !file.path.exists() {
            debug!(path = %file.path.display(), "no state file, using defaults");
            return Ok(file);
        }

        match read_versioned::<AppState>(&file.path, app_state::registry()) {
            Ok(state) => file.state = state,
            Err(FsError::Migration {
                source: MigrationError::ForwardIncompatible { found, latest, .. },
                ..
            }) => {
                warn!(
                    path = %file.path.display(),
                    found,
                    latest,
                    "state file was written by a newer version, ignoring it"
                );
                file.read_only = true;
            }
            Err(
                err @ (FsError::InvalidJson { .. }
                | FsError::InvalidEncoding { .. }
                | FsError::Migration { .. }),
            ) => {
                warn!(
                    path = %file.path.display(),
                    error = %err,
                    "state file is corrupt, regenerating with defaults"
                );
                file.save()?;
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read state file: {}", file.path.display())
                });
            }
        }
        Ok(file)
    }

    /// Writes the state in the latest schema version.
    pub fn save(&self) -> Result<()> {
        if self.read_only {
            bail!(
                "refusing to overwrite {}: it was written by a newer version",
                self.path.display()
            );
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory: {}", parent.display())
            })?;
        }
        let state = AppState {
            version: APP_STATE_SCHEMA_VERSION,
            ..self.state.clone()
        };
        write_json_atomic(&self.path, &state)
            .with_context(|| format!("failed to write state file: {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}
