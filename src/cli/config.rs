//! Configuration file support.
//!
//! The file is versioned JSON at `<config-dir>/config.json` and goes
//! through the same migration chain as note metadata.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::infra::fs::{read_versioned, write_json_atomic};
use crate::schema::config::{self as config_schema, CONFIG_SCHEMA_VERSION};

pub use crate::schema::config::Config;

pub const CONFIG_FILE: &str = "config.json";

const APP_DIR: &str = "notetree";

impl Config {
    /// Loads `<config_dir>/config.json`.
    ///
    /// Returns the default config if the file doesn't exist. A file that
    /// exists but cannot be read or migrated is an error: it is user-edited
    /// and never regenerated.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = Self::config_path(config_dir);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        read_versioned(&config_path, config_schema::registry())
            .with_context(|| format!("failed to load config file: {}", config_path.display()))
    }

    /// Writes the config in the latest schema version.
    pub fn save(&self, config_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(config_dir).with_context(|| {
            format!("failed to create config directory: {}", config_dir.display())
        })?;
        let config = Config {
            version: CONFIG_SCHEMA_VERSION,
            ..self.clone()
        };
        let config_path = Self::config_path(config_dir);
        write_json_atomic(&config_path, &config)
            .with_context(|| format!("failed to write config file: {}", config_path.display()))
    }

    pub fn config_path(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE)
    }

    /// Default: `~/.config/notetree` (platform equivalent elsewhere)
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Resolve the notes directory, with CLI argument taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--dir` argument
    /// 2. Config file `noteDirectory` setting
    /// 3. `<data dir>/notetree/notes`
    /// 4. `./notes`
    pub fn notes_dir(&self, cli_dir: Option<&PathBuf>) -> PathBuf {
        cli_dir
            .cloned()
            .or_else(|| self.note_directory.clone())
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR).join("notes")))
            .unwrap_or_else(|| PathBuf::from("notes"))
    }

    /// Resolve the command used to open files and directories.
    ///
    /// Precedence order:
    /// 1. Config file `opener` setting
    /// 2. The platform's default opener
    pub fn opener(&self) -> String {
        self.opener
            .clone()
            .unwrap_or_else(|| platform_opener().to_string())
    }
}

fn platform_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}
