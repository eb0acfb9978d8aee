//! User configuration schema history.
//!
//! | version | shape |
//! |---------|-------|
//! | 1 | `{ noteDirectory?, editor? }` (no `version` key) |
//! | 2 | `{ version, noteDirectory?, opener?, logLevel }` |

use std::path::PathBuf;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::{Migrate, SchemaRegistry, migrate_as, validate_as};

pub const CONFIG_SCHEMA_VERSION: u32 = 2;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

static REGISTRY: LazyLock<SchemaRegistry> = LazyLock::new(|| {
    SchemaRegistry::new("config")
        .initial(1, validate_as::<ConfigV1>)
        .version(2, validate_as::<Config>, migrate_as::<Config>)
});

pub fn registry() -> &'static SchemaRegistry {
    &REGISTRY
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_directory: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub version: u32,

    /// Root directory holding one subdirectory per note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_directory: Option<PathBuf>,

    /// Command used to open attachments and attachment directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opener: Option<String>,

    /// Default tracing filter when neither RUST_LOG nor -v is given
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_SCHEMA_VERSION,
            note_directory: None,
            opener: None,
            log_level: default_log_level(),
        }
    }
}

impl Migrate for Config {
    type Previous = ConfigV1;

    fn migrate(previous: ConfigV1) -> Self {
        // `editor` is retired: note bodies are edited by the hosting
        // application, and opening attachments uses `opener` instead.
        Config {
            version: 2,
            note_directory: previous.note_directory,
            opener: None,
            log_level: default_log_level(),
        }
    }
}
