//! Note metadata schema history.
//!
//! | version | shape |
//! |---------|-------|
//! | 1 | `{ id, name, parent?, dateCreated, dateUpdated?, expanded? }` (no `version` key) |
//! | 2 | `{ version, id, name, parent?, sort?, dateCreated, dateUpdated? }` |

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Migrate, SchemaRegistry, migrate_as, validate_as};
use crate::domain::{NoteId, NoteSort};

/// Version every note metadata file is written as.
pub const NOTE_SCHEMA_VERSION: u32 = 2;

static REGISTRY: LazyLock<SchemaRegistry> = LazyLock::new(|| {
    SchemaRegistry::new("note")
        .initial(1, validate_as::<NoteMetadataV1>)
        .version(2, validate_as::<NoteMetadata>, migrate_as::<NoteMetadata>)
});

/// Registry for `metadata.json`.
pub fn registry() -> &'static SchemaRegistry {
    &REGISTRY
}

/// Legacy metadata written before files carried a version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteMetadataV1 {
    pub id: NoteId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NoteId>,
    pub date_created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expanded: bool,
}

/// Current metadata shape: a note minus its content and children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteMetadata {
    pub version: u32,
    pub id: NoteId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NoteId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<NoteSort>,
    pub date_created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_updated: Option<DateTime<Utc>>,
}

impl Migrate for NoteMetadata {
    type Previous = NoteMetadataV1;

    fn migrate(previous: NoteMetadataV1) -> Self {
        // `expanded` is dropped: whether a sidebar row is open is view state
        // and lives in the application state file, not in the note.
        NoteMetadata {
            version: 2,
            id: previous.id,
            name: previous.name,
            parent: previous.parent,
            sort: None,
            date_created: previous.date_created,
            date_updated: previous.date_updated,
        }
    }
}
