//! Application state schema history.
//!
//! Application state is view state (sidebar layout, expanded and selected
//! notes). It can always be rebuilt from defaults, unlike notes.
//!
//! | version | shape |
//! |---------|-------|
//! | 1 | `{ sidebarWidth?, expandedNotes? }` (no `version` key) |
//! | 2 | `{ version, sidebar: { width, hidden }, expanded }` |
//! | 3 | `{ version, sidebar: { width, hidden, sort }, expanded, selected? }` |

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::{Migrate, SchemaRegistry, migrate_as, validate_as};
use crate::domain::{NoteId, NoteSort};

pub const APP_STATE_SCHEMA_VERSION: u32 = 3;

pub const DEFAULT_SIDEBAR_WIDTH: u32 = 300;

static REGISTRY: LazyLock<SchemaRegistry> = LazyLock::new(|| {
    SchemaRegistry::new("app-state")
        .initial(1, validate_as::<AppStateV1>)
        .version(2, validate_as::<AppStateV2>, migrate_as::<AppStateV2>)
        .version(3, validate_as::<AppState>, migrate_as::<AppState>)
});

pub fn registry() -> &'static SchemaRegistry {
    &REGISTRY
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStateV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_width: Option<u32>,
    #[serde(default)]
    pub expanded_notes: Vec<NoteId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarV2 {
    #[serde(default = "default_sidebar_width")]
    pub width: u32,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppStateV2 {
    pub version: u32,
    pub sidebar: SidebarV2,
    #[serde(default)]
    pub expanded: Vec<NoteId>,
}

impl Migrate for AppStateV2 {
    type Previous = AppStateV1;

    fn migrate(previous: AppStateV1) -> Self {
        AppStateV2 {
            version: 2,
            sidebar: SidebarV2 {
                width: previous.sidebar_width.unwrap_or(DEFAULT_SIDEBAR_WIDTH),
                hidden: false,
            },
            expanded: previous.expanded_notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sidebar {
    #[serde(default = "default_sidebar_width")]
    pub width: u32,
    #[serde(default)]
    pub hidden: bool,
    /// Ordering for the roots and for notes without their own override
    #[serde(default)]
    pub sort: NoteSort,
}

impl Default for Sidebar {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIDEBAR_WIDTH,
            hidden: false,
            sort: NoteSort::default(),
        }
    }
}

/// Persisted view state of the hosting application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub version: u32,
    #[serde(default)]
    pub sidebar: Sidebar,
    #[serde(default)]
    pub expanded: Vec<NoteId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<NoteId>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: APP_STATE_SCHEMA_VERSION,
            sidebar: Sidebar::default(),
            expanded: Vec::new(),
            selected: None,
        }
    }
}

impl Migrate for AppState {
    type Previous = AppStateV2;

    fn migrate(previous: AppStateV2) -> Self {
        AppState {
            version: 3,
            sidebar: Sidebar {
                width: previous.sidebar.width,
                hidden: previous.sidebar.hidden,
                sort: NoteSort::Alphanumeric,
            },
            expanded: previous.expanded,
            selected: None,
        }
    }
}

fn default_sidebar_width() -> u32 {
    DEFAULT_SIDEBAR_WIDTH
}
