//! Command handlers for the CLI.

mod attach;
mod completions;
mod config;
mod list;
mod new;
mod open;
mod parents;
mod resolve;
mod show;
mod trash;
mod update;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::config::Config;
use crate::store::NoteStore;

// Re-export public items
pub use attach::handle_attach;
pub use completions::handle_completions;
pub use config::handle_config;
pub use list::handle_list;
pub use new::{build_create_params, handle_new};
pub use open::{CommandOpener, Opener, handle_open, handle_open_with};
pub use parents::{handle_parents, handle_select};
pub use resolve::{ResolveResult, find_note, handle_resolve, handle_uri, resolve_note};
pub use show::handle_show;
pub use trash::handle_trash;
pub use update::{build_patch, handle_update};

/// Everything a handler needs: the store plus config and its location.
pub struct AppContext {
    pub store: NoteStore,
    pub config: Config,
    pub config_dir: PathBuf,
}

impl AppContext {
    pub fn new(config: Config, config_dir: PathBuf, cli_dir: Option<&PathBuf>) -> Self {
        let store = NoteStore::new(config.notes_dir(cli_dir));
        Self {
            store,
            config,
            config_dir,
        }
    }
}

// ===========================================
// Shared Utilities
// ===========================================

/// Reads a body file passed on the command line.
pub(crate) fn read_content_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read content file: {}", path.display()))
}
