//! Trash command handler.

use anyhow::{Context, Result};
use tracing::warn;

use super::find_note;
use crate::cli::TrashArgs;
use crate::cli::state::StateFile;
use crate::domain::NoteId;
use crate::infra::Trash;
use crate::store::{NoteStore, StoreError};

pub fn handle_trash<T: Trash>(args: &TrashArgs, store: &NoteStore<T>, state: &mut StateFile) -> Result<()> {
    let note = find_note(store, &args.note)?;
    let trashed = match store.move_to_trash(note.id()) {
        Ok(ids) => ids,
        Err(err) => {
            // whatever did reach the trash is gone, partial failure or not
            if let StoreError::Trash { trashed, .. } = &err {
                forget_and_save(state, trashed);
            }
            return Err(err).with_context(|| format!("failed to trash {note}"));
        }
    };
    forget_and_save(state, &trashed);

    println!("Trashed: {} [{}]", note.name(), note.id().prefix());
    if trashed.len() > 1 {
        println!("  {} descendant(s) trashed with it", trashed.len() - 1);
    }
    Ok(())
}

fn forget_and_save(state: &mut StateFile, ids: &[NoteId]) {
    if forget_notes(state, ids) {
        if let Err(err) = state.save() {
            warn!(error = %err, "could not update state after trashing");
        }
    }
}

/// Drops trashed notes from the expanded list and the selection.
///
/// Returns true if anything changed.
fn forget_notes(state: &mut StateFile, ids: &[NoteId]) -> bool {
    let before = state.state.expanded.len();
    state.state.expanded.retain(|id| !ids.contains(id));
    let mut changed = state.state.expanded.len() != before;

    if state.state.selected.is_some_and(|s| ids.contains(&s)) {
        state.state.selected = None;
        changed = true;
    }
    changed
}
