//! Parents and select command handlers.

use anyhow::{Context, Result};

use super::{AppContext, ResolveResult, resolve_note};
use crate::cli::state::StateFile;
use crate::cli::{ParentsArgs, SelectArgs};
use crate::domain::{Note, flatten, get_parents};

/// Loads the tree and resolves `identifier` inside it.
fn tree_and_note(ctx: &AppContext, identifier: &str) -> Result<(Vec<Note>, Note)> {
    let tree = ctx
        .store
        .get_all()
        .with_context(|| format!("failed to load notes from {}", ctx.store.root().display()))?;
    let flat: Vec<Note> = flatten(&tree)
        .into_iter()
        .map(Note::without_children)
        .collect();
    match resolve_note(&flat, identifier) {
        ResolveResult::Unique(note) => Ok((tree, note)),
        ResolveResult::Ambiguous(_) => anyhow::bail!("ambiguous note identifier"),
        ResolveResult::NotFound => anyhow::bail!("note not found: '{}'", identifier),
    }
}

pub fn handle_parents(args: &ParentsArgs, ctx: &AppContext) -> Result<()> {
    let (tree, note) = tree_and_note(ctx, &args.note)?;
    let parents = get_parents(&note, &tree)?;

    if parents.is_empty() {
        println!("{} is a top-level note", note);
        return Ok(());
    }
    for parent in parents {
        println!("{} [{}]", parent.name(), parent.id().prefix());
    }
    Ok(())
}

/// Selects a note and expands every ancestor so it is visible.
pub fn handle_select(args: &SelectArgs, ctx: &AppContext, state: &mut StateFile) -> Result<()> {
    let (tree, note) = tree_and_note(ctx, &args.note)?;
    let parents = get_parents(&note, &tree)?;

    for parent in parents {
        if !state.state.expanded.contains(parent.id()) {
            state.state.expanded.push(*parent.id());
        }
    }
    state.state.selected = Some(*note.id());
    state.save()?;

    println!("Selected: {} [{}]", note.name(), note.id().prefix());
    Ok(())
}
