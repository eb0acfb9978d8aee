//! New note command handler.

use anyhow::{Context, Result};

use super::{AppContext, find_note, read_content_file};
use crate::cli::NewArgs;
use crate::domain::{CreateNote, NoteId, NoteSort, validate_name};
use crate::infra::fs::note_path;

/// Builds creation parameters from already-resolved arguments (no I/O).
///
/// # Errors
///
/// Returns an error if the name breaks the 1-64 character rule.
pub fn build_create_params(
    name: &str,
    parent: Option<NoteId>,
    sort: Option<NoteSort>,
    content: Option<String>,
) -> Result<CreateNote> {
    validate_name(name).with_context(|| format!("invalid name '{name}'"))?;

    let mut params = CreateNote::new(name);
    params.parent = parent;
    params.sort = sort;
    params.content = content;
    Ok(params)
}

pub fn handle_new(args: &NewArgs, ctx: &AppContext) -> Result<()> {
    let parent = match &args.parent {
        Some(identifier) => Some(*find_note(&ctx.store, identifier)?.id()),
        None => None,
    };
    let content = args
        .content_file
        .as_deref()
        .map(read_content_file)
        .transpose()?;

    let params = build_create_params(&args.name, parent, args.sort, content)?;
    let note = ctx
        .store
        .create(params)
        .with_context(|| format!("failed to create note '{}'", args.name))?;

    println!("Created: {} [{}]", note.name(), note.id().prefix());
    println!("  {}", note_path(ctx.store.root(), note.id()).display());
    Ok(())
}
