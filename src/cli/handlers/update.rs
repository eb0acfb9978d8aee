//! Update command handler.

use anyhow::{Context, Result, bail};

use super::{AppContext, find_note, read_content_file};
use crate::cli::UpdateArgs;
use crate::domain::{NoteId, NotePatch};

/// Turns command line flags into a patch (no I/O).
///
/// `parent` is the resolved `--parent` note. Flags that were not given
/// stay absent from the patch, so the stored values are kept.
pub fn build_patch(
    args: &UpdateArgs,
    parent: Option<NoteId>,
    content: Option<String>,
) -> NotePatch {
    let mut patch = NotePatch::new();
    if let Some(name) = &args.name {
        patch = patch.name(name.clone());
    }
    if args.root {
        patch = patch.parent(None);
    } else if parent.is_some() {
        patch = patch.parent(parent);
    }
    if args.clear_sort {
        patch = patch.sort(None);
    } else if args.sort.is_some() {
        patch = patch.sort(args.sort);
    }
    if let Some(content) = content {
        patch = patch.content(content);
    }
    patch
}

pub fn handle_update(args: &UpdateArgs, ctx: &AppContext) -> Result<()> {
    let note = find_note(&ctx.store, &args.note)?;

    let parent = match &args.parent {
        Some(identifier) => Some(*find_note(&ctx.store, identifier)?.id()),
        None => None,
    };
    if parent.as_ref() == Some(note.id()) {
        bail!("a note cannot be its own parent");
    }
    let content = args
        .content_file
        .as_deref()
        .map(read_content_file)
        .transpose()?;

    let patch = build_patch(args, parent, content);
    let updated = ctx
        .store
        .update(note.id(), patch)
        .with_context(|| format!("failed to update {note}"))?;

    println!("Updated: {} [{}]", updated.name(), updated.id().prefix());
    Ok(())
}
