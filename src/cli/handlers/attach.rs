//! Attach command handler.

use anyhow::{Context, Result};

use super::{AppContext, find_note};
use crate::cli::AttachArgs;
use crate::cli::output::AttachmentListing;
use crate::infra::protocol::attachment_uri;

pub fn handle_attach(args: &AttachArgs, ctx: &AppContext) -> Result<()> {
    let note = find_note(&ctx.store, &args.note)?;
    let attachments = ctx
        .store
        .import_attachments(note.id(), &args.files)
        .with_context(|| format!("failed to attach files to {note}"))?;

    if attachments.is_empty() {
        println!("No files attached.");
        return Ok(());
    }

    for attachment in attachments {
        let listing = AttachmentListing {
            kind: attachment.kind.as_str(),
            uri: attachment_uri(note.id(), &attachment.path),
            path: attachment.path,
        };
        println!("Attached: {} ({})", listing.path, listing.kind);
        println!("  {}", listing.uri);
    }
    Ok(())
}
