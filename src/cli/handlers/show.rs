//! Show command handler.

use anyhow::Result;

use super::{AppContext, find_note};
use crate::cli::ShowArgs;
use crate::cli::output::{Output, OutputFormat};
use crate::infra::fs::note_path;

pub fn handle_show(args: &ShowArgs, ctx: &AppContext) -> Result<()> {
    let note = find_note(&ctx.store, &args.note)?;

    match args.format {
        OutputFormat::Human => {
            println!("# {}", note.name());
            println!();

            let updated = note
                .date_updated()
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string());
            println!(
                "ID: {}  Created: {}  Updated: {}",
                note.id(),
                note.date_created().format("%Y-%m-%d %H:%M"),
                updated
            );

            if let Some(parent_id) = note.parent() {
                match ctx.store.get(parent_id) {
                    Ok(parent) => println!("Parent: {} [{}]", parent.name(), parent_id.prefix()),
                    Err(_) => println!("Parent: {} (missing)", parent_id),
                }
            }
            if let Some(sort) = note.sort() {
                println!("Sort: {}", sort);
            }
            println!();

            if !note.content().is_empty() {
                println!("{}", note.content());
            }
        }
        OutputFormat::Json => {
            let output = Output::new(note.without_children());
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Paths => {
            println!("{}", note_path(ctx.store.root(), note.id()).display());
        }
    }

    Ok(())
}
