//! List command handler.

use anyhow::{Context, Result};

use super::AppContext;
use crate::cli::ListArgs;
use crate::cli::output::{Output, OutputFormat, tree_rows, truncate_str};
use crate::cli::state::StateFile;
use crate::domain::sort_tree;
use crate::infra::fs::note_path;

const NAME_WIDTH: usize = 50;

pub fn handle_list(args: &ListArgs, ctx: &AppContext) -> Result<()> {
    let state = StateFile::load(&ctx.config_dir)?;

    let mut tree = ctx
        .store
        .get_all()
        .with_context(|| format!("failed to load notes from {}", ctx.store.root().display()))?;
    sort_tree(&mut tree, args.sort.unwrap_or(state.state.sidebar.sort));

    match args.format {
        OutputFormat::Human => {
            let rows = tree_rows(&tree);
            if rows.is_empty() {
                println!("No notes found.");
                return Ok(());
            }

            let selected = state.state.selected;
            for (depth, note) in &rows {
                let marker = if selected.as_ref() == Some(note.id()) {
                    '*'
                } else {
                    ' '
                };
                println!(
                    "{} {:<10}  {}{}",
                    marker,
                    note.id().prefix(),
                    "  ".repeat(*depth),
                    truncate_str(note.name(), NAME_WIDTH)
                );
            }
            println!();
            println!("{} note(s)", rows.len());
        }
        OutputFormat::Json => {
            let output = Output::new(&tree);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Paths => {
            for (_, note) in tree_rows(&tree) {
                println!("{}", note_path(ctx.store.root(), note.id()).display());
            }
        }
    }

    Ok(())
}
