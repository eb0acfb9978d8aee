//! Open command handler.

use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::Command;

use super::{AppContext, find_note};
use crate::cli::OpenArgs;

/// Something that can show a file or directory to the user (allows
/// mocking in tests).
pub trait Opener {
    fn open(&self, path: &Path) -> Result<()>;
}

/// Runs a shell-style command line with the path appended.
pub struct CommandOpener(pub String);

impl Opener for CommandOpener {
    fn open(&self, path: &Path) -> Result<()> {
        let command = &self.0;

        // May include args like "open -R"
        let parts: Vec<&str> = command.split_whitespace().collect();
        let Some((cmd, args)) = parts.split_first() else {
            bail!("opener command is empty");
        };

        let status = Command::new(cmd)
            .args(args)
            .arg(path)
            .status()
            .with_context(|| format!("failed to launch opener '{}'", command))?;

        if !status.success() {
            bail!("opener '{}' exited with non-zero status", command);
        }
        Ok(())
    }
}

/// Internal implementation that accepts any opener.
pub fn handle_open_with<O: Opener>(args: &OpenArgs, ctx: &AppContext, opener: &O) -> Result<()> {
    let note = find_note(&ctx.store, &args.note)?;
    let path = match &args.file {
        Some(file) => ctx.store.attachment_path(note.id(), file)?,
        None => ctx.store.attachment_directory(note.id())?,
    };

    println!("Opening: {}", path.display());
    opener.open(&path)
}

pub fn handle_open(args: &OpenArgs, ctx: &AppContext) -> Result<()> {
    handle_open_with(args, ctx, &CommandOpener(ctx.config.opener()))
}
