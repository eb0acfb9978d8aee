//! Config command handler.

use anyhow::Result;

use crate::cli::ConfigArgs;
use crate::cli::config::Config;
use std::path::Path;

/// Prints the effective configuration, or updates and saves it when any
/// setting is given. Saving also rewrites an older file in the latest
/// schema version.
pub fn handle_config(args: &ConfigArgs, config: &Config, config_dir: &Path) -> Result<()> {
    let changed = args.note_directory.is_some() || args.opener.is_some() || args.log_level.is_some();

    if changed {
        let mut updated = config.clone();
        if let Some(dir) = &args.note_directory {
            updated.note_directory = Some(dir.clone());
        }
        if let Some(opener) = &args.opener {
            updated.opener = Some(opener.clone());
        }
        if let Some(level) = &args.log_level {
            updated.log_level = level.clone();
        }
        updated.save(config_dir)?;
        println!("Saved: {}", Config::config_path(config_dir).display());
        return Ok(());
    }

    println!("config file:    {}", Config::config_path(config_dir).display());
    println!("notes dir:      {}", config.notes_dir(None).display());
    println!("opener:         {}", config.opener());
    println!("log level:      {}", config.log_level);
    Ok(())
}
