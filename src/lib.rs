//! notetree - hierarchical notes stored as plain directories
//!
//! Each note is a directory named by its UUID holding `metadata.json`
//! (versioned, migrated on read) and `index.md`. Parent links live in the
//! metadata; the tree is rebuilt from a full scan on every read.

pub mod cli;
pub mod domain;
pub mod infra;
pub mod schema;
pub mod store;

use anyhow::Result;
use clap::Parser;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        AppContext, handle_attach, handle_completions, handle_config, handle_list, handle_new, handle_open,
        handle_parents, handle_resolve, handle_select, handle_show, handle_trash, handle_update,
        handle_uri,
    },
    logging,
    state::StateFile,
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    if let Command::Completions(args) = &cli.command {
        return handle_completions(args);
    }

    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(Config::default_config_dir);
    let config = Config::load(&config_dir)?;
    logging::init(cli.verbose, &config.log_level);

    let ctx = AppContext::new(config, config_dir, cli.dir.as_ref());

    match &cli.command {
        Command::List(args) => handle_list(args, &ctx),
        Command::New(args) => handle_new(args, &ctx),
        Command::Show(args) => handle_show(args, &ctx),
        Command::Update(args) => handle_update(args, &ctx),
        Command::Trash(args) => {
            let mut state = StateFile::load(&ctx.config_dir)?;
            handle_trash(args, &ctx.store, &mut state)
        }
        Command::Attach(args) => handle_attach(args, &ctx),
        Command::Parents(args) => handle_parents(args, &ctx),
        Command::Select(args) => {
            let mut state = StateFile::load(&ctx.config_dir)?;
            handle_select(args, &ctx, &mut state)
        }
        Command::Resolve(args) => handle_resolve(args, &ctx.store),
        Command::Uri(args) => handle_uri(args, &ctx.store),
        Command::Open(args) => handle_open(args, &ctx),
        Command::Config(args) => handle_config(args, &ctx.config, &ctx.config_dir),
        Command::Completions(args) => handle_completions(args),
    }
}
