//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod logging;
pub mod output;
pub mod state;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::domain::NoteSort;
use output::OutputFormat;

/// notetree - hierarchical notes stored as plain directories
#[derive(Parser, Debug)]
#[command(name = "notetree", version, about, long_about = None)]
pub struct Cli {
    /// Notes directory (overrides config file)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Directory holding config.json and state.json
    #[arg(long, global = true, env = "NOTETREE_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the note tree
    #[command(name = "ls")]
    List(ListArgs),

    /// Create a new note
    New(NewArgs),

    /// Show a note's metadata and contents
    Show(ShowArgs),

    /// Change a note's name, parent, sort order, or contents
    Update(UpdateArgs),

    /// Move a note and all of its descendants to the system trash
    Trash(TrashArgs),

    /// Copy files into a note's attachment directory
    Attach(AttachArgs),

    /// List a note's ancestors, nearest first
    Parents(ParentsArgs),

    /// Mark a note as selected and expand its ancestors
    Select(SelectArgs),

    /// Print the file an attachment URI points to
    Resolve(ResolveArgs),

    /// Print the attachment URI for a note's file
    Uri(UriArgs),

    /// Open a note's attachment directory or one of its attachments
    Open(OpenArgs),

    /// Show or change configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `ls` command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Ordering for roots and notes without their own (defaults to the saved sidebar order)
    #[arg(short, long)]
    pub sort: Option<NoteSort>,
}

/// Arguments for the `new` command
#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Note name (1-64 characters)
    pub name: String,

    /// Parent note (ID, ID prefix, or exact name)
    #[arg(short, long)]
    pub parent: Option<String>,

    /// Ordering for this note's children
    #[arg(short, long)]
    pub sort: Option<NoteSort>,

    /// Read the body from a file instead of using a heading
    #[arg(long)]
    pub content_file: Option<PathBuf>,
}

/// Arguments for the `show` command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Note to show (ID, ID prefix, or exact name)
    pub note: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `update` command
#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Note to update (ID, ID prefix, or exact name)
    pub note: String,

    /// New name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Move under this note
    #[arg(short, long, conflicts_with = "root")]
    pub parent: Option<String>,

    /// Move to the top level
    #[arg(long)]
    pub root: bool,

    /// Ordering for this note's children
    #[arg(short, long, conflicts_with = "clear_sort")]
    pub sort: Option<NoteSort>,

    /// Remove this note's sort override
    #[arg(long)]
    pub clear_sort: bool,

    /// Replace the body with the contents of a file
    #[arg(long)]
    pub content_file: Option<PathBuf>,
}

/// Arguments for the `trash` command
#[derive(Parser, Debug)]
pub struct TrashArgs {
    /// Note to trash (ID, ID prefix, or exact name)
    pub note: String,
}

/// Arguments for the `attach` command
#[derive(Parser, Debug)]
pub struct AttachArgs {
    /// Note to attach to (ID, ID prefix, or exact name)
    pub note: String,

    /// Files to copy
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Arguments for the `parents` command
#[derive(Parser, Debug)]
pub struct ParentsArgs {
    /// Note (ID, ID prefix, or exact name)
    pub note: String,
}

/// Arguments for the `select` command
#[derive(Parser, Debug)]
pub struct SelectArgs {
    /// Note to select (ID, ID prefix, or exact name)
    pub note: String,
}

/// Arguments for the `resolve` command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// URI of the form attachment://<path>?noteId=<id>
    pub uri: String,
}

/// Arguments for the `uri` command
#[derive(Parser, Debug)]
pub struct UriArgs {
    /// Note owning the attachment (ID, ID prefix, or exact name)
    pub note: String,

    /// File name inside the note's attachment directory
    pub file: String,
}

/// Arguments for the `open` command
#[derive(Parser, Debug)]
pub struct OpenArgs {
    /// Note (ID, ID prefix, or exact name)
    pub note: String,

    /// Attachment to open; the attachment directory when omitted
    pub file: Option<String>,
}

/// Arguments for the `config` command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Set the default notes directory
    #[arg(long)]
    pub note_directory: Option<PathBuf>,

    /// Set the command used by `open`
    #[arg(long)]
    pub opener: Option<String>,

    /// Set the default log filter
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
