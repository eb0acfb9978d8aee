//! Output format types for CLI commands.

use clap::ValueEnum;
use serde::Serialize;

use crate::domain::Note;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
    /// Note directories, one per line
    Paths,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// An imported attachment and the URI a note body can use for it.
#[derive(Debug, Serialize)]
pub struct AttachmentListing {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub path: String,
    pub uri: String,
}

/// Pre-order walk of a tree with each note's depth, children in stored
/// order.
pub fn tree_rows(tree: &[Note]) -> Vec<(usize, &Note)> {
    let mut rows = Vec::new();
    let mut stack: Vec<(usize, &Note)> = tree.iter().rev().map(|n| (0, n)).collect();
    while let Some((depth, note)) = stack.pop() {
        rows.push((depth, note));
        stack.extend(note.children().iter().rev().map(|c| (depth + 1, c)));
    }
    rows
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
