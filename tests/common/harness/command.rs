//! Builder for `notetree` invocations.

// each test binary uses a different subset of this
#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::assert::Assert;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Environment variables that would point a run at the developer's own
/// notes or change its log output.
const SCRUBBED_ENV: [&str; 2] = ["RUST_LOG", "NOTETREE_CONFIG_DIR"];

/// Argument list for one `notetree` run. Nothing executes until
/// [`assert`](Self::assert).
pub struct NotetreeCommand {
    args: Vec<String>,
}

impl NotetreeCommand {
    /// A run with no global options, for commands that never touch notes.
    pub fn new() -> Self {
        Self { args: Vec::new() }
    }

    /// A run pinned to `notes_dir` and `config_dir`.
    pub fn scoped(notes_dir: &Path, config_dir: &Path) -> Self {
        let (notes, config) = (notes_dir.to_string_lossy(), config_dir.to_string_lossy());
        Self::new().args(["--dir", &*notes, "--config-dir", &*config])
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    #[allow(deprecated)]
    pub fn assert(self) -> Assert {
        let mut cmd = Command::cargo_bin("notetree").expect("notetree binary should be built");
        for var in SCRUBBED_ENV {
            cmd.env_remove(var);
        }
        cmd.args(&self.args).assert()
    }

    /// Stdout of a run that must succeed.
    pub fn output_success(self) -> String {
        let stdout = self.assert().success().get_output().stdout.clone();
        String::from_utf8(stdout).expect("stdout should be UTF-8")
    }

    /// Stdout of a successful `--format json` run, parsed.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        serde_json::from_str(&self.output_success()).expect("stdout should be JSON")
    }

    // ===========================================
    // Subcommands
    // ===========================================

    pub fn ls(self) -> Self {
        self.args(["ls"])
    }

    pub fn new_note(self, name: &str) -> Self {
        self.args(["new", name])
    }

    pub fn show(self, note: &str) -> Self {
        self.on_note("show", note)
    }

    pub fn update(self, note: &str) -> Self {
        self.on_note("update", note)
    }

    pub fn parents(self, note: &str) -> Self {
        self.on_note("parents", note)
    }

    /// Subcommands that take one note reference (id, id prefix, or name).
    fn on_note(self, subcommand: &str, note: &str) -> Self {
        self.args([subcommand, note])
    }

    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }

    pub fn format_paths(self) -> Self {
        self.args(["--format", "paths"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_help_runs_without_a_notes_dir() {
        let stdout = NotetreeCommand::new().args(["--help"]).output_success();
        assert!(stdout.contains("notetree"));
    }

    #[test]
    fn test_scoped_run_uses_given_dirs() {
        let temp = TempDir::new().unwrap();
        let notes = temp.path().join("notes");
        std::fs::create_dir_all(&notes).unwrap();

        NotetreeCommand::scoped(&notes, &temp.path().join("config"))
            .new_note("Inbox")
            .assert()
            .success();

        assert_eq!(std::fs::read_dir(&notes).unwrap().count(), 1);
    }

    #[test]
    fn test_scoped_json_listing_parses() {
        let temp = TempDir::new().unwrap();
        let notes = temp.path().join("notes");
        std::fs::create_dir_all(&notes).unwrap();

        let listing: serde_json::Value = NotetreeCommand::scoped(&notes, temp.path())
            .ls()
            .format_json()
            .output_json();
        assert_eq!(listing["data"].as_array().map(Vec::len), Some(0));
    }
}
