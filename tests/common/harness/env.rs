//! Isolated test environment with temp directory.

#![allow(dead_code)]

use super::{NotetreeCommand, RecordingTrash, TestNote};
use notetree::domain::NoteId;
use notetree::infra::fs::{metadata_path, note_path, read_json, save_note_to_fs};
use notetree::store::NoteStore;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a notes directory and a config directory.
///
/// Both live under one temp directory that is cleaned up on drop. The
/// config directory is passed explicitly to every command so tests never
/// read or write the user's real configuration.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    root: PathBuf,
    notes_dir: PathBuf,
    config_dir: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    ///
    /// The notes directory exists but is empty; the config directory is
    /// only created once something writes to it.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().to_path_buf();
        let notes_dir = root.join("notes");
        let config_dir = root.join("config");
        std::fs::create_dir_all(&notes_dir).expect("Failed to create notes directory");
        Self {
            _temp_dir: temp_dir,
            root,
            notes_dir,
            config_dir,
        }
    }

    /// Returns the path to the notes directory.
    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    /// Returns the path to the config directory.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Returns the directory a note lives in.
    pub fn note_dir(&self, id: &NoteId) -> PathBuf {
        note_path(&self.notes_dir, id)
    }

    /// Adds a test note to the environment and returns its directory.
    pub fn add_note(&self, test_note: &TestNote) -> PathBuf {
        let note = test_note.to_note();
        save_note_to_fs(&self.notes_dir, &note).expect("Failed to write test note");
        note_path(&self.notes_dir, note.id())
    }

    /// Opens a store over the notes directory with a recording trash.
    pub fn store(&self) -> NoteStore<RecordingTrash> {
        NoteStore::with_trash(&self.notes_dir, RecordingTrash::new())
    }

    /// Creates a NotetreeCommand configured for this test environment.
    pub fn cmd(&self) -> NotetreeCommand {
        NotetreeCommand::scoped(&self.notes_dir, &self.config_dir)
    }

    /// Writes a file under the environment root and returns its path.
    ///
    /// Parent directories are created as needed.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Writes a file into the config directory.
    pub fn write_config_file(&self, name: &str, content: &str) -> PathBuf {
        std::fs::create_dir_all(&self.config_dir).expect("Failed to create config directory");
        let path = self.config_dir.join(name);
        std::fs::write(&path, content).expect("Failed to write config file");
        path
    }

    /// Reads a file from the config directory as JSON.
    pub fn read_config_json(&self, name: &str) -> serde_json::Value {
        read_json(&self.config_dir.join(name)).expect("Failed to read config file")
    }

    /// Reads a note's metadata file as raw JSON.
    pub fn metadata_json(&self, id: &NoteId) -> serde_json::Value {
        read_json(&metadata_path(&self.notes_dir, id)).expect("Failed to read metadata")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===========================================
    // TestEnv
    // ===========================================

    #[test]
    fn test_env_creates_notes_dir() {
        let env = TestEnv::new();
        assert!(env.notes_dir().is_dir());
        assert!(!env.config_dir().exists());
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.notes_dir().to_path_buf()
        };
        assert!(!path.exists(), "Temp directory should be removed on drop");
    }

    #[test]
    fn test_env_add_note_writes_directory() {
        let env = TestEnv::new();
        let note = TestNote::new("Harness Note").content("body");
        let dir = env.add_note(&note);

        assert!(dir.join("metadata.json").is_file());
        assert_eq!(std::fs::read_to_string(dir.join("index.md")).unwrap(), "body");
        assert_eq!(env.metadata_json(note.note_id())["name"], "Harness Note");
    }

    #[test]
    fn test_env_store_sees_added_notes() {
        let env = TestEnv::new();
        env.add_note(&TestNote::new("One"));
        env.add_note(&TestNote::new("Two"));

        assert_eq!(env.store().get_all().unwrap().len(), 2);
    }

    #[test]
    fn test_env_write_file_creates_parents() {
        let env = TestEnv::new();
        let path = env.write_file("inbox/photo.png", "png");
        assert!(path.is_file());
    }
}
