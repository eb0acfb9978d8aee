//! Note file codec: the two-files-per-note layout with atomic writes.
//!
//! ```text
//! <root>/<note-id>/metadata.json    versioned JSON, "note" schema
//! <root>/<note-id>/index.md         raw UTF-8 markdown
//! <root>/<note-id>/attachments/*    arbitrary files
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::domain::{Note, NoteId};
use crate::schema::note::{NOTE_SCHEMA_VERSION, NoteMetadata};
use crate::schema::{MigrationError, SchemaRegistry, load_versioned, note};

pub const METADATA_FILE: &str = "metadata.json";
pub const BODY_FILE: &str = "index.md";
pub const ATTACHMENTS_DIR: &str = "attachments";

/// Errors during file system operations on notes and versioned files.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("atomic write failed for {path}: {source}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid encoding in {path}: {encoding}")]
    InvalidEncoding { path: PathBuf, encoding: String },

    #[error("cannot load {path}: {source}")]
    Migration {
        path: PathBuf,
        #[source]
        source: MigrationError,
    },

    #[error("metadata in {path} belongs to note {found}, expected {expected}")]
    IdMismatch {
        path: PathBuf,
        expected: NoteId,
        found: NoteId,
    },

    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl FsError {
    /// Creates an appropriate FsError from an io::Error.
    pub(crate) fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path: path.into() },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path: path.into() },
            _ => FsError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// Outcome of writing a body file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyWrite {
    Created,
    Overwritten,
}

pub fn note_path(note_dir: &Path, id: &NoteId) -> PathBuf {
    note_dir.join(id.to_string())
}

pub fn metadata_path(note_dir: &Path, id: &NoteId) -> PathBuf {
    note_path(note_dir, id).join(METADATA_FILE)
}

pub fn body_path(note_dir: &Path, id: &NoteId) -> PathBuf {
    note_path(note_dir, id).join(BODY_FILE)
}

pub fn attachments_path(note_dir: &Path, id: &NoteId) -> PathBuf {
    note_path(note_dir, id).join(ATTACHMENTS_DIR)
}

/// Splits a note into its metadata record and body.
///
/// The metadata is always stamped with the latest note schema version.
pub fn split_note_into_files(note: &Note) -> (NoteMetadata, String) {
    let metadata = NoteMetadata {
        version: NOTE_SCHEMA_VERSION,
        id: *note.id(),
        name: note.name().to_string(),
        parent: note.parent().copied(),
        sort: note.sort(),
        date_created: note.date_created(),
        date_updated: note.date_updated(),
    };
    (metadata, note.content().to_string())
}

/// Loads `<note_dir>/<id>/` into a Note, migrating its metadata.
///
/// # Errors
///
/// - `FsError::NotFound` if either file is missing.
/// - `FsError::InvalidJson` if the metadata is not JSON.
/// - `FsError::Migration` if the metadata cannot be brought to the latest
///   schema (including files written by a newer build).
/// - `FsError::IdMismatch` if the metadata names a different note.
/// - `FsError::InvalidEncoding` if the body is not UTF-8.
pub fn load_note_from_fs(note_dir: &Path, id: &NoteId) -> Result<Note, FsError> {
    let meta_path = metadata_path(note_dir, id);
    let metadata: NoteMetadata = read_versioned(&meta_path, note::registry())?;

    if metadata.id != *id {
        return Err(FsError::IdMismatch {
            path: meta_path,
            expected: *id,
            found: metadata.id,
        });
    }

    let body = read_text(&body_path(note_dir, id))?;
    debug!(%id, version = metadata.version, "loaded note");

    Note::builder(metadata.id, metadata.name, metadata.date_created)
        .version(metadata.version)
        .parent(metadata.parent)
        .sort(metadata.sort)
        .content(body)
        .date_updated(metadata.date_updated)
        .build()
        .map_err(|e| FsError::Migration {
            path: meta_path,
            source: MigrationError::Validation {
                kind: note::registry().kind(),
                version: NOTE_SCHEMA_VERSION,
                source: <serde_json::Error as serde::de::Error>::custom(e),
            },
        })
}

/// Writes a note's directory, metadata, and body.
///
/// Metadata is written atomically. The body is created if absent and
/// overwritten otherwise; the returned [`BodyWrite`] says which happened.
pub fn save_note_to_fs(note_dir: &Path, note: &Note) -> Result<BodyWrite, FsError> {
    let dir = note_path(note_dir, note.id());
    fs::create_dir_all(&dir).map_err(|e| FsError::from_io(&dir, e))?;

    let (metadata, body) = split_note_into_files(note);
    write_json_atomic(&dir.join(METADATA_FILE), &metadata)?;

    let body_file = dir.join(BODY_FILE);
    let outcome = if body_file.exists() {
        overwrite_body(&body_file, &body)?
    } else {
        create_body(&body_file, &body)?
    };
    debug!(id = %note.id(), ?outcome, "saved note");
    Ok(outcome)
}

fn create_body(path: &Path, body: &str) -> Result<BodyWrite, FsError> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        // lost a race with another writer; fall back to a full overwrite
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return overwrite_body(path, body),
        Err(e) => return Err(FsError::from_io(path, e)),
    };
    file.write_all(body.as_bytes())
        .map_err(|e| FsError::from_io(path, e))?;
    Ok(BodyWrite::Created)
}

fn overwrite_body(path: &Path, body: &str) -> Result<BodyWrite, FsError> {
    write_atomic(path, body.as_bytes())?;
    Ok(BodyWrite::Overwritten)
}

/// Returns true if `path` is a complete note directory.
///
/// The entry must be a directory named like a note id that holds both the
/// metadata and the body file. Attachments-only or half-written
/// directories do not count.
pub fn is_note_directory(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    path.is_dir()
        && NoteId::is_valid(name)
        && path.join(METADATA_FILE).is_file()
        && path.join(BODY_FILE).is_file()
}

/// Lists the ids of all complete note directories directly under `note_dir`.
///
/// Other entries are skipped silently. Ids come back sorted by name so
/// scans are deterministic.
///
/// # Errors
///
/// Returns `FsError::NotFound` if the directory doesn't exist.
/// Returns `FsError::NotADirectory` if the path is not a directory.
pub fn scan_note_directories(note_dir: &Path) -> Result<Vec<NoteId>, FsError> {
    if !note_dir.exists() {
        return Err(FsError::NotFound {
            path: note_dir.to_path_buf(),
        });
    }
    if !note_dir.is_dir() {
        return Err(FsError::NotADirectory {
            path: note_dir.to_path_buf(),
        });
    }

    let mut ids = Vec::new();
    for entry in WalkDir::new(note_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(note_dir).to_path_buf();
            match e.into_io_error() {
                Some(source) => FsError::from_io(&path, source),
                None => FsError::NotFound { path },
            }
        })?;
        let path = entry.path();
        if !is_note_directory(path) {
            debug!(path = %path.display(), "skipping non-note entry");
            continue;
        }
        if let Some(id) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.parse().ok())
        {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Reads a JSON file and runs it through `registry`.
pub fn read_versioned<T: DeserializeOwned>(
    path: &Path,
    registry: &SchemaRegistry,
) -> Result<T, FsError> {
    let raw = read_json(path)?;
    load_versioned(&raw, registry).map_err(|source| FsError::Migration {
        path: path.into(),
        source,
    })
}

/// Reads and parses a JSON file without interpreting it.
pub fn read_json(path: &Path) -> Result<Value, FsError> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| FsError::InvalidJson {
        path: path.into(),
        source,
    })
}

/// Reads a UTF-8 text file, dropping a leading byte order mark.
pub fn read_text(path: &Path) -> Result<String, FsError> {
    let bytes = fs::read(path).map_err(|e| FsError::from_io(path, e))?;
    let text = String::from_utf8(bytes).map_err(|e| FsError::InvalidEncoding {
        path: path.into(),
        encoding: format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()),
    })?;
    Ok(match text.strip_prefix('\u{FEFF}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Serializes `value` as pretty JSON and writes it atomically.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), FsError> {
    let mut json = serde_json::to_string_pretty(value).map_err(|source| FsError::InvalidJson {
        path: path.into(),
        source,
    })?;
    json.push('\n');
    write_atomic(path, json.as_bytes())
}

/// Writes bytes through a temp file in the same directory and renames it
/// over `path`. The parent directory must exist.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), FsError> {
    let parent = path.parent().ok_or_else(|| FsError::NotFound { path: path.into() })?;
    if !parent.is_dir() {
        return Err(FsError::NotFound {
            path: parent.into(),
        });
    }

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| FsError::Io {
        path: path.into(),
        source: e,
    })?;
    temp.write_all(bytes).map_err(|e| FsError::Io {
        path: path.into(),
        source: e,
    })?;
    temp.persist(path).map_err(|e| FsError::AtomicWrite {
        path: path.into(),
        source: e.error,
    })?;
    Ok(())
}
