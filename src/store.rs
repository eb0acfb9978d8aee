//! The note store: create, update, list, trash, and attachment operations
//! over one root note directory.
//!
//! Every call goes to disk; nothing is cached between calls. Operations on
//! different notes touch disjoint directories. Two writers racing on the
//! same note resolve as last-writer-wins.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{
    Attachment, AttachmentKind, CreateNote, Note, NoteId, NotePatch, ParseNoteError, TreeError,
    build_note_tree, descendant_ids,
};
use crate::infra::fs::{
    attachments_path, is_note_directory, load_note_from_fs, note_path, save_note_to_fs,
    scan_note_directories,
};
use crate::infra::mime::mime_for_path;
use crate::infra::protocol::{self, sanitize_relative_path};
use crate::infra::{FsError, ProtocolError, SystemTrash, Trash, TrashError};
use crate::schema::MigrationError;

/// Highest numeric suffix tried when an imported file name is taken.
pub const MAX_COLLISION_SUFFIX: u32 = 1000;

/// Errors returned by [`NoteStore`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Fs(#[from] FsError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    InvalidNote(#[from] ParseNoteError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("note already exists: {id}")]
    AlreadyExists { id: NoteId },

    #[error("note not found: {id}")]
    NotFound { id: NoteId },

    #[error("cannot move note {id} under {parent}: a note cannot be its own ancestor")]
    CycleRejected { id: NoteId, parent: NoteId },

    #[error("attachment not found: {}", .path.display())]
    AttachmentNotFound { path: PathBuf },

    #[error(
        "{} of {attempted} notes could not be trashed: {}",
        .failures.len(),
        format_failures(.failures)
    )]
    Trash {
        attempted: usize,
        /// Ids whose directories did reach the trash.
        trashed: Vec<NoteId>,
        failures: Vec<(NoteId, TrashError)>,
    },
}

fn format_failures(failures: &[(NoteId, TrashError)]) -> String {
    failures
        .iter()
        .map(|(id, err)| format!("{id}: {}", err.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Coarse error category a host can show without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    DanglingReference,
    ForwardIncompatible,
    Io,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Fs(err) => match err {
                FsError::NotFound { .. } => ErrorKind::NotFound,
                FsError::Migration {
                    source: MigrationError::ForwardIncompatible { .. },
                    ..
                } => ErrorKind::ForwardIncompatible,
                FsError::Migration { .. }
                | FsError::InvalidJson { .. }
                | FsError::InvalidEncoding { .. }
                | FsError::IdMismatch { .. } => ErrorKind::Validation,
                FsError::PermissionDenied { .. }
                | FsError::Io { .. }
                | FsError::AtomicWrite { .. }
                | FsError::NotADirectory { .. } => ErrorKind::Io,
            },
            StoreError::Tree(TreeError::DanglingReference { .. }) => ErrorKind::DanglingReference,
            StoreError::Tree(_) => ErrorKind::Validation,
            StoreError::InvalidNote(_)
            | StoreError::Protocol(_)
            | StoreError::AlreadyExists { .. }
            | StoreError::CycleRejected { .. } => ErrorKind::Validation,
            StoreError::NotFound { .. } | StoreError::AttachmentNotFound { .. } => {
                ErrorKind::NotFound
            }
            StoreError::Trash { .. } => ErrorKind::Io,
        }
    }
}

/// Note storage rooted at one directory.
///
/// # Examples
///
/// ```no_run
/// use notetree::domain::CreateNote;
/// use notetree::store::NoteStore;
///
/// let store = NoteStore::new("/tmp/notes");
/// let note = store.create(CreateNote::new("Groceries"))?;
/// assert_eq!(store.get(note.id())?.name(), "Groceries");
/// # Ok::<(), notetree::store::StoreError>(())
/// ```
#[derive(Debug)]
pub struct NoteStore<T: Trash = SystemTrash> {
    root: PathBuf,
    trash: T,
}

impl NoteStore<SystemTrash> {
    /// Creates a store that trashes into the OS recycle bin.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_trash(root, SystemTrash)
    }
}

impl<T: Trash> NoteStore<T> {
    pub fn with_trash(root: impl Into<PathBuf>, trash: T) -> Self {
        Self {
            root: root.into(),
            trash,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn trash_backend(&self) -> &T {
        &self.trash
    }

    /// Loads every note and assembles the tree.
    ///
    /// Returns an empty tree when the root directory does not exist yet.
    ///
    /// # Errors
    ///
    /// Fails on the first note that cannot be loaded (notes are never
    /// skipped or repaired) and on dangling parents or cycles.
    pub fn get_all(&self) -> Result<Vec<Note>, StoreError> {
        let flat = self.load_all_flat()?;
        let tree = build_note_tree(&flat)?;
        debug!(notes = flat.len(), roots = tree.len(), "assembled note tree");
        Ok(tree)
    }

    /// Loads every note without relating them.
    pub fn load_all_flat(&self) -> Result<Vec<Note>, StoreError> {
        if !self.root.exists() {
            debug!(root = %self.root.display(), "note directory does not exist yet");
            return Ok(Vec::new());
        }

        let ids = scan_note_directories(&self.root)?;
        let mut notes = Vec::with_capacity(ids.len());
        for id in ids {
            notes.push(load_note_from_fs(&self.root, &id)?);
        }
        Ok(notes)
    }

    /// Loads one note.
    pub fn get(&self, id: &NoteId) -> Result<Note, StoreError> {
        self.ensure_exists(id)?;
        Ok(load_note_from_fs(&self.root, id)?)
    }

    /// Creates and persists a new note.
    ///
    /// The parent is not checked: a dangling parent surfaces at the next
    /// [`get_all`](Self::get_all).
    ///
    /// # Errors
    ///
    /// - `InvalidNote` if the name breaks the length rule.
    /// - `AlreadyExists` if a directory for the requested id exists.
    pub fn create(&self, params: CreateNote) -> Result<Note, StoreError> {
        let note = params.into_note(Utc::now())?;
        if note_path(&self.root, note.id()).exists() {
            return Err(StoreError::AlreadyExists { id: *note.id() });
        }

        save_note_to_fs(&self.root, &note)?;
        info!(id = %note.id(), name = note.name(), "created note");
        Ok(note)
    }

    /// Applies a partial update and persists the result.
    ///
    /// Keys absent from `patch` are left alone. A present `parent: None`
    /// moves the note to the root; a present `sort: None` clears the
    /// override. `date_updated` always advances, even for an empty patch.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the note does not exist.
    /// - `InvalidNote` if a present name breaks the length rule.
    /// - `CycleRejected` if the new parent is the note or one of its
    ///   descendants.
    pub fn update(&self, id: &NoteId, patch: NotePatch) -> Result<Note, StoreError> {
        let mut note = self.get(id)?;

        if let Some(Some(parent)) = patch.parent {
            self.check_reparent(id, &parent)?;
        }

        note.apply(patch, Utc::now())?;
        save_note_to_fs(&self.root, &note)?;
        info!(%id, "updated note");
        Ok(note)
    }

    /// Walks up from `parent`; reaching `id` means the move would close a loop.
    /// Stops quietly at a missing ancestor since parents are not verified.
    fn check_reparent(&self, id: &NoteId, parent: &NoteId) -> Result<(), StoreError> {
        let mut seen = HashSet::new();
        let mut current = Some(*parent);
        while let Some(ancestor) = current {
            if ancestor == *id {
                return Err(StoreError::CycleRejected {
                    id: *id,
                    parent: *parent,
                });
            }
            if !seen.insert(ancestor) || !is_note_directory(&note_path(&self.root, &ancestor)) {
                break;
            }
            current = load_note_from_fs(&self.root, &ancestor)?.parent().copied();
        }
        Ok(())
    }

    /// Moves a note and all of its descendants to the trash.
    ///
    /// The target goes first, then descendants breadth-first, one trash
    /// call per directory. A failed call does not stop the rest; nothing
    /// already trashed is restored.
    ///
    /// Returns the ids that were trashed.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the note does not exist.
    /// - `Trash` listing every directory that could not be trashed, along
    ///   with the ids that were.
    pub fn move_to_trash(&self, id: &NoteId) -> Result<Vec<NoteId>, StoreError> {
        self.ensure_exists(id)?;

        let flat = self.load_all_flat()?;
        let ids = descendant_ids(&flat, id);

        let mut trashed = Vec::with_capacity(ids.len());
        let mut failures = Vec::new();
        for target in &ids {
            let path = note_path(&self.root, target);
            match self.trash.trash(&path) {
                Ok(()) => {
                    debug!(id = %target, "trashed note directory");
                    trashed.push(*target);
                }
                Err(err) => {
                    warn!(id = %target, error = %err, "failed to trash note directory");
                    failures.push((*target, err));
                }
            }
        }

        if !failures.is_empty() {
            return Err(StoreError::Trash {
                attempted: ids.len(),
                trashed,
                failures,
            });
        }
        info!(%id, count = ids.len(), "moved notes to trash");
        Ok(ids)
    }

    /// Copies files into the note's attachment directory.
    ///
    /// Directories are skipped. A file already inside this note's
    /// attachment directory is recorded without copying. Name collisions
    /// get a `-1`, `-2`, ... suffix before the extension; a file that
    /// still collides after [`MAX_COLLISION_SUFFIX`] tries is skipped.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the note does not exist.
    /// - `Fs` if a source cannot be read or copied. Files imported before
    ///   the failure stay in place.
    pub fn import_attachments<P: AsRef<Path>>(
        &self,
        id: &NoteId,
        files: &[P],
    ) -> Result<Vec<Attachment>, StoreError> {
        let dir = self.attachment_directory(id)?;
        let canonical_dir = dir.canonicalize().map_err(|e| FsError::from_io(&dir, e))?;

        let mut attachments = Vec::new();
        for file in files {
            let source = file.as_ref();
            if source.is_dir() {
                debug!(path = %source.display(), "skipping directory");
                continue;
            }
            let Some(name) = source.file_name().and_then(|n| n.to_str()) else {
                warn!(path = %source.display(), "skipping file without a usable name");
                continue;
            };

            let already_attached = source
                .canonicalize()
                .is_ok_and(|p| p.starts_with(&canonical_dir));
            let target_name = if already_attached {
                name.to_string()
            } else {
                let Some(target) = unique_target(&dir, name) else {
                    warn!(
                        path = %source.display(),
                        limit = MAX_COLLISION_SUFFIX,
                        "skipping attachment, every candidate name is taken"
                    );
                    continue;
                };
                fs::copy(source, &target).map_err(|e| FsError::from_io(source, e))?;
                debug!(from = %source.display(), to = %target.display(), "copied attachment");
                file_name_string(&target)
            };

            let kind = AttachmentKind::from_mime(mime_for_path(Path::new(&target_name)));
            attachments.push(Attachment {
                kind,
                path: target_name,
            });
        }

        info!(%id, count = attachments.len(), "imported attachments");
        Ok(attachments)
    }

    /// Path of the note's attachment directory, created if needed.
    pub fn attachment_directory(&self, id: &NoteId) -> Result<PathBuf, StoreError> {
        self.ensure_exists(id)?;
        let dir = attachments_path(&self.root, id);
        fs::create_dir_all(&dir).map_err(|e| FsError::from_io(&dir, e))?;
        Ok(dir)
    }

    /// Path of an existing attachment of the note.
    pub fn attachment_path(&self, id: &NoteId, name: &str) -> Result<PathBuf, StoreError> {
        self.ensure_exists(id)?;
        let relative = sanitize_relative_path(name)?;
        let path = attachments_path(&self.root, id).join(relative);
        if !path.is_file() {
            return Err(StoreError::AttachmentNotFound { path });
        }
        Ok(path)
    }

    /// Resolves an `attachment://` URI against this store's root.
    pub fn resolve_uri(&self, uri: &str) -> Result<PathBuf, StoreError> {
        Ok(protocol::resolve_attachment_uri(&self.root, uri)?)
    }

    fn ensure_exists(&self, id: &NoteId) -> Result<(), StoreError> {
        if note_path(&self.root, id).is_dir() {
            Ok(())
        } else {
            Err(StoreError::NotFound { id: *id })
        }
    }
}

/// First free name in `dir`: `name`, then `stem-1.ext` up to the limit.
fn unique_target(dir: &Path, name: &str) -> Option<PathBuf> {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return Some(candidate);
    }

    let as_path = Path::new(name);
    let stem = as_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    let ext = as_path.extension().and_then(|e| e.to_str());

    (1..=MAX_COLLISION_SUFFIX)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{stem}-{n}.{ext}")),
            None => dir.join(format!("{stem}-{n}")),
        })
        .find(|p| !p.exists())
}

fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
