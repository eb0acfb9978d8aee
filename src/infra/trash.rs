//! OS recycle bin access.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("cannot move {path} to trash: {message}")]
pub struct TrashError {
    pub path: String,
    pub message: String,
}

/// Something that can move a directory out of the note tree recoverably.
pub trait Trash {
    fn trash(&self, path: &Path) -> Result<(), TrashError>;
}

/// The platform recycle bin.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTrash;

impl Trash for SystemTrash {
    fn trash(&self, path: &Path) -> Result<(), TrashError> {
        trash::delete(path).map_err(|e| TrashError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl<T: Trash + ?Sized> Trash for &T {
    fn trash(&self, path: &Path) -> Result<(), TrashError> {
        (**self).trash(path)
    }
}
