//! The `attachment://` URI scheme used by note bodies to reference files.
//!
//! ```text
//! attachment://<percent-encoded relative path>?noteId=<uuid>
//! ```
//!
//! resolves to `<root>/<uuid>/attachments/<relative path>`.

use std::path::{Component, Path, PathBuf};
use std::string::FromUtf8Error;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::domain::{NOTE_ID_PATTERN, NoteId};
use crate::infra::fs::attachments_path;

pub const ATTACHMENT_SCHEME: &str = "attachment";

static ATTACHMENT_URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^{ATTACHMENT_SCHEME}://([^?#]+)\?noteId=({NOTE_ID_PATTERN})$"
    ))
    .expect("attachment uri pattern is valid")
});

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed attachment URI: {uri}")]
    Malformed { uri: String },

    #[error("attachment URI path is not valid UTF-8 after decoding: {uri}")]
    Decode {
        uri: String,
        #[source]
        source: FromUtf8Error,
    },

    #[error("attachment path escapes the attachment directory: {path}")]
    InvalidPath { path: String },
}

/// A parsed attachment URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub note_id: NoteId,
    /// Relative to the note's attachment directory, already sanitized
    pub path: PathBuf,
}

/// Parses an attachment URI.
///
/// The whole string must match the scheme, path, and `noteId` query shape
/// before anything is decoded.
///
/// # Errors
///
/// - `Malformed` if the structure does not match.
/// - `Decode` if the percent-decoded path is not UTF-8.
/// - `InvalidPath` if the decoded path is empty, absolute, contains `..`,
///   a backslash, or a NUL byte.
pub fn parse_attachment_uri(uri: &str) -> Result<AttachmentRef, ProtocolError> {
    let caps = ATTACHMENT_URI_RE
        .captures(uri)
        .ok_or_else(|| ProtocolError::Malformed {
            uri: uri.to_string(),
        })?;

    let note_id: NoteId = caps[2].parse().map_err(|_| ProtocolError::Malformed {
        uri: uri.to_string(),
    })?;
    let decoded = urlencoding::decode(&caps[1]).map_err(|source| ProtocolError::Decode {
        uri: uri.to_string(),
        source,
    })?;
    let path = sanitize_relative_path(&decoded)?;

    Ok(AttachmentRef { note_id, path })
}

/// Maps an attachment URI to an absolute path under `note_dir`.
///
/// The file itself is not required to exist.
pub fn resolve_attachment_uri(note_dir: &Path, uri: &str) -> Result<PathBuf, ProtocolError> {
    let reference = parse_attachment_uri(uri)?;
    Ok(attachments_path(note_dir, &reference.note_id).join(reference.path))
}

/// Builds the URI for a file inside a note's attachment directory.
///
/// Each `/`-separated segment is percent-encoded on its own so nested
/// paths keep their separators.
pub fn attachment_uri(id: &NoteId, relative_path: &str) -> String {
    let encoded: Vec<_> = relative_path
        .split('/')
        .map(urlencoding::encode)
        .collect();
    format!("{ATTACHMENT_SCHEME}://{}?noteId={id}", encoded.join("/"))
}

pub(crate) fn sanitize_relative_path(raw: &str) -> Result<PathBuf, ProtocolError> {
    let invalid = || ProtocolError::InvalidPath {
        path: raw.to_string(),
    };

    if raw.contains('\\') || raw.contains('\0') {
        return Err(invalid());
    }

    let mut clean = PathBuf::new();
    for component in Path::new(raw).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(invalid());
            }
        }
    }

    if clean.as_os_str().is_empty() {
        return Err(invalid());
    }
    Ok(clean)
}
