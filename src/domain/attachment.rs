//! Attachment records returned from an import.

use serde::{Deserialize, Serialize};

/// How the hosting application should present an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    File,
}

impl AttachmentKind {
    /// `Image` if and only if the MIME type begins with "image".
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image") {
            AttachmentKind::Image
        } else {
            AttachmentKind::File
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentKind::Image => "image",
            AttachmentKind::File => "file",
        }
    }
}

/// A file stored in a note's attachment directory.
///
/// `path` is the bare file name: imports always land in the note's own
/// flat attachment directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub path: String,
}
