//! File I/O, OS trash, MIME detection, and the attachment URI scheme

pub mod fs;
pub mod mime;
pub mod protocol;
pub mod trash;

pub use fs::{BodyWrite, FsError};
pub use protocol::{AttachmentRef, ProtocolError};
pub use trash::{SystemTrash, Trash, TrashError};
