//! Core types: Note, NoteId (UUID v4), NotePatch, Attachment, and tree assembly

mod attachment;
mod note;
mod note_id;
pub mod tree;

pub use attachment::{Attachment, AttachmentKind};
pub use note::{
    CreateNote, MAX_NAME_LEN, Note, NoteBuilder, NotePatch, NoteSort, ParseNoteError,
    ParseSortError, default_content, validate_name, validate_name_len,
};
pub use note_id::{NoteId, ParseNoteIdError};
pub(crate) use note_id::NOTE_ID_PATTERN;
pub use tree::{TreeError, build_note_tree, descendant_ids, flatten, get_parents, sort_tree};
