//! Builder for notes written straight to disk in tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use notetree::domain::{Note, NoteId, NoteSort};

/// Fluent builder for test notes.
///
/// Defaults to a fresh id, a fixed creation date, and a heading as content.
#[derive(Debug, Clone)]
pub struct TestNote {
    id: NoteId,
    name: String,
    parent: Option<NoteId>,
    sort: Option<NoteSort>,
    content: Option<String>,
    created: DateTime<Utc>,
    updated: Option<DateTime<Utc>>,
}

impl TestNote {
    /// Creates a new test note with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            id: NoteId::new(),
            name: name.to_string(),
            parent: None,
            sort: None,
            content: None,
            created: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            updated: None,
        }
    }

    /// Sets a specific id (parses the string).
    pub fn id(mut self, id: &str) -> Self {
        self.id = id.parse().expect("Invalid NoteId");
        self
    }

    /// Places the note under another test note.
    pub fn child_of(mut self, parent: &TestNote) -> Self {
        self.parent = Some(parent.id);
        self
    }

    /// Sets a raw parent id, which need not exist.
    pub fn parent_id(mut self, parent: NoteId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn sort(mut self, sort: NoteSort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    /// Sets the creation date.
    pub fn created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    /// Sets the last update date.
    pub fn updated(mut self, updated: DateTime<Utc>) -> Self {
        self.updated = Some(updated);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn note_id(&self) -> &NoteId {
        &self.id
    }

    /// Returns the ID prefix as printed by the CLI.
    pub fn id_prefix(&self) -> String {
        self.id.prefix()
    }

    /// Converts this TestNote to a domain Note.
    pub fn to_note(&self) -> Note {
        let content = self
            .content
            .clone()
            .unwrap_or_else(|| format!("# {}\n", self.name));
        Note::builder(self.id, &self.name, self.created)
            .parent(self.parent)
            .sort(self.sort)
            .content(content)
            .date_updated(self.updated)
            .build()
            .expect("TestNote should always produce valid Note")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===========================================
    // TestNote Builder
    // ===========================================

    #[test]
    fn test_note_new_with_name() {
        let note = TestNote::new("My Test Note");
        assert_eq!(note.name(), "My Test Note");
        assert_eq!(note.to_note().content(), "# My Test Note\n");
    }

    #[test]
    fn test_note_builder_fluent() {
        let parent = TestNote::new("Projects");
        let note = TestNote::new("Roadmap")
            .child_of(&parent)
            .sort(NoteSort::DateCreated)
            .content("Q3 goals");

        let domain_note = note.to_note();
        assert_eq!(domain_note.parent(), Some(parent.note_id()));
        assert_eq!(domain_note.sort(), Some(NoteSort::DateCreated));
        assert_eq!(domain_note.content(), "Q3 goals");
    }

    #[test]
    fn test_note_custom_id() {
        let note = TestNote::new("Test").id("3f2b8c1e-7d4a-4e2b-9c1d-0a1b2c3d4e5f");
        assert_eq!(
            note.note_id().to_string(),
            "3f2b8c1e-7d4a-4e2b-9c1d-0a1b2c3d4e5f"
        );
        assert_eq!(note.id_prefix(), note.note_id().prefix());
    }
}
