//! Note struct representing one node of the note tree.

use crate::domain::NoteId;
use crate::schema::note::NOTE_SCHEMA_VERSION;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a note name, in characters.
pub const MAX_NAME_LEN: usize = 64;

/// The kind of error that occurred when constructing a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseNoteErrorKind {
    EmptyName,
    NameTooLong(usize),
}

/// Error returned when constructing or renaming a note with an invalid name.
#[derive(Debug, Clone)]
pub struct ParseNoteError {
    kind: ParseNoteErrorKind,
}

impl fmt::Display for ParseNoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParseNoteErrorKind::EmptyName => write!(f, "invalid note: name cannot be empty"),
            ParseNoteErrorKind::NameTooLong(len) => write!(
                f,
                "invalid note: name is {len} characters, maximum is {MAX_NAME_LEN}"
            ),
        }
    }
}

impl std::error::Error for ParseNoteError {}

/// Checks the 1–64 character name rule.
///
/// Length is counted in Unicode scalar values. This is the only check run on
/// names read back from disk.
pub fn validate_name_len(name: &str) -> Result<(), ParseNoteError> {
    let len = name.chars().count();
    if len == 0 {
        return Err(ParseNoteError {
            kind: ParseNoteErrorKind::EmptyName,
        });
    }
    if len > MAX_NAME_LEN {
        return Err(ParseNoteError {
            kind: ParseNoteErrorKind::NameTooLong(len),
        });
    }
    Ok(())
}

/// Checks a name supplied on create or rename.
///
/// Same as [`validate_name_len`], but whitespace-only names are also treated
/// as empty.
pub fn validate_name(name: &str) -> Result<(), ParseNoteError> {
    if name.trim().is_empty() {
        return Err(ParseNoteError {
            kind: ParseNoteErrorKind::EmptyName,
        });
    }
    validate_name_len(name)
}

/// Ordering applied to the children of a note (or to the roots).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoteSort {
    #[default]
    Alphanumeric,
    AlphanumericReversed,
    DateCreated,
    DateCreatedReversed,
    DateUpdated,
    DateUpdatedReversed,
}

impl NoteSort {
    pub const ALL: [NoteSort; 6] = [
        NoteSort::Alphanumeric,
        NoteSort::AlphanumericReversed,
        NoteSort::DateCreated,
        NoteSort::DateCreatedReversed,
        NoteSort::DateUpdated,
        NoteSort::DateUpdatedReversed,
    ];

    /// Returns the on-disk spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteSort::Alphanumeric => "alphanumeric",
            NoteSort::AlphanumericReversed => "alphanumericReversed",
            NoteSort::DateCreated => "dateCreated",
            NoteSort::DateCreatedReversed => "dateCreatedReversed",
            NoteSort::DateUpdated => "dateUpdated",
            NoteSort::DateUpdatedReversed => "dateUpdatedReversed",
        }
    }
}

impl fmt::Display for NoteSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown sort name.
#[derive(Debug, Clone)]
pub struct ParseSortError {
    value: String,
}

impl fmt::Display for ParseSortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected: Vec<&str> = NoteSort::ALL.iter().map(NoteSort::as_str).collect();
        write!(
            f,
            "unknown sort '{}', expected one of: {}",
            self.value,
            expected.join(", ")
        )
    }
}

impl std::error::Error for ParseSortError {}

impl FromStr for NoteSort {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteSort::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| ParseSortError {
                value: s.to_string(),
            })
    }
}

/// A user-authored note.
///
/// On disk a note is a directory named by its id holding a metadata file
/// and a markdown body. `children` is only populated when notes are
/// assembled into a tree and is never persisted.
///
/// # Examples
///
/// ```
/// use notetree::domain::{Note, NoteId};
/// use chrono::Utc;
///
/// let note = Note::builder(NoteId::new(), "Groceries", Utc::now())
///     .content("# Groceries\n")
///     .build()
///     .unwrap();
/// assert_eq!(note.name(), "Groceries");
/// assert!(note.parent().is_none());
/// ```
#[derive(Clone, PartialEq)]
pub struct Note {
    id: NoteId,
    version: u32,
    name: String,
    parent: Option<NoteId>,
    sort: Option<NoteSort>,
    content: String,
    date_created: DateTime<Utc>,
    date_updated: Option<DateTime<Utc>>,
    children: Vec<Note>,
}

impl Note {
    /// Creates a builder for a note with the required fields set.
    pub fn builder(
        id: NoteId,
        name: impl Into<String>,
        date_created: DateTime<Utc>,
    ) -> NoteBuilder {
        NoteBuilder::new(id, name, date_created)
    }

    pub fn id(&self) -> &NoteId {
        &self.id
    }

    /// Schema version of the metadata this note was loaded as.
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&NoteId> {
        self.parent.as_ref()
    }

    /// Ordering override for this note's children.
    pub fn sort(&self) -> Option<NoteSort> {
        self.sort
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    /// Set only once the note has been updated at least once.
    pub fn date_updated(&self) -> Option<DateTime<Utc>> {
        self.date_updated
    }

    pub fn children(&self) -> &[Note] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Note> {
        &mut self.children
    }

    /// Returns a copy of this note without any assembled children.
    pub fn without_children(&self) -> Note {
        Note {
            children: Vec::new(),
            ..self.clone()
        }
    }

    /// Applies a partial update.
    ///
    /// Only keys present in `patch` are touched. `date_updated` is stamped
    /// with `now` on every call, including an empty patch.
    ///
    /// # Errors
    ///
    /// Returns `ParseNoteError` if the patch carries an invalid name. The
    /// note is left unchanged in that case.
    pub fn apply(&mut self, patch: NotePatch, now: DateTime<Utc>) -> Result<(), ParseNoteError> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(parent) = patch.parent {
            self.parent = parent;
        }
        if let Some(sort) = patch.sort {
            self.sort = sort;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        self.date_updated = Some(now);
        Ok(())
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.id.prefix())
    }
}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Note")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("sort", &self.sort)
            .field("date_created", &self.date_created)
            .field("date_updated", &self.date_updated)
            .field("content_len", &self.content.len())
            .field("children", &self.children)
            .finish()
    }
}

impl Serialize for Note {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("version", &self.version)?;
        map.serialize_entry("name", &self.name)?;
        if let Some(parent) = &self.parent {
            map.serialize_entry("parent", parent)?;
        }
        if let Some(sort) = &self.sort {
            map.serialize_entry("sort", sort)?;
        }
        map.serialize_entry("content", &self.content)?;
        map.serialize_entry("dateCreated", &self.date_created)?;
        if let Some(updated) = &self.date_updated {
            map.serialize_entry("dateUpdated", updated)?;
        }
        map.serialize_entry("children", &self.children)?;
        map.end()
    }
}

/// Builder for constructing a Note with optional fields.
pub struct NoteBuilder {
    id: NoteId,
    version: u32,
    name: String,
    parent: Option<NoteId>,
    sort: Option<NoteSort>,
    content: String,
    date_created: DateTime<Utc>,
    date_updated: Option<DateTime<Utc>>,
}

impl NoteBuilder {
    fn new(id: NoteId, name: impl Into<String>, date_created: DateTime<Utc>) -> Self {
        Self {
            id,
            version: NOTE_SCHEMA_VERSION,
            name: name.into(),
            parent: None,
            sort: None,
            content: String::new(),
            date_created,
            date_updated: None,
        }
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn parent(mut self, parent: Option<NoteId>) -> Self {
        self.parent = parent;
        self
    }

    pub fn sort(mut self, sort: Option<NoteSort>) -> Self {
        self.sort = sort;
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn date_updated(mut self, date_updated: Option<DateTime<Utc>>) -> Self {
        self.date_updated = date_updated;
        self
    }

    /// Builds the Note.
    ///
    /// # Errors
    ///
    /// Returns `ParseNoteError` if the name breaks the 1–64 character rule.
    pub fn build(self) -> Result<Note, ParseNoteError> {
        validate_name_len(&self.name)?;

        Ok(Note {
            id: self.id,
            version: self.version,
            name: self.name,
            parent: self.parent,
            sort: self.sort,
            content: self.content,
            date_created: self.date_created,
            date_updated: self.date_updated,
            children: Vec::new(),
        })
    }
}

/// Parameters for creating a note.
///
/// Only `name` is required. A missing id is generated, a missing content
/// defaults to a heading derived from the name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNote {
    pub name: String,
    #[serde(default)]
    pub parent: Option<NoteId>,
    #[serde(default)]
    pub id: Option<NoteId>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub sort: Option<NoteSort>,
}

impl CreateNote {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn parent(mut self, parent: NoteId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn id(mut self, id: NoteId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn sort(mut self, sort: NoteSort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Fills in the defaults and validates the result.
    pub fn into_note(self, now: DateTime<Utc>) -> Result<Note, ParseNoteError> {
        validate_name(&self.name)?;
        let content = self
            .content
            .unwrap_or_else(|| default_content(&self.name));
        Note::builder(self.id.unwrap_or_default(), self.name, now)
            .parent(self.parent)
            .sort(self.sort)
            .content(content)
            .build()
    }
}

/// Body written for a note created without explicit content.
pub fn default_content(name: &str) -> String {
    format!("# {name}\n")
}

/// A partial update to a note.
///
/// Each field distinguishes "absent" (outer `None`: leave unchanged) from
/// "present". For `parent` and `sort` a present `None` unsets the value,
/// which for `parent` moves the note to the root. When deserialized from
/// JSON, a key with an explicit `null` is present, a missing key is not.
///
/// # Examples
///
/// ```
/// use notetree::domain::NotePatch;
///
/// let keep: NotePatch = serde_json::from_str("{}").unwrap();
/// assert_eq!(keep.parent, None);
///
/// let unset: NotePatch = serde_json::from_str(r#"{"parent": null}"#).unwrap();
/// assert_eq!(unset.parent, Some(None));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub parent: Option<Option<NoteId>>,
    #[serde(default, deserialize_with = "present")]
    pub sort: Option<Option<NoteSort>>,
    #[serde(default)]
    pub content: Option<String>,
}

impl NotePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets (`Some`) or unsets (`None`) the parent.
    pub fn parent(mut self, parent: Option<NoteId>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets (`Some`) or unsets (`None`) the sort override.
    pub fn sort(mut self, sort: Option<NoteSort>) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Marks a field as present whenever its key appears, `null` included.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_datetime() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn later() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-02-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn test_id(suffix: char) -> NoteId {
        format!("3f2b8c1e-7d4a-4e2b-9c1d-0a1b2c3d4e5{suffix}")
            .parse()
            .unwrap()
    }

    fn sample_note() -> Note {
        Note::builder(test_id('0'), "Recipes", test_datetime())
            .parent(Some(test_id('1')))
            .sort(Some(NoteSort::DateCreated))
            .content("# Recipes\n")
            .build()
            .unwrap()
    }

    // ===========================================
    // Name validation
    // ===========================================

    #[test]
    fn name_of_one_char_is_valid() {
        assert!(validate_name("a").is_ok());
    }

    #[test]
    fn name_of_64_chars_is_valid() {
        assert!(validate_name(&"x".repeat(64)).is_ok());
    }

    #[test]
    fn name_of_65_chars_is_rejected() {
        let err = validate_name(&"x".repeat(65)).unwrap_err();
        assert!(err.to_string().contains("65"));
    }

    #[test]
    fn name_length_counts_chars_not_bytes() {
        assert!(validate_name(&"é".repeat(64)).is_ok());
    }

    #[test]
    fn empty_and_blank_names_are_rejected() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn builder_rejects_empty_name() {
        assert!(Note::builder(test_id('0'), "", test_datetime()).build().is_err());
    }

    #[test]
    fn builder_accepts_blank_name_but_create_does_not() {
        let note = Note::builder(test_id('0'), "   ", test_datetime())
            .build()
            .unwrap();
        assert_eq!(note.name(), "   ");

        let err = CreateNote::new("   ").into_note(test_datetime()).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn rename_to_blank_name_is_rejected() {
        let mut note = sample_note();
        assert!(note.apply(NotePatch::new().name("  "), later()).is_err());
        assert_eq!(note.name(), "Recipes");
    }

    // ===========================================
    // Sort parsing
    // ===========================================

    #[test]
    fn sort_parses_every_variant() {
        for sort in NoteSort::ALL {
            assert_eq!(sort.as_str().parse::<NoteSort>().unwrap(), sort);
        }
    }

    #[test]
    fn sort_serde_matches_as_str() {
        for sort in NoteSort::ALL {
            let json = serde_json::to_string(&sort).unwrap();
            assert_eq!(json, format!("\"{}\"", sort.as_str()));
        }
    }

    #[test]
    fn unknown_sort_lists_options() {
        let err = "random".parse::<NoteSort>().unwrap_err();
        assert!(err.to_string().contains("alphanumericReversed"));
    }

    // ===========================================
    // Create params
    // ===========================================

    #[test]
    fn create_fills_id_and_default_content() {
        let note = CreateNote::new("foo").into_note(test_datetime()).unwrap();
        assert_eq!(note.name(), "foo");
        assert_eq!(note.content(), "# foo\n");
        assert_eq!(note.date_created(), test_datetime());
        assert!(note.date_updated().is_none());
        assert!(note.parent().is_none());
        assert_eq!(note.version(), NOTE_SCHEMA_VERSION);
    }

    #[test]
    fn create_keeps_explicit_fields() {
        let note = CreateNote::new("child")
            .id(test_id('5'))
            .parent(test_id('1'))
            .content("body")
            .sort(NoteSort::DateUpdated)
            .into_note(test_datetime())
            .unwrap();
        assert_eq!(note.id(), &test_id('5'));
        assert_eq!(note.parent(), Some(&test_id('1')));
        assert_eq!(note.content(), "body");
        assert_eq!(note.sort(), Some(NoteSort::DateUpdated));
    }

    #[test]
    fn create_deserializes_from_minimal_json() {
        let params: CreateNote = serde_json::from_str(r#"{"name":"foo"}"#).unwrap();
        assert_eq!(params, CreateNote::new("foo"));
    }

    // ===========================================
    // Patch presence semantics
    // ===========================================

    #[test]
    fn empty_patch_only_advances_date_updated() {
        let mut note = sample_note();
        let before = note.clone();
        note.apply(NotePatch::new(), later()).unwrap();

        assert_eq!(note.date_updated(), Some(later()));
        let mut expected = before;
        expected.date_updated = Some(later());
        assert_eq!(note, expected);
    }

    #[test]
    fn explicit_none_parent_unsets_it() {
        let mut note = sample_note();
        note.apply(NotePatch::new().parent(None), later()).unwrap();
        assert!(note.parent().is_none());
    }

    #[test]
    fn omitted_parent_is_left_alone() {
        let mut note = sample_note();
        note.apply(NotePatch::new().name("Renamed"), later()).unwrap();
        assert_eq!(note.parent(), Some(&test_id('1')));
        assert_eq!(note.name(), "Renamed");
    }

    #[test]
    fn explicit_none_sort_unsets_it() {
        let mut note = sample_note();
        note.apply(NotePatch::new().sort(None), later()).unwrap();
        assert!(note.sort().is_none());
    }

    #[test]
    fn invalid_name_leaves_note_untouched() {
        let mut note = sample_note();
        let before = note.clone();
        let result = note.apply(NotePatch::new().name("").parent(None), later());
        assert!(result.is_err());
        assert_eq!(note, before);
    }

    #[test]
    fn patch_json_null_is_present_missing_is_absent() {
        let patch: NotePatch = serde_json::from_str(r#"{"sort": null}"#).unwrap();
        assert_eq!(patch.sort, Some(None));
        assert_eq!(patch.parent, None);

        let patch: NotePatch =
            serde_json::from_str(r#"{"parent": "3f2b8c1e-7d4a-4e2b-9c1d-0a1b2c3d4e51"}"#).unwrap();
        assert_eq!(patch.parent, Some(Some(test_id('1'))));
    }

    #[test]
    fn patch_is_empty() {
        assert!(NotePatch::new().is_empty());
        assert!(!NotePatch::new().parent(None).is_empty());
    }

    // ===========================================
    // Serialization
    // ===========================================

    #[test]
    fn serialize_omits_unset_optionals() {
        let note = Note::builder(test_id('0'), "Root", test_datetime())
            .build()
            .unwrap();
        let value = serde_json::to_value(&note).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("parent"));
        assert!(!obj.contains_key("sort"));
        assert!(!obj.contains_key("dateUpdated"));
        assert_eq!(obj["children"], serde_json::json!([]));
    }

    #[test]
    fn serialize_uses_camel_case() {
        let value = serde_json::to_value(sample_note()).unwrap();
        assert_eq!(value["dateCreated"], "2024-01-15T10:30:00Z");
        assert_eq!(value["sort"], "dateCreated");
        assert_eq!(value["parent"], test_id('1').to_string());
    }

    #[test]
    fn display_shows_name_and_prefix() {
        assert_eq!(sample_note().to_string(), "Recipes [3f2b8c1e]");
    }
}
