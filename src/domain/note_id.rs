//! UUID-based note identifier with strict v4 parsing and serde support.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::sync::LazyLock;
use uuid::Uuid;

/// Canonical lowercase hyphenated UUID v4 shape.
///
/// Note directories are named by this string, so anything that does not
/// match it is never treated as a note.
pub(crate) const NOTE_ID_PATTERN: &str =
    "[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}";

static NOTE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{NOTE_ID_PATTERN}$")).expect("note id pattern is valid")
});

/// A unique identifier for notes based on UUID v4.
///
/// The identifier doubles as the name of the note's directory, so only the
/// canonical lowercase hyphenated form is accepted when parsing.
///
/// # Examples
///
/// ```
/// use notetree::domain::NoteId;
///
/// let id = NoteId::new();
/// let parsed: NoteId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Creates a new random NoteId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns true if `s` has the exact shape of a note id.
    pub fn is_valid(s: &str) -> bool {
        NOTE_ID_RE.is_match(s)
    }

    /// Returns the first 8 characters, used for compact display.
    pub fn prefix(&self) -> String {
        self.to_string()[..8].to_string()
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl fmt::Debug for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NoteId(\"{}\")", self.0.hyphenated())
    }
}

/// Error returned when parsing an invalid note id string.
#[derive(Debug, Clone)]
pub struct ParseNoteIdError {
    value: String,
}

impl ParseNoteIdError {
    /// Returns the invalid value that caused this error.
    pub fn invalid_value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseNoteIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid note id '{}': expected a lowercase hyphenated UUID v4",
            self.value
        )
    }
}

impl std::error::Error for ParseNoteIdError {}

impl FromStr for NoteId {
    type Err = ParseNoteIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseNoteIdError {
            value: s.to_string(),
        };
        if !Self::is_valid(s) {
            return Err(err());
        }
        Uuid::parse_str(s).map(NoteId).map_err(|_| err())
    }
}

impl Serialize for NoteId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
