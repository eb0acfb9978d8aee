//! Note resolution utilities, plus the `resolve` and `uri` commands.

use anyhow::{Context, Result, bail};

use crate::cli::{ResolveArgs, UriArgs};
use crate::domain::{Note, NoteId};
use crate::infra::Trash;
use crate::infra::protocol::attachment_uri;
use crate::store::NoteStore;

/// Shortest ID prefix accepted for lookups.
const MIN_PREFIX_LEN: usize = 4;

/// Result of resolving a note identifier.
#[derive(Debug)]
pub enum ResolveResult {
    /// Exactly one note matched.
    Unique(Note),
    /// Multiple notes matched (ambiguous).
    Ambiguous(Vec<Note>),
    /// No notes matched.
    NotFound,
}

/// Prints the candidates of an ambiguous identifier.
pub(crate) fn print_ambiguous_notes(identifier: &str, notes: &[Note]) {
    eprintln!("Ambiguous: '{}' matches {} notes:", identifier, notes.len());
    for note in notes {
        eprintln!("  {} - {}", note.id().prefix(), note.name());
    }
    eprintln!();
    eprintln!("Use a longer ID prefix to specify which note you mean.");
}

/// Resolves a note identifier against a flat list of notes.
///
/// Resolution order:
/// 1. ID prefix match (if input looks like part of a UUID)
/// 2. Exact name match
///
/// A unique ID prefix match wins outright.
pub fn resolve_note(notes: &[Note], identifier: &str) -> ResolveResult {
    let identifier = identifier.trim();

    let looks_like_id = identifier.len() >= MIN_PREFIX_LEN
        && identifier
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == '-');

    let mut candidates: Vec<&Note> = Vec::new();

    if looks_like_id {
        let needle = identifier.to_ascii_lowercase();
        let id_matches: Vec<&Note> = notes
            .iter()
            .filter(|n| n.id().to_string().starts_with(&needle))
            .collect();

        if id_matches.len() == 1 {
            return ResolveResult::Unique(id_matches[0].clone());
        }
        candidates.extend(id_matches);
    }

    candidates.extend(notes.iter().filter(|n| n.name() == identifier));

    candidates.sort_by_key(|n| *n.id());
    candidates.dedup_by_key(|n| *n.id());

    match candidates.as_slice() {
        [] => ResolveResult::NotFound,
        [only] => ResolveResult::Unique((*only).clone()),
        _ => ResolveResult::Ambiguous(candidates.into_iter().cloned().collect()),
    }
}

/// Looks up a note by full ID, ID prefix, or exact name.
pub fn find_note<T: Trash>(store: &NoteStore<T>, identifier: &str) -> Result<Note> {
    if let Ok(id) = identifier.trim().parse::<NoteId>() {
        return store
            .get(&id)
            .with_context(|| format!("failed to load note {id}"));
    }

    let notes = store
        .load_all_flat()
        .with_context(|| "failed to load notes")?;
    match resolve_note(&notes, identifier) {
        ResolveResult::Unique(note) => Ok(note),
        ResolveResult::Ambiguous(notes) => {
            print_ambiguous_notes(identifier, &notes);
            bail!("ambiguous note identifier");
        }
        ResolveResult::NotFound => bail!("note not found: '{}'", identifier),
    }
}

pub fn handle_resolve<T: Trash>(args: &ResolveArgs, store: &NoteStore<T>) -> Result<()> {
    let path = store
        .resolve_uri(&args.uri)
        .with_context(|| format!("cannot resolve '{}'", args.uri))?;
    println!("{}", path.display());
    Ok(())
}

pub fn handle_uri<T: Trash>(args: &UriArgs, store: &NoteStore<T>) -> Result<()> {
    let note = find_note(store, &args.note)?;
    store
        .attachment_path(note.id(), &args.file)
        .with_context(|| format!("'{}' is not an attachment of {}", args.file, note))?;
    println!("{}", attachment_uri(note.id(), &args.file));
    Ok(())
}
