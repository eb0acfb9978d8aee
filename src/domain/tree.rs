//! Tree assembly over flat, parent-pointer annotated notes.
//!
//! Parents are weak references: a child holds only its parent's id, and
//! assembly is a single id-indexed pass. Nothing here touches the disk.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;

use crate::domain::{Note, NoteId, NoteSort};

/// Structural problems found while relating notes to each other.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("note {id} references parent {parent}, which does not exist")]
    DanglingReference { id: NoteId, parent: NoteId },

    #[error("notes form a parent cycle: {}", format_ids(.ids))]
    Cycle { ids: Vec<NoteId> },

    #[error("duplicate note id: {id}")]
    DuplicateId { id: NoteId },
}

fn format_ids(ids: &[NoteId]) -> String {
    ids.iter()
        .map(NoteId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the note hierarchy from a flat list.
///
/// Input notes are cloned without any pre-existing children, so rebuilding
/// from an already assembled list does not duplicate nodes. Siblings keep
/// their relative input order.
///
/// # Errors
///
/// - `DanglingReference` if a parent id is not in the list. When every note
///   of a store is loaded in one batch this means on-disk corruption.
/// - `Cycle` if some notes never reach a root.
/// - `DuplicateId` if two notes share an id.
pub fn build_note_tree(flat: &[Note]) -> Result<Vec<Note>, TreeError> {
    let mut nodes: HashMap<NoteId, Note> = HashMap::with_capacity(flat.len());
    for note in flat {
        if nodes.insert(*note.id(), note.without_children()).is_some() {
            return Err(TreeError::DuplicateId { id: *note.id() });
        }
    }

    let mut root_ids = Vec::new();
    let mut child_ids: HashMap<NoteId, Vec<NoteId>> = HashMap::new();
    for note in flat {
        match note.parent() {
            None => root_ids.push(*note.id()),
            Some(parent) if nodes.contains_key(parent) => {
                child_ids.entry(*parent).or_default().push(*note.id());
            }
            Some(parent) => {
                return Err(TreeError::DanglingReference {
                    id: *note.id(),
                    parent: *parent,
                });
            }
        }
    }

    // Breadth-first from the roots: every child lands after its parent.
    let mut order = Vec::with_capacity(nodes.len());
    let mut queue: VecDeque<NoteId> = root_ids.iter().copied().collect();
    while let Some(id) = queue.pop_front() {
        order.push(id);
        if let Some(kids) = child_ids.get(&id) {
            queue.extend(kids.iter().copied());
        }
    }

    if order.len() != nodes.len() {
        let reached: HashSet<&NoteId> = order.iter().collect();
        let mut ids: Vec<NoteId> = nodes
            .keys()
            .filter(|id| !reached.contains(id))
            .copied()
            .collect();
        ids.sort();
        return Err(TreeError::Cycle { ids });
    }

    // Deepest first, so each child is complete before its parent takes it.
    for id in order.iter().rev() {
        if let Some(kids) = child_ids.get(id) {
            let assembled: Vec<Note> = kids.iter().filter_map(|k| nodes.remove(k)).collect();
            if let Some(parent) = nodes.get_mut(id) {
                *parent.children_mut() = assembled;
            }
        }
    }

    Ok(root_ids.iter().filter_map(|id| nodes.remove(id)).collect())
}

/// Pre-order traversal of a tree.
///
/// Children are visited in the order they are stored. Callers that need a
/// particular visual order sort with [`sort_tree`] first.
pub fn flatten(tree: &[Note]) -> Vec<&Note> {
    let mut out = Vec::new();
    let mut stack: Vec<&Note> = tree.iter().rev().collect();
    while let Some(note) = stack.pop() {
        out.push(note);
        stack.extend(note.children().iter().rev());
    }
    out
}

/// Ancestors of `note`, nearest first.
///
/// `tree` is the full live tree; it is flattened to resolve each hop.
///
/// # Errors
///
/// `DanglingReference` if a hop cannot be resolved, `Cycle` if the chain
/// loops back on itself.
pub fn get_parents<'a>(note: &Note, tree: &'a [Note]) -> Result<Vec<&'a Note>, TreeError> {
    let lookup: HashMap<&NoteId, &Note> = flatten(tree).into_iter().map(|n| (n.id(), n)).collect();

    let mut parents = Vec::new();
    let mut seen = HashSet::from([*note.id()]);
    let mut current_id = *note.id();
    let mut next = note.parent().copied();

    while let Some(parent_id) = next {
        let parent = lookup
            .get(&parent_id)
            .copied()
            .ok_or(TreeError::DanglingReference {
                id: current_id,
                parent: parent_id,
            })?;
        if !seen.insert(parent_id) {
            let mut ids: Vec<NoteId> = seen.into_iter().collect();
            ids.sort();
            return Err(TreeError::Cycle { ids });
        }
        parents.push(parent);
        current_id = parent_id;
        next = parent.parent().copied();
    }

    Ok(parents)
}

/// Returns `id` followed by every descendant, breadth-first.
///
/// Walks `.parent` pointers of the flat list with an explicit work queue,
/// so deeply nested trees never recurse. Ids already visited are skipped.
pub fn descendant_ids(flat: &[Note], id: &NoteId) -> Vec<NoteId> {
    let mut child_ids: HashMap<&NoteId, Vec<NoteId>> = HashMap::new();
    for note in flat {
        if let Some(parent) = note.parent() {
            child_ids.entry(parent).or_default().push(*note.id());
        }
    }

    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([*id]);
    while let Some(next) = queue.pop_front() {
        if !seen.insert(next) {
            continue;
        }
        out.push(next);
        if let Some(kids) = child_ids.get(&next) {
            queue.extend(kids.iter().copied());
        }
    }
    out
}

/// Sorts `notes` by `sort`, then each note's children recursively.
///
/// A note's own `sort` overrides the ordering of its children only; notes
/// without an override use `sort`.
pub fn sort_tree(notes: &mut [Note], sort: NoteSort) {
    sort_level(notes, sort, sort);
}

fn sort_level(notes: &mut [Note], level: NoteSort, default: NoteSort) {
    notes.sort_by(|a, b| compare_notes(a, b, level));
    for note in notes.iter_mut() {
        let child_sort = note.sort().unwrap_or(default);
        sort_level(note.children_mut(), child_sort, default);
    }
}

fn compare_notes(a: &Note, b: &Note, sort: NoteSort) -> Ordering {
    let updated = |n: &Note| n.date_updated().unwrap_or_else(|| n.date_created());
    let ordering = match sort {
        NoteSort::Alphanumeric => compare_alphanumeric(a.name(), b.name()),
        NoteSort::AlphanumericReversed => compare_alphanumeric(b.name(), a.name()),
        NoteSort::DateCreated => a.date_created().cmp(&b.date_created()),
        NoteSort::DateCreatedReversed => b.date_created().cmp(&a.date_created()),
        NoteSort::DateUpdated => updated(a).cmp(&updated(b)),
        NoteSort::DateUpdatedReversed => updated(b).cmp(&updated(a)),
    };
    ordering.then_with(|| a.id().cmp(b.id()))
}

/// Case-insensitive comparison where digit runs compare by numeric value,
/// so "note 2" sorts before "note 10".
pub fn compare_alphanumeric(a: &str, b: &str) -> Ordering {
    let a_chunks = chunks(a);
    let b_chunks = chunks(b);

    for (x, y) in a_chunks.iter().zip(b_chunks.iter()) {
        let ordering = match (x, y) {
            (Chunk::Digits(x), Chunk::Digits(y)) => {
                let x = x.trim_start_matches('0');
                let y = y.trim_start_matches('0');
                x.len().cmp(&y.len()).then_with(|| x.cmp(y))
            }
            (Chunk::Text(x), Chunk::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    a_chunks.len().cmp(&b_chunks.len())
}

enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = None;

    for (i, c) in s.char_indices() {
        let is_digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                out.push(make_chunk(&s[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }
    if let Some(prev) = in_digits {
        out.push(make_chunk(&s[start..], prev));
    }
    out
}

fn make_chunk(s: &str, digits: bool) -> Chunk<'_> {
    if digits {
        Chunk::Digits(s)
    } else {
        Chunk::Text(s)
    }
}
