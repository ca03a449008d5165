//! Authoritative mapping from note path to parsed note.
//!
//! Every mutation returns a [`ReferenceDelta`] so derived indices can be
//! updated from the difference instead of being rebuilt.

pub mod note;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use crate::config::LinkConfig;
use crate::links::{Normalizer, Reference, ReferenceParser};

pub use note::{Note, ParseStatus, normalize_path};

/// Read interface over a set of notes.
///
/// Resolution only depends on this trait, so an alternate backing store can
/// be used without touching the matching policy.
pub trait NoteSource {
    /// Note stored at a normalized path.
    fn note(&self, path: &str) -> Option<&Note>;

    /// Notes whose title key equals `title_key`.
    fn notes_titled(&self, title_key: &str) -> Vec<&Note>;

    /// All notes, in no particular order.
    fn notes(&self) -> impl Iterator<Item = &Note>;
}

/// What a store mutation did to the note at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteChange {
    Created,
    Updated,
    /// Same text as before; nothing changed.
    Unchanged,
    Removed,
    /// Removal of a path that was not indexed.
    Missing,
}

/// References that disappeared from and appeared in a note after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDelta {
    pub path: String,
    pub change: NoteChange,
    pub removed: Vec<Reference>,
    pub added: Vec<Reference>,
}

impl ReferenceDelta {
    fn empty(path: String, change: NoteChange) -> Self {
        Self { path, change, removed: Vec::new(), added: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// In-memory note store.
#[derive(Debug, Clone)]
pub struct NoteStore {
    notes: HashMap<String, Arc<Note>>,
    by_title: HashMap<String, BTreeSet<String>>,
    parser: ReferenceParser,
    normalizer: Normalizer,
}

impl NoteStore {
    pub fn new(cfg: &LinkConfig) -> Self {
        Self {
            notes: HashMap::new(),
            by_title: HashMap::new(),
            parser: ReferenceParser::new(cfg),
            normalizer: Normalizer::new(cfg),
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Discard all notes and parse every supplied file.
    /// Returns the number of notes stored.
    pub fn hydrate<I, P, T>(&mut self, files: I) -> usize
    where
        I: IntoIterator<Item = (P, T)>,
        P: AsRef<str>,
        T: AsRef<str>,
    {
        self.notes.clear();
        self.by_title.clear();
        for (path, text) in files {
            self.upsert(path.as_ref(), text.as_ref());
        }
        self.notes.len()
    }

    /// Replace (or create) the note at `path` and return the reference delta.
    pub fn upsert(&mut self, path: &str, text: &str) -> ReferenceDelta {
        let path = normalize_path(path);

        if let Some(existing) = self.notes.get(&path)
            && *existing.raw_text == *text
        {
            return ReferenceDelta::empty(path, NoteChange::Unchanged);
        }

        let note = Note::analyze(&path, text, &self.parser, &self.normalizer);
        let added_refs = note.references.clone();
        let title_key = note.title_key.clone();

        match self.notes.insert(path.clone(), Arc::new(note)) {
            Some(old) => {
                let (removed, added) = diff(&old.references, &added_refs);
                ReferenceDelta { path, change: NoteChange::Updated, removed, added }
            }
            None => {
                self.by_title.entry(title_key).or_default().insert(path.clone());
                ReferenceDelta {
                    path,
                    change: NoteChange::Created,
                    removed: Vec::new(),
                    added: added_refs,
                }
            }
        }
    }

    /// Delete the note at `path`; all its references come back as removed.
    pub fn remove(&mut self, path: &str) -> ReferenceDelta {
        let path = normalize_path(path);

        let Some(old) = self.notes.remove(&path) else {
            return ReferenceDelta::empty(path, NoteChange::Missing);
        };

        if let Some(paths) = self.by_title.get_mut(&old.title_key) {
            paths.remove(&path);
            if paths.is_empty() {
                self.by_title.remove(&old.title_key);
            }
        }

        ReferenceDelta {
            path,
            change: NoteChange::Removed,
            removed: old.references.clone(),
            added: Vec::new(),
        }
    }
}

impl NoteSource for NoteStore {
    fn note(&self, path: &str) -> Option<&Note> {
        self.notes.get(path).map(|n| n.as_ref())
    }

    fn notes_titled(&self, title_key: &str) -> Vec<&Note> {
        self.by_title
            .get(title_key)
            .map(|paths| paths.iter().filter_map(|p| self.note(p)).collect())
            .unwrap_or_default()
    }

    fn notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.values().map(|n| n.as_ref())
    }
}

/// Structural set difference between two reference lists.
fn diff(old: &[Reference], new: &[Reference]) -> (Vec<Reference>, Vec<Reference>) {
    let old_set: HashSet<&Reference> = old.iter().collect();
    let new_set: HashSet<&Reference> = new.iter().collect();

    let removed = old.iter().filter(|r| !new_set.contains(r)).cloned().collect();
    let added = new.iter().filter(|r| !old_set.contains(r)).cloned().collect();
    (removed, added)
}
