//! Resolution of normalized link keys to candidate notes.
//!
//! Matching is tiered; a tier is only consulted when every earlier tier is
//! empty:
//! 1. exact title match,
//! 2. path-suffix match (`[[folder/note]]`),
//! 3. title prefix or substring match.
//!
//! Within a tier the shorter path wins, then the lexicographically smaller one,
//! so results never depend on store iteration order.

use serde::Serialize;

use crate::links::Normalizer;
use crate::store::{Note, NoteSource};

/// How a candidate matched the key. Lower tiers rank higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchTier {
    Exact,
    PathSuffix,
    Fuzzy,
}

impl MatchTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::PathSuffix => "path-suffix",
            Self::Fuzzy => "fuzzy",
        }
    }
}

/// A note that a key may refer to.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub note: &'a Note,
    pub tier: MatchTier,
}

/// Best tier at which `note` matches `key`, if any.
pub fn match_tier(note: &Note, key: &str) -> Option<MatchTier> {
    if key.is_empty() {
        return None;
    }
    if note.title_key == key {
        Some(MatchTier::Exact)
    } else if note.path_key == key
        || (note.path_key.ends_with(key)
            && note.path_key[..note.path_key.len() - key.len()].ends_with('/'))
    {
        Some(MatchTier::PathSuffix)
    } else if note.title_key.contains(key) {
        Some(MatchTier::Fuzzy)
    } else {
        None
    }
}

/// Resolves keys against a [`NoteSource`].
pub struct Resolver<'a, S: NoteSource> {
    source: &'a S,
    normalizer: Normalizer,
    default_extension: &'a str,
}

impl<'a, S: NoteSource> Resolver<'a, S> {
    pub fn new(source: &'a S, normalizer: Normalizer, default_extension: &'a str) -> Self {
        Self { source, normalizer, default_extension }
    }

    pub fn source(&self) -> &'a S {
        self.source
    }

    /// Ranked candidates for a normalized key. Empty means dangling.
    pub fn resolve(&self, key: &str) -> Vec<Candidate<'a>> {
        if key.is_empty() {
            return Vec::new();
        }

        let exact = self.source.notes_titled(key);
        if !exact.is_empty() {
            return ranked(exact, MatchTier::Exact);
        }

        let mut best: Option<MatchTier> = None;
        let mut found = Vec::new();
        for note in self.source.notes() {
            let Some(tier) = match_tier(note, key) else { continue };
            match best {
                Some(b) if tier > b => continue,
                Some(b) if tier == b => {}
                _ => {
                    found.clear();
                    best = Some(tier);
                }
            }
            found.push(note);
        }

        best.map(|tier| ranked(found, tier)).unwrap_or_default()
    }

    /// Top-ranked note for a normalized key.
    pub fn best(&self, key: &str) -> Option<&'a Note> {
        self.resolve(key).first().map(|c| c.note)
    }

    /// Path of the note a raw label resolves to, or the path a new note for
    /// that label should be created at. `None` for blank labels.
    pub fn resolve_or_synthesize(&self, label: &str) -> Option<String> {
        let normalized = self.normalizer.normalize(label);
        if let Some(note) = self.best(&normalized.key) {
            return Some(note.path.clone());
        }
        synthesize_path(&normalized.display, self.normalizer.slug(), self.default_extension)
    }
}

/// File path for a note created from a label's display form.
///
/// Lowercased, whitespace replaced by the slug character, default extension
/// appended. Normalizing the result gives back the label's key.
pub fn synthesize_path(display: &str, slug: Option<char>, extension: &str) -> Option<String> {
    if display.is_empty() || display.ends_with('/') {
        return None;
    }

    let stem = display.to_lowercase();
    let stem = match slug {
        Some(c) => stem.replace(' ', &c.to_string()),
        None => stem,
    };
    Some(format!("{}.{}", stem, extension.trim_start_matches('.')))
}

fn ranked(mut notes: Vec<&Note>, tier: MatchTier) -> Vec<Candidate<'_>> {
    notes.sort_by(|a, b| {
        a.path
            .chars()
            .count()
            .cmp(&b.path.chars().count())
            .then_with(|| a.path.cmp(&b.path))
    });
    notes.into_iter().map(|note| Candidate { note, tier }).collect()
}
