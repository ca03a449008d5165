//! Result types returned by index queries.

use serde::Serialize;

use crate::links::TextRange;
use crate::resolve::MatchTier;

/// A navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    pub range: TextRange,
}

/// One ranked answer to a definition lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub path: String,
    pub title: String,
    pub tier: MatchTier,
}

/// A completion suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub path: String,
    pub title: String,
}

/// A tag and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagSummary {
    pub tag: String,
    pub count: usize,
}

/// Counts describing an index snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Number of notes indexed.
    pub notes: usize,
    /// Number of notes indexed without references.
    pub unparseable: usize,
    /// Number of wikilinks (plain and piped).
    pub links: usize,
    /// Number of tag occurrences.
    pub tags: usize,
    /// Number of wikilinks with no target.
    pub dangling: usize,
}

/// Progress callback for hydration.
/// Parameters: (current, total, current_path)
pub type ProgressCallback<'a> = &'a dyn Fn(usize, usize, &str);

/// Result of a hydration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrateOutcome {
    /// The rebuilt index was published.
    Published { stats: IndexStats, duration_ms: u64 },
    /// A newer hydration or a cancellation replaced this one before it finished.
    Superseded,
}
