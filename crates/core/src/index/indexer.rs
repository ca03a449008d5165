//! The single writer that owns the published index snapshot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use crate::config::LinkConfig;
use crate::store::{NoteChange, NoteStore};

use super::snapshot::IndexSnapshot;
use super::types::{HydrateOutcome, ProgressCallback};

/// A change event recorded while a hydration is in flight.
#[derive(Debug, Clone)]
enum Mutation {
    Upsert { path: String, text: String },
    Remove { path: String },
}

#[derive(Debug, Default)]
struct HydrationState {
    /// Bumped by every hydrate or cancel request; the latest one wins.
    generation: u64,
    in_flight: bool,
    journal: Vec<Mutation>,
}

/// Owns the note store and backlink index and serializes every mutation.
///
/// Readers call [`Indexer::snapshot`] and get an immutable `Arc` that no
/// later mutation touches. Single-file mutations copy the snapshot only while
/// a reader still holds the previous one. That copy shares notes and backlink
/// sets by `Arc`, so it costs a pointer per note and per key; only the sets
/// the change touches are duplicated.
#[derive(Debug)]
pub struct Indexer {
    config: LinkConfig,
    current: RwLock<Arc<IndexSnapshot>>,
    hydration: Mutex<HydrationState>,
}

impl Indexer {
    pub fn new(config: LinkConfig) -> Self {
        let empty = IndexSnapshot::empty(&config);
        Self {
            config,
            current: RwLock::new(Arc::new(empty)),
            hydration: Mutex::new(HydrationState::default()),
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        Arc::clone(&self.read())
    }

    /// Rebuild the index from scratch and publish it atomically.
    ///
    /// Files are parsed first, then indexed, then published. Between files the
    /// request checks whether a newer hydrate (or [`Indexer::cancel_hydration`])
    /// replaced it and abandons its work if so. Change notifications received
    /// meanwhile are replayed onto the new snapshot before it is published.
    pub fn hydrate(
        &self,
        files: Vec<(String, String)>,
        progress: Option<ProgressCallback<'_>>,
    ) -> HydrateOutcome {
        let start = Instant::now();
        let generation = {
            let mut state = self.lock_hydration();
            state.generation += 1;
            state.in_flight = true;
            state.journal.clear();
            state.generation
        };

        let total = files.len();
        let mut store = NoteStore::new(&self.config);
        for (i, (path, text)) in files.iter().enumerate() {
            if self.is_superseded(generation) {
                tracing::debug!("Hydration {} superseded after {} of {} files", generation, i, total);
                return HydrateOutcome::Superseded;
            }
            store.upsert(path, text);
            if let Some(cb) = progress {
                cb(i + 1, total, path.as_str());
            }
        }

        let mut snapshot = IndexSnapshot::from_store(store, &self.config);

        let mut state = self.lock_hydration();
        if state.generation != generation {
            tracing::debug!("Hydration {} superseded before publishing", generation);
            return HydrateOutcome::Superseded;
        }
        let replayed = state.journal.len();
        for mutation in state.journal.drain(..) {
            match mutation {
                Mutation::Upsert { path, text } => snapshot.apply_upsert(&path, &text),
                Mutation::Remove { path } => snapshot.apply_remove(&path),
            };
        }
        state.in_flight = false;

        let stats = snapshot.stats();
        *self.write() = Arc::new(snapshot);
        drop(state);

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Indexed {} notes ({} links, {} dangling, {} replayed changes) in {}ms",
            stats.notes,
            stats.links,
            stats.dangling,
            replayed,
            duration_ms
        );
        HydrateOutcome::Published { stats, duration_ms }
    }

    /// Abandon any in-flight hydration. The published snapshot is kept.
    pub fn cancel_hydration(&self) {
        let mut state = self.lock_hydration();
        state.generation += 1;
        state.in_flight = false;
        state.journal.clear();
    }

    /// A note's content changed.
    pub fn notify_changed(&self, path: &str, text: &str) -> NoteChange {
        self.mutate(Mutation::Upsert { path: path.to_string(), text: text.to_string() })
    }

    /// A note was created.
    pub fn notify_created(&self, path: &str, text: &str) -> NoteChange {
        self.notify_changed(path, text)
    }

    /// A note was deleted. Unknown paths are ignored.
    pub fn notify_deleted(&self, path: &str) -> NoteChange {
        self.mutate(Mutation::Remove { path: path.to_string() })
    }

    /// Apply a mutation to the live snapshot, journaling it for an in-flight hydrate.
    fn mutate(&self, mutation: Mutation) -> NoteChange {
        let mut state = self.lock_hydration();
        if state.in_flight {
            state.journal.push(mutation.clone());
        }

        let mut current = self.write();
        let snapshot = Arc::make_mut(&mut current);
        match &mutation {
            Mutation::Upsert { path, text } => snapshot.apply_upsert(path, text),
            Mutation::Remove { path } => snapshot.apply_remove(path),
        }
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.lock_hydration().generation != generation
    }

    fn lock_hydration(&self) -> MutexGuard<'_, HydrationState> {
        self.hydration.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> RwLockReadGuard<'_, Arc<IndexSnapshot>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Arc<IndexSnapshot>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn files(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries.iter().map(|(p, t)| (p.to_string(), t.to_string())).collect()
    }

    #[test]
    fn test_queries_before_hydrate_see_empty_index() {
        let indexer = Indexer::new(LinkConfig::default());
        let snap = indexer.snapshot();

        assert!(snap.is_empty());
        assert_eq!(snap.definition_for("apple"), None);
        assert!(snap.references_for("apple.md").is_empty());
    }

    #[test]
    fn test_changes_before_hydrate_use_empty_store() {
        let indexer = Indexer::new(LinkConfig::default());
        assert_eq!(indexer.notify_changed("apple.md", ""), NoteChange::Created);
        assert_eq!(indexer.snapshot().len(), 1);
    }

    #[test]
    fn test_hydrate_publishes() {
        let indexer = Indexer::new(LinkConfig::default());
        let outcome =
            indexer.hydrate(files(&[("apple.md", ""), ("banana.md", "[[apple]] [[x]]")]), None);

        match outcome {
            HydrateOutcome::Published { stats, .. } => {
                assert_eq!(stats.notes, 2);
                assert_eq!(stats.links, 2);
                assert_eq!(stats.dangling, 1);
            }
            other => panic!("expected Published, got {other:?}"),
        }
        assert_eq!(indexer.snapshot().references_for("apple.md").len(), 1);
    }

    #[test]
    fn test_hydrate_discards_previous_notes() {
        let indexer = Indexer::new(LinkConfig::default());
        indexer.notify_created("stale.md", "[[apple]]");
        indexer.hydrate(files(&[("apple.md", "")]), None);

        let snap = indexer.snapshot();
        assert!(snap.note("stale.md").is_none());
        assert!(snap.references_for("apple.md").is_empty());
    }

    #[test]
    fn test_snapshots_are_isolated_from_later_changes() {
        let indexer = Indexer::new(LinkConfig::default());
        indexer.hydrate(files(&[("apple.md", ""), ("banana.md", "[[apple]]")]), None);

        let before = indexer.snapshot();
        indexer.notify_changed("banana.md", "nothing");

        assert_eq!(before.references_for("apple.md").len(), 1);
        assert!(indexer.snapshot().references_for("apple.md").is_empty());
    }

    #[test]
    fn test_newer_hydrate_wins() {
        let indexer = Indexer::new(LinkConfig::default());
        let fired = Cell::new(false);

        let restart = |_: usize, _: usize, _: &str| {
            if !fired.replace(true) {
                let inner = indexer.hydrate(files(&[("winner.md", "")]), None);
                assert!(matches!(inner, HydrateOutcome::Published { .. }));
            }
        };
        let outer = indexer.hydrate(files(&[("a.md", ""), ("b.md", "")]), Some(&restart));

        assert_eq!(outer, HydrateOutcome::Superseded);
        let snap = indexer.snapshot();
        assert_eq!(snap.len(), 1);
        assert!(snap.note("winner.md").is_some());
    }

    #[test]
    fn test_cancel_keeps_published_snapshot() {
        let indexer = Indexer::new(LinkConfig::default());
        indexer.hydrate(files(&[("kept.md", "")]), None);

        let cancel = |_: usize, _: usize, _: &str| indexer.cancel_hydration();
        let outcome = indexer.hydrate(files(&[("a.md", ""), ("b.md", "")]), Some(&cancel));

        assert_eq!(outcome, HydrateOutcome::Superseded);
        assert!(indexer.snapshot().note("kept.md").is_some());
    }

    #[test]
    fn test_changes_during_hydrate_are_replayed() {
        let indexer = Indexer::new(LinkConfig::default());

        let edit = |current: usize, _: usize, _: &str| {
            if current == 1 {
                indexer.notify_changed("banana.md", "[[apple]] [[cherry]]");
                indexer.notify_created("cherry.md", "");
                indexer.notify_deleted("gone.md");
            }
        };
        let outcome = indexer.hydrate(
            files(&[("apple.md", ""), ("banana.md", "[[apple]]"), ("gone.md", "")]),
            Some(&edit),
        );

        assert!(matches!(outcome, HydrateOutcome::Published { .. }));
        let snap = indexer.snapshot();
        assert!(snap.note("gone.md").is_none());
        assert_eq!(snap.references_for("cherry.md").len(), 1);
        assert_eq!(snap.references_for("apple.md").len(), 1);
        assert!(snap.is_consistent());
    }
}
