//! Inverted reference index: target note → references pointing at it.
//!
//! Resolution is memoized per normalized key. The memo only goes stale when
//! the set of notes changes, so [`BacklinkIndex::note_added`] and
//! [`BacklinkIndex::note_removed`] re-resolve exactly the keys a created or
//! deleted note can affect. An incrementally maintained index always equals
//! [`BacklinkIndex::build`] over the same store.
//!
//! Entry sets are shared between clones and copied on first write, so cloning
//! the index costs one pointer per key and an edit copies only the sets it
//! touches.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;

use crate::links::{Reference, TextRange};
use crate::resolve::{Resolver, match_tier};
use crate::store::{Note, NoteSource};

/// One inbound reference, identified by its source note and position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Backlink {
    pub source_path: String,
    pub range: TextRange,
    pub line: u32,
}

impl From<&Reference> for Backlink {
    fn from(r: &Reference) -> Self {
        Self { source_path: r.source_path.clone(), range: r.range, line: r.line }
    }
}

type Entries = Arc<BTreeSet<Backlink>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BacklinkIndex {
    /// Link key → resolved target path (`None` while dangling).
    resolved: HashMap<String, Option<String>>,
    /// Link key → live references carrying that key.
    by_key: HashMap<String, Entries>,
    /// Target path → references resolving to it.
    by_target: HashMap<String, Entries>,
    /// Tag key → tag occurrences.
    tags: HashMap<String, Entries>,
}

impl BacklinkIndex {
    /// Build the index from every note visible to `resolver`.
    pub fn build<S: NoteSource>(resolver: &Resolver<'_, S>) -> Self {
        let mut index = Self::default();
        for note in resolver.source().notes() {
            index.insert_all(resolver, &note.references);
        }
        index
    }

    /// Retract `removed` (under the targets they resolved to) and insert
    /// `added` (resolved now).
    pub fn apply_delta<S: NoteSource>(
        &mut self,
        resolver: &Resolver<'_, S>,
        removed: &[Reference],
        added: &[Reference],
    ) {
        for r in removed {
            self.retract(r);
        }
        self.insert_all(resolver, added);
    }

    /// Re-resolve every indexed key that a newly created note matches.
    pub fn note_added<S: NoteSource>(&mut self, resolver: &Resolver<'_, S>, note: &Note) {
        let keys: Vec<String> = self
            .resolved
            .keys()
            .filter(|key| match_tier(note, key).is_some())
            .cloned()
            .collect();
        for key in keys {
            self.retarget(resolver, &key);
        }
    }

    /// Re-resolve every key that pointed at a deleted note.
    pub fn note_removed<S: NoteSource>(&mut self, resolver: &Resolver<'_, S>, path: &str) {
        let keys: Vec<String> = self
            .resolved
            .iter()
            .filter(|(_, target)| target.as_deref() == Some(path))
            .map(|(key, _)| key.clone())
            .collect();
        for key in keys {
            self.retarget(resolver, &key);
        }
        self.by_target.remove(path);
    }

    /// References resolving to `path`, ordered by source path then position.
    pub fn backlinks_for(&self, path: &str) -> Vec<Backlink> {
        self.by_target.get(path).map(|set| set.iter().cloned().collect()).unwrap_or_default()
    }

    /// Current target of a link key. `None` for dangling or unknown keys.
    pub fn target_of(&self, key: &str) -> Option<&str> {
        self.resolved.get(key).and_then(|t| t.as_deref())
    }

    /// Every target with its inbound reference count, ordered by path.
    pub fn targets(&self) -> Vec<(&str, usize)> {
        let mut targets: Vec<_> =
            self.by_target.iter().map(|(path, set)| (path.as_str(), set.len())).collect();
        targets.sort();
        targets
    }

    /// Occurrences of a tag key.
    pub fn tagged(&self, key: &str) -> Vec<Backlink> {
        self.tags.get(key).map(|set| set.iter().cloned().collect()).unwrap_or_default()
    }

    /// Every tag key with its occurrence count, ordered by key.
    pub fn tags(&self) -> Vec<(&str, usize)> {
        let mut tags: Vec<_> =
            self.tags.iter().map(|(key, set)| (key.as_str(), set.len())).collect();
        tags.sort();
        tags
    }

    fn insert_all<S: NoteSource>(&mut self, resolver: &Resolver<'_, S>, refs: &[Reference]) {
        for r in refs {
            let entry = Backlink::from(r);
            let key = &r.normalized_key;

            if !r.kind.is_link() {
                Arc::make_mut(self.tags.entry(key.clone()).or_default()).insert(entry);
                continue;
            }

            let target = match self.resolved.get(key) {
                Some(target) => target.clone(),
                None => {
                    let target = resolver.best(key).map(|n| n.path.clone());
                    self.resolved.insert(key.clone(), target.clone());
                    target
                }
            };
            if let Some(target) = target {
                Arc::make_mut(self.by_target.entry(target).or_default()).insert(entry.clone());
            }
            Arc::make_mut(self.by_key.entry(key.clone()).or_default()).insert(entry);
        }
    }

    fn retract(&mut self, r: &Reference) {
        let entry = Backlink::from(r);
        let key = &r.normalized_key;

        if !r.kind.is_link() {
            remove_entry(&mut self.tags, key, &entry);
            return;
        }

        if let Some(target) = self.resolved.get(key).cloned().flatten() {
            remove_entry(&mut self.by_target, &target, &entry);
        }
        remove_entry(&mut self.by_key, key, &entry);
        if !self.by_key.contains_key(key) {
            self.resolved.remove(key);
        }
    }

    fn retarget<S: NoteSource>(&mut self, resolver: &Resolver<'_, S>, key: &str) {
        let new = resolver.best(key).map(|n| n.path.clone());
        let old = self.resolved.insert(key.to_string(), new.clone()).flatten();
        if old == new {
            return;
        }

        let entries: Vec<Backlink> =
            self.by_key.get(key).map(|set| set.iter().cloned().collect()).unwrap_or_default();
        if let Some(old) = old {
            for entry in &entries {
                remove_entry(&mut self.by_target, &old, entry);
            }
        }
        if let Some(new) = new {
            Arc::make_mut(self.by_target.entry(new).or_default()).extend(entries);
        }
    }
}

fn remove_entry(map: &mut HashMap<String, Entries>, key: &str, entry: &Backlink) {
    let Some(set) = map.get_mut(key) else { return };
    if !set.contains(entry) {
        return;
    }
    if set.len() == 1 {
        map.remove(key);
    } else {
        Arc::make_mut(set).remove(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinkConfig;
    use crate::store::NoteStore;

    struct Fixture {
        store: NoteStore,
        index: BacklinkIndex,
    }

    impl Fixture {
        fn new(files: &[(&str, &str)]) -> Self {
            let mut store = NoteStore::new(&LinkConfig::default());
            store.hydrate(files.iter().copied());
            let index = BacklinkIndex::build(&Resolver::new(&store, *store.normalizer(), "md"));
            Self { store, index }
        }

        fn upsert(&mut self, path: &str, text: &str) {
            let delta = self.store.upsert(path, text);
            let resolver = Resolver::new(&self.store, *self.store.normalizer(), "md");
            if delta.change == crate::store::NoteChange::Created {
                let note = self.store.note(&delta.path).unwrap();
                self.index.note_added(&resolver, note);
            }
            self.index.apply_delta(&resolver, &delta.removed, &delta.added);
        }

        fn remove(&mut self, path: &str) {
            let delta = self.store.remove(path);
            let resolver = Resolver::new(&self.store, *self.store.normalizer(), "md");
            self.index.apply_delta(&resolver, &delta.removed, &delta.added);
            self.index.note_removed(&resolver, &delta.path);
        }

        fn rebuilt(&self) -> BacklinkIndex {
            BacklinkIndex::build(&Resolver::new(&self.store, *self.store.normalizer(), "md"))
        }

        fn sources(&self, path: &str) -> Vec<String> {
            self.index.backlinks_for(path).into_iter().map(|b| b.source_path).collect()
        }
    }

    #[test]
    fn test_build_inverts_links() {
        let fx = Fixture::new(&[
            ("apple.md", ""),
            ("banana.md", "See [[apple]] and [[Cherry]]."),
        ]);

        assert_eq!(fx.sources("apple.md"), vec!["banana.md"]);
        assert_eq!(fx.index.target_of("cherry"), None);
        assert_eq!(fx.index.targets(), vec![("apple.md", 1)]);
    }

    #[test]
    fn test_backlinks_ordered_by_source() {
        let fx = Fixture::new(&[
            ("apple.md", ""),
            ("z.md", "[[apple]]"),
            ("a.md", "[[apple]] and again [[Apple]]"),
        ]);

        assert_eq!(fx.sources("apple.md"), vec!["a.md", "a.md", "z.md"]);
    }

    #[test]
    fn test_created_note_picks_up_dangling_links() {
        let mut fx = Fixture::new(&[("banana.md", "[[Cherry]]")]);
        fx.upsert("cherry.md", "");

        assert_eq!(fx.sources("cherry.md"), vec!["banana.md"]);
        assert_eq!(fx.index, fx.rebuilt());
    }

    #[test]
    fn test_created_note_takes_over_weaker_match() {
        let mut fx = Fixture::new(&[("apple-pie.md", ""), ("banana.md", "[[apple]]")]);
        assert_eq!(fx.sources("apple-pie.md"), vec!["banana.md"]);

        fx.upsert("apple.md", "");

        assert!(fx.sources("apple-pie.md").is_empty());
        assert_eq!(fx.sources("apple.md"), vec!["banana.md"]);
        assert_eq!(fx.index, fx.rebuilt());
    }

    #[test]
    fn test_removed_note_falls_back() {
        let mut fx = Fixture::new(&[
            ("apple.md", ""),
            ("apple-pie.md", ""),
            ("banana.md", "[[apple]]"),
        ]);
        fx.remove("apple.md");

        assert!(fx.sources("apple.md").is_empty());
        assert_eq!(fx.sources("apple-pie.md"), vec!["banana.md"]);
        assert_eq!(fx.index, fx.rebuilt());
    }

    #[test]
    fn test_removed_source_retracts_entries() {
        let mut fx = Fixture::new(&[("apple.md", ""), ("banana.md", "[[apple]] #fruit")]);
        fx.remove("banana.md");

        assert!(fx.sources("apple.md").is_empty());
        assert!(fx.index.tags().is_empty());
        assert_eq!(fx.index, fx.rebuilt());
    }

    #[test]
    fn test_tags_are_indexed_separately() {
        let fx = Fixture::new(&[("a.md", "#fruit #Fruit"), ("b.md", "#veg")]);

        assert_eq!(fx.index.tags(), vec![("fruit", 2), ("veg", 1)]);
        assert_eq!(fx.index.tagged("fruit").len(), 2);
        assert!(fx.index.targets().is_empty());
    }

    #[test]
    fn test_edit_sequence_matches_rebuild() {
        let mut fx = Fixture::new(&[("apple.md", ""), ("banana.md", "[[apple]] [[cherry]]")]);

        fx.upsert("banana.md", "[[apple]] only");
        fx.upsert("cherry.md", "[[banana]] [[apple]]");
        fx.upsert("banana.md", "[[cherry]] [[apple]] [[date]]");
        fx.remove("apple.md");
        fx.upsert("date.md", "[[apple]]");
        fx.remove("ghost.md");
        fx.upsert("apple.md", "[[cherry]]");

        assert_eq!(fx.index, fx.rebuilt());
        assert_eq!(fx.sources("apple.md"), vec!["banana.md", "cherry.md", "date.md"]);
    }

    #[test]
    fn test_clone_shares_untouched_sets() {
        let mut fx = Fixture::new(&[
            ("apple.md", ""),
            ("pear.md", ""),
            ("banana.md", "[[apple]] [[pear]] #fruit"),
        ]);
        let before = fx.index.clone();

        fx.upsert("cherry.md", "[[apple]]");

        assert!(Arc::ptr_eq(&before.by_target["pear.md"], &fx.index.by_target["pear.md"]));
        assert!(Arc::ptr_eq(&before.tags["fruit"], &fx.index.tags["fruit"]));
        assert!(!Arc::ptr_eq(&before.by_target["apple.md"], &fx.index.by_target["apple.md"]));
        assert_eq!(before.backlinks_for("apple.md").len(), 1);
        assert_eq!(fx.sources("apple.md"), vec!["banana.md", "cherry.md"]);
    }
}
