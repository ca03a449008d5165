//! Immutable view of the index and the query operations over it.

use crate::backlinks::{Backlink, BacklinkIndex};
use crate::config::LinkConfig;
use crate::links::{Normalizer, Reference, TextRange, preview_label};
use crate::resolve::Resolver;
use crate::store::{Note, NoteChange, NoteSource, NoteStore, ParseStatus, normalize_path};

use super::types::{Completion, Definition, IndexStats, Location, TagSummary};

/// A consistent state of the note store and its backlink index.
///
/// Snapshots handed out by [`super::Indexer`] are never mutated; later changes
/// produce a new snapshot.
#[derive(Debug, Clone)]
pub struct IndexSnapshot {
    config: LinkConfig,
    normalizer: Normalizer,
    store: NoteStore,
    backlinks: BacklinkIndex,
}

impl IndexSnapshot {
    pub fn empty(cfg: &LinkConfig) -> Self {
        Self::from_store(NoteStore::new(cfg), cfg)
    }

    /// Index a fully parsed store.
    pub fn from_store(store: NoteStore, cfg: &LinkConfig) -> Self {
        let normalizer = Normalizer::new(cfg);
        let backlinks =
            BacklinkIndex::build(&Resolver::new(&store, normalizer, &cfg.default_file_extension));
        Self { config: cfg.clone(), normalizer, store, backlinks }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    fn resolver(&self) -> Resolver<'_, NoteStore> {
        Resolver::new(&self.store, self.normalizer, &self.config.default_file_extension)
    }

    pub(crate) fn apply_upsert(&mut self, path: &str, text: &str) -> NoteChange {
        let delta = self.store.upsert(path, text);
        if delta.change == NoteChange::Unchanged {
            return delta.change;
        }

        let resolver =
            Resolver::new(&self.store, self.normalizer, &self.config.default_file_extension);
        if delta.change == NoteChange::Created
            && let Some(note) = self.store.note(&delta.path)
        {
            self.backlinks.note_added(&resolver, note);
        }
        self.backlinks.apply_delta(&resolver, &delta.removed, &delta.added);

        tracing::debug!(
            "Indexed {} ({:?}): -{} +{} references",
            delta.path,
            delta.change,
            delta.removed.len(),
            delta.added.len()
        );
        delta.change
    }

    pub(crate) fn apply_remove(&mut self, path: &str) -> NoteChange {
        let delta = self.store.remove(path);
        if delta.change == NoteChange::Missing {
            tracing::debug!("Ignoring removal of unknown note {}", delta.path);
            return delta.change;
        }

        let resolver =
            Resolver::new(&self.store, self.normalizer, &self.config.default_file_extension);
        self.backlinks.apply_delta(&resolver, &delta.removed, &delta.added);
        self.backlinks.note_removed(&resolver, &delta.path);

        tracing::debug!("Removed {} and {} references", delta.path, delta.removed.len());
        delta.change
    }

    /// Number of notes.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn note(&self, path: &str) -> Option<&Note> {
        self.store.note(&normalize_path(path))
    }

    /// All notes ordered by path.
    pub fn notes(&self) -> Vec<&Note> {
        let mut notes: Vec<_> = self.store.notes().collect();
        notes.sort_by(|a, b| a.path.cmp(&b.path));
        notes
    }

    /// Best definition for a label, if any note matches.
    pub fn definition_for(&self, label: &str) -> Option<Location> {
        self.resolver()
            .best(&self.normalizer.key(label))
            .map(|note| Location { path: note.path.clone(), range: TextRange::default() })
    }

    /// Every candidate for a label, best first.
    pub fn definitions_for(&self, label: &str) -> Vec<Definition> {
        self.resolver()
            .resolve(&self.normalizer.key(label))
            .into_iter()
            .map(|c| Definition {
                path: c.note.path.clone(),
                title: c.note.title.clone(),
                tier: c.tier,
            })
            .collect()
    }

    /// References resolving to the note at `path`.
    pub fn references_for(&self, path: &str) -> Vec<Backlink> {
        self.backlinks.backlinks_for(&normalize_path(path))
    }

    /// Notes whose title or path starts with the normalized partial label,
    /// shortest path first.
    pub fn completion_candidates_for(&self, partial: &str) -> Vec<Completion> {
        let prefix = self.normalizer.key(partial);
        let mut matches: Vec<&Note> = self
            .store
            .notes()
            .filter(|n| n.title_key.starts_with(&prefix) || n.path_key.starts_with(&prefix))
            .collect();
        matches.sort_by(|a, b| {
            a.path
                .chars()
                .count()
                .cmp(&b.path.chars().count())
                .then_with(|| a.path.cmp(&b.path))
        });
        matches
            .into_iter()
            .map(|n| Completion { path: n.path.clone(), title: n.title.clone() })
            .collect()
    }

    /// Path a label links to, or the path a note for it should be created at.
    pub fn resolve_or_synthesize(&self, label: &str) -> Option<String> {
        self.resolver().resolve_or_synthesize(label)
    }

    /// Label text for rendered previews.
    pub fn preview_label(&self, label: &str) -> String {
        preview_label(label, &self.config)
    }

    /// The reference under a cursor offset in a note.
    pub fn reference_at(&self, path: &str, offset: usize) -> Option<&Reference> {
        self.note(path)?.references.iter().find(|r| r.range.touches(offset))
    }

    /// Definition of the link under a cursor offset.
    pub fn definition_at(&self, path: &str, offset: usize) -> Option<Location> {
        let reference = self.reference_at(path, offset)?;
        if !reference.kind.is_link() {
            return None;
        }
        self.backlinks
            .target_of(&reference.normalized_key)
            .map(|target| Location { path: target.to_string(), range: TextRange::default() })
    }

    /// Every target with its inbound reference count, ordered by path.
    pub fn backlink_targets(&self) -> Vec<(String, usize)> {
        self.backlinks.targets().into_iter().map(|(p, n)| (p.to_string(), n)).collect()
    }

    /// Wikilinks that resolve to no note, ordered by source path and position.
    pub fn dangling_references(&self) -> Vec<&Reference> {
        self.notes()
            .into_iter()
            .flat_map(|n| n.links())
            .filter(|r| self.backlinks.target_of(&r.normalized_key).is_none())
            .collect()
    }

    /// Tags with occurrence counts, ordered by tag.
    pub fn tags(&self) -> Vec<TagSummary> {
        self.backlinks
            .tags()
            .into_iter()
            .map(|(tag, count)| TagSummary { tag: tag.to_string(), count })
            .collect()
    }

    /// Occurrences of a tag (with or without the leading `#`).
    pub fn tagged(&self, tag: &str) -> Vec<Backlink> {
        self.backlinks.tagged(&self.normalizer.key(tag.trim().trim_start_matches('#')))
    }

    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats { notes: self.store.len(), ..IndexStats::default() };
        for note in self.store.notes() {
            if note.status == ParseStatus::Unparseable {
                stats.unparseable += 1;
            }
            for r in &note.references {
                if !r.kind.is_link() {
                    stats.tags += 1;
                    continue;
                }
                stats.links += 1;
                if self.backlinks.target_of(&r.normalized_key).is_none() {
                    stats.dangling += 1;
                }
            }
        }
        stats
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.backlinks == BacklinkIndex::build(&self.resolver())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(files: &[(&str, &str)]) -> IndexSnapshot {
        let cfg = LinkConfig::default();
        let mut store = NoteStore::new(&cfg);
        store.hydrate(files.iter().copied());
        IndexSnapshot::from_store(store, &cfg)
    }

    #[test]
    fn test_completion_prefix_on_title_or_path() {
        let snap = snapshot(&[
            ("projects/apple-cart.md", ""),
            ("apple.md", ""),
            ("pineapple.md", ""),
            ("archive/old.md", ""),
        ]);

        let paths: Vec<_> =
            snap.completion_candidates_for("App").into_iter().map(|c| c.path).collect();
        assert_eq!(paths, vec!["apple.md", "projects/apple-cart.md"]);

        let paths: Vec<_> =
            snap.completion_candidates_for("arch").into_iter().map(|c| c.path).collect();
        assert_eq!(paths, vec!["archive/old.md"]);
    }

    #[test]
    fn test_completion_titles_are_display_form() {
        let snap = snapshot(&[("my-note.md", "")]);
        let completions = snap.completion_candidates_for("my n");

        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].title, "my note");
    }

    #[test]
    fn test_empty_partial_lists_everything() {
        let snap = snapshot(&[("b.md", ""), ("a.md", "")]);
        assert_eq!(snap.completion_candidates_for("").len(), 2);
    }

    #[test]
    fn test_reference_at_cursor() {
        let snap = snapshot(&[("apple.md", ""), ("banana.md", "See [[apple]] #fruit")]);

        let r = snap.reference_at("banana.md", 6).unwrap();
        assert_eq!(r.raw_label, "apple");
        assert_eq!(
            snap.definition_at("banana.md", 6).map(|l| l.path),
            Some("apple.md".to_string())
        );
        assert!(snap.reference_at("banana.md", 1).is_none());
        assert!(snap.definition_at("banana.md", 15).is_none());
    }

    #[test]
    fn test_stats_and_dangling() {
        let snap = snapshot(&[
            ("apple.md", "#fruit"),
            ("banana.md", "[[apple]] [[Cherry]] [[durian|d]]"),
            ("blob.md", "\0"),
        ]);

        let stats = snap.stats();
        assert_eq!(stats.notes, 3);
        assert_eq!(stats.unparseable, 1);
        assert_eq!(stats.links, 3);
        assert_eq!(stats.tags, 1);
        assert_eq!(stats.dangling, 2);

        let dangling: Vec<_> =
            snap.dangling_references().iter().map(|r| r.raw_label.clone()).collect();
        assert_eq!(dangling, vec!["Cherry", "durian"]);
    }

    #[test]
    fn test_tagged_accepts_hash_prefix() {
        let snap = snapshot(&[("a.md", "#Fruit"), ("b.md", "#fruit")]);

        assert_eq!(snap.tagged("#fruit").len(), 2);
        assert_eq!(snap.tags(), vec![TagSummary { tag: "fruit".into(), count: 2 }]);
    }

    #[test]
    fn test_preview_label_uses_config() {
        let snap = snapshot(&[]);
        assert_eq!(snap.preview_label("my-note.md"), "[[my note]]");
    }
}
