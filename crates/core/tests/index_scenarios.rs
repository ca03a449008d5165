use notegraph_core::config::LinkConfig;
use notegraph_core::index::{HydrateOutcome, IndexSnapshot, Indexer};
use rstest::{fixture, rstest};
use std::fmt::Write;

fn files(entries: &[(&str, &str)]) -> Vec<(String, String)> {
    entries.iter().map(|(p, t)| (p.to_string(), t.to_string())).collect()
}

#[fixture]
fn fruit() -> Indexer {
    let indexer = Indexer::new(LinkConfig::default());
    let outcome = indexer.hydrate(
        files(&[("apple.md", ""), ("banana.md", "See [[apple]] and [[Cherry]].")]),
        None,
    );
    assert!(matches!(outcome, HydrateOutcome::Published { .. }));
    indexer
}

fn sources(snap: &IndexSnapshot, path: &str) -> Vec<String> {
    snap.references_for(path).into_iter().map(|b| b.source_path).collect()
}

/// Every query answer must match an index rebuilt from the same notes.
fn assert_matches_rebuild(indexer: &Indexer) {
    let live = indexer.snapshot();
    let texts = live.notes().iter().map(|n| (n.path.clone(), n.raw_text.to_string())).collect();

    let rebuilt = Indexer::new(indexer.config().clone());
    rebuilt.hydrate(texts, None);
    let rebuilt = rebuilt.snapshot();

    assert_eq!(live.backlink_targets(), rebuilt.backlink_targets());
    for note in live.notes() {
        assert_eq!(live.references_for(&note.path), rebuilt.references_for(&note.path));
        for link in note.links() {
            assert_eq!(
                live.definition_for(&link.raw_label),
                rebuilt.definition_for(&link.raw_label),
                "link {:?} in {}",
                link.raw_label,
                note.path
            );
        }
    }
    assert_eq!(live.stats(), rebuilt.stats());
}

fn report(snap: &IndexSnapshot) -> String {
    let mut out = String::new();
    for (target, count) in snap.backlink_targets() {
        writeln!(out, "{target} ({count})").unwrap();
        for b in snap.references_for(&target) {
            writeln!(out, "  <- {}:{} [{}..{}]", b.source_path, b.line, b.range.start, b.range.end)
                .unwrap();
        }
    }
    for r in snap.dangling_references() {
        writeln!(out, "dangling {} in {}:{}", r.raw_label, r.source_path, r.line).unwrap();
    }
    out
}

#[rstest]
fn definitions_and_backlinks(fruit: Indexer) {
    let snap = fruit.snapshot();

    assert_eq!(snap.definition_for("apple").map(|l| l.path), Some("apple.md".to_string()));
    assert_eq!(snap.definition_for("Cherry"), None);
    assert_eq!(sources(&snap, "apple.md"), vec!["banana.md"]);
}

#[rstest]
fn removing_a_link_keeps_other_backlinks(fruit: Indexer) {
    fruit.notify_changed("banana.md", "See [[apple]] only.");
    let snap = fruit.snapshot();

    assert!(snap.dangling_references().is_empty());
    assert!(snap.references_for("cherry.md").is_empty());
    assert_eq!(snap.references_for("apple.md").len(), 1);
    assert_matches_rebuild(&fruit);
}

#[rstest]
fn creating_a_target_resolves_dangling_links(fruit: Indexer) {
    fruit.notify_created("cherry.md", "");
    let snap = fruit.snapshot();

    assert_eq!(snap.definition_for("Cherry").map(|l| l.path), Some("cherry.md".to_string()));
    assert_eq!(sources(&snap, "cherry.md"), vec!["banana.md"]);
    assert_matches_rebuild(&fruit);
}

#[rstest]
fn deleting_a_source_removes_its_backlinks(fruit: Indexer) {
    fruit.notify_deleted("banana.md");
    let snap = fruit.snapshot();

    assert!(snap.references_for("banana.md").is_empty());
    assert!(snap.references_for("apple.md").is_empty());
    assert!(snap.note("banana.md").is_none());
    assert_matches_rebuild(&fruit);
}

#[rstest]
fn deleting_a_target_leaves_links_dangling(fruit: Indexer) {
    fruit.notify_deleted("apple.md");
    let snap = fruit.snapshot();

    assert!(snap.references_for("apple.md").is_empty());
    assert_eq!(snap.definition_for("apple"), None);
    assert_eq!(snap.dangling_references().len(), 2);
    assert_matches_rebuild(&fruit);
}

#[rstest]
fn unknown_and_duplicate_events_are_ignored(fruit: Indexer) {
    let before = fruit.snapshot();
    fruit.notify_deleted("ghost.md");
    fruit.notify_changed("banana.md", "See [[apple]] and [[Cherry]].");

    assert_eq!(report(&before), report(&fruit.snapshot()));
}

#[rstest]
fn edit_sequence_matches_rebuild(fruit: Indexer) {
    fruit.notify_created("notes/apple.md", "[[banana]] [[cherry]]");
    fruit.notify_created("cherry pie.md", "[[apple]] #dessert");
    fruit.notify_changed("banana.md", "[[notes/apple]] [[pie]] [[Cherry|c]]");
    fruit.notify_deleted("apple.md");
    fruit.notify_created("cherry.md", "[[apple]]");
    fruit.notify_changed("notes/apple.md", "```\n[[banana]]\n```\n[[cherry pie]]");
    fruit.notify_deleted("cherry pie.md");

    assert_matches_rebuild(&fruit);
    let snap = fruit.snapshot();
    assert_eq!(snap.definition_for("apple").map(|l| l.path), Some("notes/apple.md".to_string()));
    assert!(snap.tags().is_empty());
}

#[test]
fn dated_notes_keep_their_own_backlinks() {
    let indexer = Indexer::new(LinkConfig::default());
    indexer.hydrate(
        files(&[("2024.01.15.md", ""), ("2024.02.01.md", ""), ("log.md", "[[2024.02.01]]")]),
        None,
    );
    let snap = indexer.snapshot();

    assert_eq!(
        snap.definition_for("2024.02.01").map(|l| l.path),
        Some("2024.02.01.md".to_string())
    );
    assert_eq!(sources(&snap, "2024.02.01.md"), vec!["log.md"]);
    assert!(snap.references_for("2024.01.15.md").is_empty());
}

#[test]
fn unparseable_note_is_still_a_target() {
    let indexer = Indexer::new(LinkConfig::default());
    indexer.hydrate(files(&[("blob.md", "[[apple]]\0"), ("apple.md", "[[blob]]")]), None);
    let snap = indexer.snapshot();

    assert_eq!(snap.stats().unparseable, 1);
    assert_eq!(sources(&snap, "blob.md"), vec!["apple.md"]);
    assert!(snap.references_for("apple.md").is_empty());
}

#[test]
fn backlink_report() {
    let indexer = Indexer::new(LinkConfig::default());
    indexer.hydrate(
        files(&[
            ("apple.md", ""),
            ("banana.md", "See [[apple]] and [[Cherry]].\nAlso [[fruit/apple|the apple]]."),
            ("fruit/apple.md", "Back to [[banana]]."),
        ]),
        None,
    );

    insta::assert_snapshot!(report(&indexer.snapshot()), @r"
    apple.md (1)
      <- banana.md:1 [4..13]
    banana.md (1)
      <- fruit/apple.md:1 [8..18]
    fruit/apple.md (1)
      <- banana.md:2 [35..60]
    dangling Cherry in banana.md:1
    ");
}

#[test]
fn snapshot_serializes_for_hosts() {
    let indexer = Indexer::new(LinkConfig::default());
    indexer.hydrate(files(&[("apple.md", ""), ("banana.md", "[[apple]]")]), None);
    let snap = indexer.snapshot();

    let value = serde_json::to_value(snap.definitions_for("apple")).unwrap();
    assert_eq!(value, serde_json::json!([{ "path": "apple.md", "title": "apple", "tier": "exact" }]));

    let value = serde_json::to_value(snap.references_for("apple.md")).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{ "source_path": "banana.md", "range": { "start": 0, "end": 9 }, "line": 1 }])
    );
}
