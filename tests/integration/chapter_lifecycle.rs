//! End-to-end chapter lifecycle against real temporary git repositories.

use super::test_utils::{temp_store, FakeResolver};
use folio::chapter::Chapter;
use folio::reference::FragmentRef;
use folio::types::RevisionMarker;

#[tokio::test]
async fn test_save_then_reconstitute_current_round_trips() {
    let (_guard, store, layout) = temp_store();

    let mut chapter = Chapter::with_parts(
        "Intro",
        "alice",
        None,
        Some(vec![FragmentRef::new("alice", "frag1", "rev1")]),
    );
    assert!(chapter.is_new());
    chapter.save(&store, &layout, "initial").await.unwrap();
    assert!(!chapter.is_new());

    let restored = Chapter::reconstitute(
        &store,
        &layout,
        "alice",
        chapter.id(),
        &RevisionMarker::Current,
    )
    .await
    .unwrap();

    assert_eq!(restored.name(), chapter.name());
    assert_eq!(restored.owner(), chapter.owner());
    assert_eq!(restored.id(), chapter.id());
    assert_eq!(restored.references(), chapter.references());
    assert!(!restored.is_new());
}

#[tokio::test]
async fn test_reconstitute_at_historical_revision() {
    let (_guard, store, layout) = temp_store();

    let mut chapter = Chapter::new("Draft", "alice");
    let rev_empty = chapter.save(&store, &layout, "initial").await.unwrap();

    chapter.set_references(vec![FragmentRef::new("bob", "frag2", "rev2")]);
    chapter.save(&store, &layout, "added a scrap").await.unwrap();

    // The historical read sees the pre-change state without touching the
    // live working tree.
    let old = Chapter::reconstitute(
        &store,
        &layout,
        "alice",
        chapter.id(),
        &RevisionMarker::At(rev_empty),
    )
    .await
    .unwrap();
    assert!(old.references().is_empty());

    let current = Chapter::reconstitute(
        &store,
        &layout,
        "alice",
        chapter.id(),
        &RevisionMarker::Current,
    )
    .await
    .unwrap();
    assert_eq!(current.references().len(), 1);
}

#[tokio::test]
async fn test_repeated_saves_of_unchanged_fields_are_byte_identical() {
    let (_guard, store, layout) = temp_store();

    let mut chapter = Chapter::with_parts(
        "Intro",
        "alice",
        None,
        Some(vec![FragmentRef::new("alice", "frag1", "rev1")]),
    );
    let r1 = chapter.save(&store, &layout, "first").await.unwrap();
    let r2 = chapter.save(&store, &layout, "second").await.unwrap();

    let s1 = chapter.raw_snapshot(&store, &layout, &r1).await.unwrap();
    let s2 = chapter.raw_snapshot(&store, &layout, &r2).await.unwrap();
    assert_eq!(s1, s2);
}

#[tokio::test]
async fn test_head_tracks_latest_save() {
    let (_guard, store, layout) = temp_store();

    let mut chapter = Chapter::new("Intro", "alice");
    let r1 = chapter.save(&store, &layout, "first").await.unwrap();
    assert_eq!(chapter.head(&store, &layout).await.unwrap(), r1);

    chapter.set_references(vec![FragmentRef::new("alice", "frag1", "rev1")]);
    let r2 = chapter.save(&store, &layout, "second").await.unwrap();
    assert_eq!(chapter.head(&store, &layout).await.unwrap(), r2);
}

#[tokio::test]
async fn test_previous_versions_limit_most_recent_first() {
    let (_guard, store, layout) = temp_store();

    let mut chapter = Chapter::new("Intro", "alice");
    chapter.save(&store, &layout, "first").await.unwrap();
    let r2 = chapter.save(&store, &layout, "second").await.unwrap();
    let r3 = chapter.save(&store, &layout, "third").await.unwrap();

    let history = chapter
        .previous_versions(&store, &layout, Some(2))
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, r3);
    assert_eq!(history[0].message, "third");
    assert_eq!(history[1].id, r2);
    assert_eq!(history[1].message, "second");

    let full = chapter
        .previous_versions(&store, &layout, None)
        .await
        .unwrap();
    assert_eq!(full.len(), 3);
}

#[tokio::test]
async fn test_pinned_reference_unaffected_by_fragment_head_advance() {
    let (_guard, store, layout) = temp_store();
    let resolver = FakeResolver::new();

    resolver.publish("alice", "frag1", "rev1", "original text");

    let mut chapter = Chapter::new("Intro", "alice");
    let fragment = resolver.fragment("alice", "frag1");
    chapter.add_reference(&fragment, None);
    chapter.save(&store, &layout, "pinned frag1").await.unwrap();

    // The fragment moves on; the chapter must not.
    resolver.publish("alice", "frag1", "rev2", "rewritten text");

    let text = chapter.render(&resolver).await.unwrap();
    assert!(text.contains("original text"));
    assert!(!text.contains("rewritten text"));
}

#[tokio::test]
async fn test_render_scenario_intro() {
    let resolver = FakeResolver::new();
    resolver.publish("alice", "frag1", "rev1", "the first scrap");

    let chapter = Chapter::with_parts(
        "Intro",
        "alice",
        None,
        Some(vec![FragmentRef::new("alice", "frag1", "rev1")]),
    );

    let text = chapter.render(&resolver).await.unwrap();
    assert_eq!(
        text,
        "\\newpage\n\\section{Intro}\n\nthe first scrap\n\\newline\n"
    );
}

#[tokio::test]
async fn test_fork_copies_state_into_new_owner_namespace() {
    let (_guard, store, layout) = temp_store();

    let mut original = Chapter::with_parts(
        "Intro",
        "alice",
        None,
        Some(vec![FragmentRef::new("alice", "frag1", "rev1")]),
    );
    original.save(&store, &layout, "initial").await.unwrap();

    let fork = original.fork("bob", &store, &layout).await.unwrap();
    assert_eq!(fork.owner(), "bob");
    assert_eq!(fork.id(), original.id());
    assert_eq!(fork.name(), original.name());
    assert_eq!(fork.references(), original.references());
    assert!(!fork.is_new());

    // The copy versions independently of the original.
    original.set_references(vec![]);
    original.save(&store, &layout, "emptied").await.unwrap();

    let restored = Chapter::reconstitute(
        &store,
        &layout,
        "bob",
        fork.id(),
        &RevisionMarker::Current,
    )
    .await
    .unwrap();
    assert_eq!(restored.references().len(), 1);

    let fork_history = fork.previous_versions(&store, &layout, None).await.unwrap();
    assert_eq!(fork_history.len(), 1);
    assert_eq!(fork_history[0].message, "forked from alice");
}

#[tokio::test]
async fn test_reconstitute_unknown_chapter_fails() {
    let (_guard, store, layout) = temp_store();

    let result = Chapter::reconstitute(
        &store,
        &layout,
        "alice",
        &uuid::Uuid::new_v4(),
        &RevisionMarker::Current,
    )
    .await;
    assert!(result.is_err());
}
