//! Field-update surface: patch application, commit behavior, rejections.

use super::test_utils::temp_store;
use folio::chapter::{Chapter, UpdateRejection};
use folio::error::ChapterError;
use folio::reference::FragmentRef;
use folio::types::RevisionMarker;
use serde_json::{json, Map, Value};

fn patch(value: Value) -> Map<String, Value> {
    value.as_object().unwrap().clone()
}

#[tokio::test]
async fn test_rename_patch_commits_with_change_summary() {
    let (_guard, store, layout) = temp_store();

    let mut chapter = Chapter::new("Intro", "alice");
    chapter.save(&store, &layout, "initial").await.unwrap();

    let outcome = chapter
        .apply_patch(&patch(json!({"name": "Overture"})), &store, &layout)
        .await
        .unwrap();

    assert_eq!(chapter.name(), "Overture");
    assert!(outcome
        .message
        .contains("changed name from Intro to Overture"));
    assert_eq!(chapter.head(&store, &layout).await.unwrap(), outcome.revision);

    // The change summary doubles as the commit message.
    let history = chapter
        .previous_versions(&store, &layout, Some(1))
        .await
        .unwrap();
    assert!(history[0].message.contains("changed name from Intro to Overture"));
}

#[tokio::test]
async fn test_replace_references_patch() {
    let (_guard, store, layout) = temp_store();

    let mut chapter = Chapter::new("Intro", "alice");
    chapter.save(&store, &layout, "initial").await.unwrap();

    let outcome = chapter
        .apply_patch(
            &patch(json!({"scraps": [["bob", "frag2", "rev2"]]})),
            &store,
            &layout,
        )
        .await
        .unwrap();
    assert!(outcome.message.contains("updated scraps"));
    assert_eq!(
        chapter.references(),
        &[FragmentRef::new("bob", "frag2", "rev2")]
    );

    let restored = Chapter::reconstitute(
        &store,
        &layout,
        "alice",
        chapter.id(),
        &RevisionMarker::Current,
    )
    .await
    .unwrap();
    assert_eq!(restored.references(), chapter.references());
}

#[tokio::test]
async fn test_read_only_fields_leave_chapter_untouched() {
    let (_guard, store, layout) = temp_store();

    let mut chapter = Chapter::with_parts(
        "Intro",
        "alice",
        None,
        Some(vec![FragmentRef::new("alice", "frag1", "rev1")]),
    );
    let saved = chapter.save(&store, &layout, "initial").await.unwrap();

    for field in ["author", "uuid"] {
        let mut attempt = Map::new();
        attempt.insert(field.to_string(), json!("x"));
        let err = chapter
            .apply_patch(&attempt, &store, &layout)
            .await
            .unwrap_err();
        assert!(matches!(err, ChapterError::ReadOnlyField { .. }));
    }

    assert_eq!(chapter.name(), "Intro");
    assert_eq!(chapter.owner(), "alice");
    assert_eq!(chapter.references().len(), 1);
    assert_eq!(chapter.head(&store, &layout).await.unwrap(), saved);
}

#[tokio::test]
async fn test_unknown_field_performs_no_commit() {
    let (_guard, store, layout) = temp_store();

    let mut chapter = Chapter::new("Intro", "alice");
    let saved = chapter.save(&store, &layout, "initial").await.unwrap();
    let head_before = chapter.head(&store, &layout).await.unwrap();
    assert_eq!(head_before, saved);

    let err = chapter
        .apply_patch(&patch(json!({"bogus": 1})), &store, &layout)
        .await
        .unwrap_err();
    assert!(matches!(err, ChapterError::UnrecognizedField { ref field } if field == "bogus"));

    let head_after = chapter.head(&store, &layout).await.unwrap();
    assert_eq!(head_before, head_after);
}

#[tokio::test]
async fn test_invalid_entry_aborts_whole_patch() {
    let (_guard, store, layout) = temp_store();

    let mut chapter = Chapter::new("Intro", "alice");
    chapter.save(&store, &layout, "initial").await.unwrap();

    // A valid rename alongside a read-only field: nothing may apply.
    let err = chapter
        .apply_patch(
            &patch(json!({"name": "Sneaky", "uuid": "0000"})),
            &store,
            &layout,
        )
        .await
        .unwrap_err();

    let rejection = UpdateRejection::from_error(&err).unwrap();
    assert_eq!(rejection.field, "uuid");
    assert_eq!(rejection.error, "author and uuid are read-only");
    assert_eq!(chapter.name(), "Intro");
}
