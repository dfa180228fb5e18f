//! Dataset archive integration tests.

use crate::common::{raw, review_dataset, review_rows, MockArgilla, OWNER_ID};
use argilla_sdk::{DatasetArchive, LogOptions};
use serde_json::json;
use tempfile::TempDir;

/// Tests downloading a dataset and reading it back from disk.
#[tokio::test]
async fn test_archive_round_trips_through_disk() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;
    let records = client.records(dataset.id);

    let mut rows = review_rows(2);
    rows.push(raw(json!({
        "external_id": "annotated",
        "text": "Would buy again",
        "embedding": [0.5, -1.0, 2.0],
        "sentiment": "positive",
        "sentiment.suggestion.score": 0.5,
        "comment.response": "Nice",
    })));
    records
        .log(&rows, &LogOptions::new().with_default_user(OWNER_ID))
        .await
        .expect("Failed to log records");

    let archive = records.archive().await.expect("Failed to archive dataset");
    assert_eq!(archive.records.len(), 3);

    let dir = TempDir::new().expect("Failed to create temp dir");
    archive.write(dir.path()).expect("Failed to write archive");
    let restored = DatasetArchive::read(dir.path()).expect("Failed to read archive");

    let restored_dataset = restored.dataset.expect("dataset identity");
    assert_eq!(restored_dataset.id, dataset.id);
    assert_eq!(restored_dataset.name, "reviews");
    assert_eq!(restored.settings.fields, archive.settings.fields);
    assert_eq!(restored.settings.questions, archive.settings.questions);
    assert_eq!(restored.records, archive.records);

    let annotated = restored
        .records
        .iter()
        .find(|r| r.external_id.as_deref() == Some("annotated"))
        .expect("annotated record");
    assert_eq!(annotated.vectors["embedding"], vec![0.5, -1.0, 2.0]);
    assert_eq!(annotated.responses_to("comment").count(), 1);
}

/// Tests that an archive holding only settings reads back without records.
#[tokio::test]
async fn test_archive_without_records() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;

    let archive = client
        .records(dataset.id)
        .archive()
        .await
        .expect("Failed to archive dataset");

    let dir = TempDir::new().expect("Failed to create temp dir");
    archive.write(dir.path()).expect("Failed to write archive");
    let restored = DatasetArchive::read(dir.path()).expect("Failed to read archive");

    assert!(restored.records.is_empty());
    assert_eq!(restored.settings.vectors.len(), 1);
}
