//! Record API integration tests.

use std::collections::{BTreeMap, BTreeSet};

use crate::common::{raw, review_dataset, review_rows, MockArgilla, OWNER_ID};
use argilla_sdk::mapping::{FlattenMode, RenameMapping};
use argilla_sdk::models::{Pagination, RecordSearch, RecordUpsert};
use argilla_sdk::{Error, LogOptions};
use serde_json::{json, Value};

/// Tests logging raw records and exporting them as flat rows.
#[tokio::test]
async fn test_log_and_export_flat_rows() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;
    let records = client.records(dataset.id);

    let rows = vec![
        raw(json!({
            "external_id": "r1",
            "text": "Great product",
            "lang": "en",
            "embedding": [0.5, 0.25, 1.0],
            "sentiment": "positive",
            "sentiment.suggestion.score": 0.75,
            "sentiment.suggestion.agent": "model-v1",
            "comment.response": "Loved it",
        })),
        raw(json!({"external_id": "r2", "text": "Meh"})),
    ];
    let stored = records
        .log(&rows, &LogOptions::new())
        .await
        .expect("Failed to log records");
    assert_eq!(stored.len(), 2);

    let exported = records
        .export(FlattenMode::Flat)
        .await
        .expect("Failed to export records");
    assert_eq!(exported.len(), 2);

    let first = &exported[0];
    let response_key = format!("comment.response.{OWNER_ID}");
    assert_eq!(first["external_id"], "r1");
    assert_eq!(first["text"], "Great product");
    assert_eq!(first["lang"], "en");
    assert_eq!(first["embedding"], json!([0.5, 0.25, 1.0]));
    assert_eq!(first["sentiment.suggestion"], "positive");
    assert_eq!(first["sentiment.suggestion.score"], 0.75);
    assert_eq!(first["sentiment.suggestion.agent"], "model-v1");
    assert_eq!(first[&response_key], "Loved it");
    assert_eq!(first[&format!("{response_key}.status")], "draft");

    let second = &exported[1];
    assert_eq!(second["sentiment.suggestion"], Value::Null);
    assert_eq!(second[&response_key], Value::Null);

    let keys: Vec<BTreeSet<&String>> = exported.iter().map(|row| row.keys().collect()).collect();
    assert_eq!(keys[0], keys[1]);
}

/// Tests that exported nested rows carry suggestions and responses.
#[tokio::test]
async fn test_export_nested_rows() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;
    let records = client.records(dataset.id);

    let row = raw(json!({
        "text": "Broken on arrival",
        "sentiment.suggestion": "negative",
        format!("sentiment.response.{OWNER_ID}"): "negative",
        format!("sentiment.response.{OWNER_ID}.status"): "submitted",
    }));
    records
        .log(&[row], &LogOptions::new().with_default_user(OWNER_ID))
        .await
        .expect("Failed to log records");

    let exported = records
        .export(FlattenMode::Nested)
        .await
        .expect("Failed to export records");

    let nested = &exported[0];
    assert_eq!(nested["fields"]["text"], "Broken on arrival");
    assert_eq!(nested["suggestions"]["sentiment"]["value"], "negative");
    assert_eq!(nested["responses"]["sentiment"][0]["status"], "submitted");
    assert_eq!(nested["responses"]["sentiment"][0]["user_id"], json!(OWNER_ID));
    assert!(nested["external_id"].is_string());
}

/// Tests that records are sent in sequential batches of the configured size.
#[tokio::test]
async fn test_log_sends_sequential_batches() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;

    let options = LogOptions::new()
        .with_default_user(OWNER_ID)
        .with_batch_size(2);
    let stored = client
        .records(dataset.id)
        .log(&review_rows(5), &options)
        .await
        .expect("Failed to log records");

    assert_eq!(stored.len(), 5);
    let state = server.state.read();
    assert_eq!(state.bulk_sizes, vec![2, 2, 1]);
    assert_eq!(state.records_of(dataset.id).len(), 5);
}

/// Tests that an invalid record stops logging before its batch is sent.
#[tokio::test]
async fn test_log_aborts_on_invalid_record() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;

    let mut rows = review_rows(3);
    rows[2].insert("embedding".into(), json!([1.0, 2.0]));

    let options = LogOptions::new()
        .with_default_user(OWNER_ID)
        .with_batch_size(2);
    let result = client.records(dataset.id).log(&rows, &options).await;

    match result {
        Err(Error::TypeConstraint { key, .. }) => assert_eq!(key, "embedding"),
        other => panic!("expected a type constraint error, got {other:?}"),
    }
    let state = server.state.read();
    assert_eq!(state.bulk_sizes, vec![2]);
    assert_eq!(state.records_of(dataset.id).len(), 2);
}

/// Tests that a zero batch size is rejected.
#[tokio::test]
async fn test_log_rejects_zero_batch_size() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;

    let result = client
        .records(dataset.id)
        .log(&review_rows(1), &LogOptions::new().with_batch_size(0))
        .await;

    assert!(matches!(result, Err(Error::Configuration { .. })));
    assert!(server.state.read().bulk_sizes.is_empty());
}

/// Tests that logging the same external ids again updates the records.
#[tokio::test]
async fn test_log_upserts_by_external_id() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;
    let records = client.records(dataset.id);
    let options = LogOptions::new().with_default_user(OWNER_ID);

    let first = records
        .log(&review_rows(3), &options)
        .await
        .expect("Failed to log records");
    let second = records
        .log(&review_rows(3), &options)
        .await
        .expect("Failed to log records");

    assert_eq!(server.state.read().records_of(dataset.id).len(), 3);
    let first_ids: Vec<_> = first.iter().map(|r| r.id).collect();
    let second_ids: Vec<_> = second.iter().map(|r| r.id).collect();
    assert_eq!(first_ids, second_ids);
}

/// Tests logging with a rename mapping.
#[tokio::test]
async fn test_log_with_rename_mapping() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;

    let mapping = RenameMapping::new()
        .with("review", "text")
        .with("label", "sentiment")
        .with("key", "external_id");
    let row = raw(json!({"key": "ticket-7", "review": "Too slow", "label": "negative"}));

    let stored = client
        .records(dataset.id)
        .log(
            &[row],
            &LogOptions::new()
                .with_mapping(mapping)
                .with_default_user(OWNER_ID),
        )
        .await
        .expect("Failed to log records");

    let record = &stored[0];
    assert_eq!(record.external_id.as_deref(), Some("ticket-7"));
    assert_eq!(record.fields["text"], "Too slow");
    let suggestions = record.suggestions.as_ref().expect("suggestions");
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].value, "negative");
}

/// Tests that the pager requests pages only as they are consumed.
#[tokio::test]
async fn test_pager_fetches_lazily() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;
    let records = client.records(dataset.id);
    records
        .log(&review_rows(7), &LogOptions::new().with_default_user(OWNER_ID))
        .await
        .expect("Failed to log records");

    let mut pager = records.pages(3);
    let first = pager.next().await.expect("Failed to fetch page");
    assert!(first.is_some());
    assert_eq!(server.state.read().page_requests, vec![(0, 3)]);

    let mut seen = 1;
    while pager.next().await.expect("Failed to fetch page").is_some() {
        seen += 1;
    }

    assert_eq!(seen, 7);
    assert_eq!(
        server.state.read().page_requests,
        vec![(0, 3), (3, 3), (6, 3)]
    );
}

/// Tests paging by whole pages.
#[tokio::test]
async fn test_pager_next_page() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;
    let records = client.records(dataset.id);
    records
        .log(&review_rows(4), &LogOptions::new().with_default_user(OWNER_ID))
        .await
        .expect("Failed to log records");

    let mut pager = records.pages(2);
    let mut sizes = Vec::new();
    while let Some(page) = pager.next_page().await.expect("Failed to fetch page") {
        sizes.push(page.len());
    }

    assert_eq!(sizes, vec![2, 2]);
}

/// Tests a text search over record fields.
#[tokio::test]
async fn test_search_records() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;
    let records = client.records(dataset.id);
    records
        .log(&review_rows(5), &LogOptions::new().with_default_user(OWNER_ID))
        .await
        .expect("Failed to log records");

    let page = records
        .search(&RecordSearch::text("number 3").in_field("text"), Pagination::default())
        .await
        .expect("Failed to search records");

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].record.external_id.as_deref(), Some("review-3"));
}

/// Tests getting a single record by id.
#[tokio::test]
async fn test_get_record() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;
    let records = client.records(dataset.id);
    let stored = records
        .log(&review_rows(2), &LogOptions::new().with_default_user(OWNER_ID))
        .await
        .expect("Failed to log records");

    let record = records.get(stored[1].id).await.expect("Failed to get record");

    assert_eq!(record.external_id.as_deref(), Some("review-1"));
    assert_eq!(record.fields["text"], "Review number 1");
}

/// Tests deleting records by id.
#[tokio::test]
async fn test_delete_many() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;
    let records = client.records(dataset.id);
    let stored = records
        .log(&review_rows(3), &LogOptions::new().with_default_user(OWNER_ID))
        .await
        .expect("Failed to log records");

    let ids: Vec<_> = stored.iter().take(2).map(|r| r.id).collect();
    records.delete_many(&ids).await.expect("Failed to delete records");

    let remaining = server.state.read().records_of(dataset.id);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["external_id"], "review-2");
}

/// Tests that the server rejects values for undeclared fields.
#[tokio::test]
async fn test_upsert_unknown_field_is_unprocessable() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;

    let item = RecordUpsert {
        id: None,
        external_id: Some("x".into()),
        fields: BTreeMap::from([("title".to_string(), "Hello".to_string())]),
        metadata: BTreeMap::new(),
        vectors: BTreeMap::new(),
        suggestions: Vec::new(),
        responses: Vec::new(),
    };
    let result = client.records(dataset.id).upsert_bulk(&[item]).await;

    assert!(matches!(result, Err(Error::Unprocessable { .. })));
}

/// Tests that creating an existing record conflicts.
#[tokio::test]
async fn test_create_bulk_conflicts_on_existing_record() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;
    let records = client.records(dataset.id);

    let item = RecordUpsert {
        id: None,
        external_id: Some("dup".into()),
        fields: BTreeMap::from([("text".to_string(), "Hello".to_string())]),
        metadata: BTreeMap::new(),
        vectors: BTreeMap::new(),
        suggestions: Vec::new(),
        responses: Vec::new(),
    };
    records
        .create_bulk(std::slice::from_ref(&item))
        .await
        .expect("Failed to create record");
    let result = records.create_bulk(&[item]).await;

    assert!(matches!(result, Err(Error::Conflict { .. })));
}
