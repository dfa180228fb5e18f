//! Test fixtures.

use argilla_sdk::models::{
    Dataset, DatasetCreate, Field, MetadataProperty, Question, VectorSettings,
};
use argilla_sdk::{ArgillaClient, Settings};
use serde_json::{json, Map, Value};

/// Settings of a small review dataset: one text field, a label question,
/// a free-text question, a terms property and a 3-dimensional vector.
pub fn review_settings() -> Settings {
    Settings::new()
        .with_field(Field::text("text"))
        .with_question(Question::label("sentiment", ["positive", "negative"]))
        .with_question(Question::text("comment").with_required(false))
        .with_metadata(MetadataProperty::terms("lang", None))
        .with_vector(VectorSettings::new("embedding", 3))
        .with_guidelines("Classify the review.")
}

/// Creates and publishes the review dataset in a fresh workspace.
pub async fn review_dataset(client: &ArgillaClient, workspace_id: uuid::Uuid) -> Dataset {
    let (dataset, _) = client
        .datasets()
        .create_with_settings(&DatasetCreate::new("reviews", workspace_id), &review_settings())
        .await
        .expect("Failed to create dataset");
    dataset
}

/// Converts a JSON object literal into a raw record.
pub fn raw(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Builds `count` raw review records with distinct external ids.
pub fn review_rows(count: usize) -> Vec<Map<String, Value>> {
    (0..count)
        .map(|i| {
            raw(json!({
                "external_id": format!("review-{i}"),
                "text": format!("Review number {i}"),
                "lang": "en",
            }))
        })
        .collect()
}
