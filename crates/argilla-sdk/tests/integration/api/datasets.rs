//! Dataset API integration tests.

use crate::common::{review_dataset, review_settings, MockArgilla};
use argilla_sdk::mapping::SchemaKind;
use argilla_sdk::models::{DatasetCreate, DatasetStatus, Field};
use argilla_sdk::{Error, Settings};
use uuid::Uuid;

/// Tests creating a dataset with settings.
#[tokio::test]
async fn test_create_with_settings_publishes_dataset() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();

    let (dataset, settings) = client
        .datasets()
        .create_with_settings(&DatasetCreate::new("reviews", workspace_id), &review_settings())
        .await
        .expect("Failed to create dataset");

    assert_eq!(dataset.status, DatasetStatus::Ready);
    assert_eq!(dataset.guidelines.as_deref(), Some("Classify the review."));
    assert_eq!(settings.fields.len(), 1);
    assert_eq!(settings.questions.len(), 2);
    assert!(settings.fields.iter().all(|f| f.id.is_some()));
    assert!(settings.questions.iter().all(|q| q.id.is_some()));

    let registry = settings.registry().expect("Failed to build registry");
    assert_eq!(registry.items_of(SchemaKind::Question).count(), 2);
}

/// Tests that settings fetched later match the ones returned on creation.
#[tokio::test]
async fn test_settings_are_fetched_with_ids() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;

    let settings = client
        .datasets()
        .settings(dataset.id)
        .await
        .expect("Failed to fetch settings");

    let question = settings.question("sentiment").expect("sentiment question");
    assert!(question.id.is_some());
    assert_eq!(settings.vectors[0].dimensions, 3);
    assert_eq!(settings.metadata[0].name, "lang");
}

/// Tests that invalid settings fail before anything is created.
#[tokio::test]
async fn test_create_with_invalid_settings_sends_nothing() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");

    let settings = Settings::new().with_field(Field::text("text"));
    let result = server
        .client()
        .datasets()
        .create_with_settings(&DatasetCreate::new("reviews", workspace_id), &settings)
        .await;

    assert!(matches!(result, Err(Error::Schema { .. })));
    assert!(server.state.read().datasets.is_empty());
}

/// Tests that publishing a dataset without questions is rejected.
#[tokio::test]
async fn test_publish_without_questions_is_unprocessable() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();

    let dataset = client
        .datasets()
        .create(&DatasetCreate::new("drafts", workspace_id))
        .await
        .expect("Failed to create dataset");
    client
        .fields()
        .create(dataset.id, &Field::text("text"))
        .await
        .expect("Failed to create field");

    let result = client.datasets().publish(dataset.id).await;

    assert!(matches!(result, Err(Error::Unprocessable { .. })));
}

/// Tests getting an unknown dataset.
#[tokio::test]
async fn test_get_unknown_dataset_is_not_found() {
    let server = MockArgilla::start().await;

    let result = server.client().datasets().get(Uuid::new_v4()).await;

    assert!(matches!(result, Err(Error::NotFound { .. })));
}

/// Tests listing and finding datasets by name.
#[tokio::test]
async fn test_list_and_get_by_name() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let other_workspace = server.seed_workspace("other");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;

    let found = client
        .datasets()
        .get_by_name(workspace_id, "reviews")
        .await
        .expect("Failed to find dataset");
    assert_eq!(found.id, dataset.id);

    let listed = client
        .datasets()
        .list(Some(other_workspace))
        .await
        .expect("Failed to list datasets");
    assert!(listed.is_empty());
}

/// Tests that a duplicated dataset name conflicts.
#[tokio::test]
async fn test_duplicate_dataset_name_conflicts() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    review_dataset(&client, workspace_id).await;

    let result = client
        .datasets()
        .create(&DatasetCreate::new("reviews", workspace_id))
        .await;

    assert!(matches!(result, Err(Error::Conflict { .. })));
}

/// Tests deleting a dataset.
#[tokio::test]
async fn test_delete_dataset() {
    let server = MockArgilla::start().await;
    let workspace_id = server.seed_workspace("argilla");
    let client = server.client();
    let dataset = review_dataset(&client, workspace_id).await;

    client
        .datasets()
        .delete(dataset.id)
        .await
        .expect("Failed to delete dataset");

    let result = client.datasets().get(dataset.id).await;
    assert!(matches!(result, Err(Error::NotFound { .. })));
}
