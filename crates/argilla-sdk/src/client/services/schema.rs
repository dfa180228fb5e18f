//! Services for the schema items of a dataset: fields, questions, metadata
//! properties and vector settings.
//!
//! Each item kind is listed and created under its dataset and updated or
//! deleted through its own id.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Field, FieldUpdate, ItemList, MetadataProperty, MetadataPropertyUpdate, Question,
    QuestionUpdate, VectorSettings, VectorSettingsUpdate,
};

use super::super::http::HttpClient;

/// Service for dataset fields.
#[derive(Clone)]
pub struct FieldsService {
    http: Arc<HttpClient>,
}

impl FieldsService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists the fields of a dataset.
    pub async fn list(&self, dataset_id: Uuid) -> Result<Vec<Field>> {
        let list: ItemList<Field> = self
            .http
            .get(&format!("/api/v1/datasets/{dataset_id}/fields"))
            .await?;
        Ok(list.into_inner())
    }

    /// Adds a field to a draft dataset.
    pub async fn create(&self, dataset_id: Uuid, field: &Field) -> Result<Field> {
        self.http
            .post(&format!("/api/v1/datasets/{dataset_id}/fields"), field)
            .await
    }

    /// Updates a field.
    pub async fn update(&self, id: Uuid, update: &FieldUpdate) -> Result<Field> {
        self.http.patch(&format!("/api/v1/fields/{id}"), update).await
    }

    /// Deletes a field.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.http.delete(&format!("/api/v1/fields/{id}")).await
    }
}

/// Service for dataset questions.
#[derive(Clone)]
pub struct QuestionsService {
    http: Arc<HttpClient>,
}

impl QuestionsService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists the questions of a dataset.
    pub async fn list(&self, dataset_id: Uuid) -> Result<Vec<Question>> {
        let list: ItemList<Question> = self
            .http
            .get(&format!("/api/v1/datasets/{dataset_id}/questions"))
            .await?;
        Ok(list.into_inner())
    }

    /// Adds a question to a draft dataset.
    pub async fn create(&self, dataset_id: Uuid, question: &Question) -> Result<Question> {
        self.http
            .post(&format!("/api/v1/datasets/{dataset_id}/questions"), question)
            .await
    }

    /// Updates a question.
    pub async fn update(&self, id: Uuid, update: &QuestionUpdate) -> Result<Question> {
        self.http
            .patch(&format!("/api/v1/questions/{id}"), update)
            .await
    }

    /// Deletes a question.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.http.delete(&format!("/api/v1/questions/{id}")).await
    }
}

/// Service for dataset metadata properties.
#[derive(Clone)]
pub struct MetadataPropertiesService {
    http: Arc<HttpClient>,
}

impl MetadataPropertiesService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists the metadata properties of a dataset.
    pub async fn list(&self, dataset_id: Uuid) -> Result<Vec<MetadataProperty>> {
        let list: ItemList<MetadataProperty> = self
            .http
            .get(&format!("/api/v1/datasets/{dataset_id}/metadata-properties"))
            .await?;
        Ok(list.into_inner())
    }

    /// Adds a metadata property. Unlike fields and questions, metadata
    /// properties can be added after publishing.
    pub async fn create(
        &self,
        dataset_id: Uuid,
        property: &MetadataProperty,
    ) -> Result<MetadataProperty> {
        self.http
            .post(
                &format!("/api/v1/datasets/{dataset_id}/metadata-properties"),
                property,
            )
            .await
    }

    /// Updates a metadata property.
    pub async fn update(
        &self,
        id: Uuid,
        update: &MetadataPropertyUpdate,
    ) -> Result<MetadataProperty> {
        self.http
            .patch(&format!("/api/v1/metadata-properties/{id}"), update)
            .await
    }

    /// Deletes a metadata property.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.http
            .delete(&format!("/api/v1/metadata-properties/{id}"))
            .await
    }
}

/// Service for dataset vector settings.
#[derive(Clone)]
pub struct VectorsSettingsService {
    http: Arc<HttpClient>,
}

impl VectorsSettingsService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists the vector settings of a dataset.
    pub async fn list(&self, dataset_id: Uuid) -> Result<Vec<VectorSettings>> {
        let list: ItemList<VectorSettings> = self
            .http
            .get(&format!("/api/v1/datasets/{dataset_id}/vectors-settings"))
            .await?;
        Ok(list.into_inner())
    }

    /// Adds vector settings.
    pub async fn create(&self, dataset_id: Uuid, vector: &VectorSettings) -> Result<VectorSettings> {
        self.http
            .post(
                &format!("/api/v1/datasets/{dataset_id}/vectors-settings"),
                vector,
            )
            .await
    }

    /// Updates vector settings.
    pub async fn update(&self, id: Uuid, update: &VectorSettingsUpdate) -> Result<VectorSettings> {
        self.http
            .patch(&format!("/api/v1/vectors-settings/{id}"), update)
            .await
    }

    /// Deletes vector settings.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.http
            .delete(&format!("/api/v1/vectors-settings/{id}"))
            .await
    }
}

macro_rules! opaque_debug {
    ($($service:ident),+) => {
        $(
            impl std::fmt::Debug for $service {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.debug_struct(stringify!($service)).finish_non_exhaustive()
                }
            }
        )+
    };
}

opaque_debug!(
    FieldsService,
    QuestionsService,
    MetadataPropertiesService,
    VectorsSettingsService
);
