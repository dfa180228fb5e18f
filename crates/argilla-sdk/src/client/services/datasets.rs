//! Datasets service.

use std::sync::Arc;

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Dataset, DatasetCreate, DatasetUpdate, ItemList};
use crate::settings::Settings;

use super::super::http::HttpClient;
use super::schema::{
    FieldsService, MetadataPropertiesService, QuestionsService, VectorsSettingsService,
};

/// Service for managing datasets.
#[derive(Clone)]
pub struct DatasetsService {
    http: Arc<HttpClient>,
}

impl DatasetsService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists the datasets visible to the current user, optionally limited to
    /// one workspace.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use argilla_sdk::ArgillaClient;
    /// # async fn example(client: ArgillaClient) -> Result<(), argilla_sdk::Error> {
    /// for dataset in client.datasets().list(None).await? {
    ///     println!("{} [{}]", dataset.name, dataset.status);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(&self, workspace_id: Option<Uuid>) -> Result<Vec<Dataset>> {
        let url = match workspace_id {
            Some(workspace_id) => format!("/api/v1/me/datasets?workspace_id={workspace_id}"),
            None => "/api/v1/me/datasets".to_string(),
        };
        let list: ItemList<Dataset> = self.http.get(&url).await?;
        Ok(list.into_inner())
    }

    /// Gets a dataset by id.
    pub async fn get(&self, id: Uuid) -> Result<Dataset> {
        self.http.get(&format!("/api/v1/datasets/{id}")).await
    }

    /// Finds a dataset by name within a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the workspace has no such dataset.
    pub async fn get_by_name(&self, workspace_id: Uuid, name: &str) -> Result<Dataset> {
        self.list(Some(workspace_id))
            .await?
            .into_iter()
            .find(|dataset| dataset.name == name && dataset.workspace_id == workspace_id)
            .ok_or_else(|| Error::not_found("dataset", name))
    }

    /// Creates a draft dataset without fields or questions.
    pub async fn create(&self, request: &DatasetCreate) -> Result<Dataset> {
        self.http.post("/api/v1/datasets", request).await
    }

    /// Updates a dataset.
    pub async fn update(&self, id: Uuid, request: &DatasetUpdate) -> Result<Dataset> {
        self.http
            .patch(&format!("/api/v1/datasets/{id}"), request)
            .await
    }

    /// Deletes a dataset and all its records.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.http.delete(&format!("/api/v1/datasets/{id}")).await
    }

    /// Publishes a draft dataset so it accepts records.
    pub async fn publish(&self, id: Uuid) -> Result<Dataset> {
        self.http
            .put(&format!("/api/v1/datasets/{id}/publish"), &())
            .await
    }

    /// Fetches the complete settings of a dataset, with server ids.
    #[instrument(skip(self))]
    pub async fn settings(&self, id: Uuid) -> Result<Settings> {
        let dataset = self.get(id).await?;
        self.settings_of(&dataset).await
    }

    pub(crate) async fn settings_of(&self, dataset: &Dataset) -> Result<Settings> {
        let http = Arc::clone(&self.http);
        let fields = FieldsService::new(Arc::clone(&http)).list(dataset.id).await?;
        let questions = QuestionsService::new(Arc::clone(&http)).list(dataset.id).await?;
        let metadata = MetadataPropertiesService::new(Arc::clone(&http))
            .list(dataset.id)
            .await?;
        let vectors = VectorsSettingsService::new(http).list(dataset.id).await?;

        Ok(Settings {
            fields,
            questions,
            metadata,
            vectors,
            guidelines: dataset.guidelines.clone(),
            allow_extra_metadata: dataset.allow_extra_metadata,
            distribution: dataset.distribution,
        })
    }

    /// Creates a dataset with the given settings and publishes it.
    ///
    /// The dataset-level options of `settings` (guidelines, extra metadata
    /// policy, distribution) override the ones in `request`. Returns the
    /// published dataset and its settings as stored by the server.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use argilla_sdk::{ArgillaClient, Settings};
    /// # use argilla_sdk::models::{DatasetCreate, Field, Question};
    /// # async fn example(client: ArgillaClient) -> Result<(), argilla_sdk::Error> {
    /// let workspace = client.workspaces().get_by_name("support").await?;
    /// let settings = Settings::new()
    ///     .with_field(Field::text("text"))
    ///     .with_question(Question::label("sentiment", ["positive", "negative"]))
    ///     .with_guidelines("Classify the customer message.");
    ///
    /// let (dataset, settings) = client
    ///     .datasets()
    ///     .create_with_settings(&DatasetCreate::new("tickets", workspace.id), &settings)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Fails before any request if the settings do not validate.
    #[instrument(skip(self, request, settings), fields(name = %request.name))]
    pub async fn create_with_settings(
        &self,
        request: &DatasetCreate,
        settings: &Settings,
    ) -> Result<(Dataset, Settings)> {
        settings.validate()?;

        let mut request = request.clone();
        request.guidelines = settings.guidelines.clone();
        request.allow_extra_metadata = settings.allow_extra_metadata;
        request.distribution = settings.distribution;
        let dataset = self.create(&request).await?;
        debug!(dataset_id = %dataset.id, "Created draft dataset");

        let http = Arc::clone(&self.http);
        let fields = FieldsService::new(Arc::clone(&http));
        for field in &settings.fields {
            fields.create(dataset.id, field).await?;
        }
        let questions = QuestionsService::new(Arc::clone(&http));
        for question in &settings.questions {
            questions.create(dataset.id, question).await?;
        }
        let metadata = MetadataPropertiesService::new(Arc::clone(&http));
        for property in &settings.metadata {
            metadata.create(dataset.id, property).await?;
        }
        let vectors = VectorsSettingsService::new(http);
        for vector in &settings.vectors {
            vectors.create(dataset.id, vector).await?;
        }

        let dataset = self.publish(dataset.id).await?;
        debug!(dataset_id = %dataset.id, "Published dataset");

        let settings = self.settings_of(&dataset).await?;
        Ok((dataset, settings))
    }
}

impl std::fmt::Debug for DatasetsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetsService").finish_non_exhaustive()
    }
}
