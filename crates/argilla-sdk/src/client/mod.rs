//! Argilla API client.

mod builder;
mod config;
mod http;
mod services;

pub use builder::ArgillaClientBuilder;
pub use config::{ArgillaConfig, API_KEY_ENV, API_URL_ENV, DEFAULT_API_URL};
pub use services::{
    DatasetsService, FieldsService, LogOptions, MetadataPropertiesService, QuestionsService,
    RecordPager, RecordsService, ResponsesService, SuggestionsService, UsersService,
    VectorsSettingsService, WorkspacesService,
};

use std::sync::Arc;

use uuid::Uuid;

use crate::error::Result;

use self::http::HttpClient;

/// The main client for the Argilla REST API.
///
/// Cloning is cheap; clones share one connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use argilla_sdk::ArgillaClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), argilla_sdk::Error> {
///     let client = ArgillaClient::builder()
///         .base_url("http://localhost:6900")
///         .api_key("argilla.apikey")
///         .build()?;
///
///     let me = client.users().me().await?;
///     println!("Logged in as {}", me.username);
///
///     for dataset in client.datasets().list(None).await? {
///         println!("Dataset: {}", dataset.name);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ArgillaClient {
    http: Arc<HttpClient>,
}

impl ArgillaClient {
    /// Creates a new client builder.
    #[must_use]
    pub fn builder() -> ArgillaClientBuilder {
        ArgillaClientBuilder::new()
    }

    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid URL or proxy.
    pub fn new(config: ArgillaConfig) -> Result<Self> {
        let http = HttpClient::new(&config)?;
        Ok(Self {
            http: Arc::new(http),
        })
    }

    /// Creates a client from `ARGILLA_API_URL` and `ARGILLA_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid URL.
    pub fn from_env() -> Result<Self> {
        Self::new(ArgillaConfig::from_env()?)
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &ArgillaConfig {
        self.http.config()
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config().base_url
    }

    /// Users.
    #[must_use]
    pub fn users(&self) -> UsersService {
        UsersService::new(Arc::clone(&self.http))
    }

    /// Workspaces and their members.
    #[must_use]
    pub fn workspaces(&self) -> WorkspacesService {
        WorkspacesService::new(Arc::clone(&self.http))
    }

    /// Datasets and their settings.
    #[must_use]
    pub fn datasets(&self) -> DatasetsService {
        DatasetsService::new(Arc::clone(&self.http))
    }

    /// Dataset fields.
    #[must_use]
    pub fn fields(&self) -> FieldsService {
        FieldsService::new(Arc::clone(&self.http))
    }

    /// Dataset questions.
    #[must_use]
    pub fn questions(&self) -> QuestionsService {
        QuestionsService::new(Arc::clone(&self.http))
    }

    /// Dataset metadata properties.
    #[must_use]
    pub fn metadata_properties(&self) -> MetadataPropertiesService {
        MetadataPropertiesService::new(Arc::clone(&self.http))
    }

    /// Dataset vector settings.
    #[must_use]
    pub fn vectors_settings(&self) -> VectorsSettingsService {
        VectorsSettingsService::new(Arc::clone(&self.http))
    }

    /// Records of one dataset.
    #[must_use]
    pub fn records(&self, dataset_id: Uuid) -> RecordsService {
        RecordsService::new(Arc::clone(&self.http), dataset_id)
    }

    /// Record suggestions.
    #[must_use]
    pub fn suggestions(&self) -> SuggestionsService {
        SuggestionsService::new(Arc::clone(&self.http))
    }

    /// User responses.
    #[must_use]
    pub fn responses(&self) -> ResponsesService {
        ResponsesService::new(Arc::clone(&self.http))
    }
}

impl std::fmt::Debug for ArgillaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgillaClient")
            .field("base_url", &self.base_url())
            .finish_non_exhaustive()
    }
}
