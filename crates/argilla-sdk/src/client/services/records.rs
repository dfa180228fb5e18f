//! Records service: listing, search, bulk writes, ingestion and export.

use std::collections::VecDeque;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::disk::DatasetArchive;
use crate::error::{Error, Result};
use crate::mapping::{FlattenMode, RecordAssembler, RecordFlattener, RenameMapping};
use crate::models::{
    Pagination, RecordModel, RecordSearch, RecordUpsert, RecordsBulk, RecordsPage, SearchPage,
};
use crate::record::Record;

use super::super::http::HttpClient;
use super::datasets::DatasetsService;
use super::users::UsersService;

const INCLUDE: &str = "include=responses&include=suggestions&include=vectors";

/// Options for [`RecordsService::log`].
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Rename mapping applied to every raw record.
    pub mapping: RenameMapping,

    /// User that unattributed responses belong to. Defaults to the user of
    /// the API key.
    pub default_user_id: Option<Uuid>,

    /// Records per bulk request.
    pub batch_size: usize,
}

impl LogOptions {
    /// Default number of records per bulk request.
    pub const DEFAULT_BATCH_SIZE: usize = 256;

    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rename mapping.
    #[must_use]
    pub fn with_mapping(mut self, mapping: RenameMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Sets the default response user.
    #[must_use]
    pub fn with_default_user(mut self, user_id: Uuid) -> Self {
        self.default_user_id = Some(user_id);
        self
    }

    /// Sets the batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            mapping: RenameMapping::default(),
            default_user_id: None,
            batch_size: Self::DEFAULT_BATCH_SIZE,
        }
    }
}

/// Service for the records of one dataset.
#[derive(Clone)]
pub struct RecordsService {
    http: Arc<HttpClient>,
    dataset_id: Uuid,
}

impl RecordsService {
    pub(crate) fn new(http: Arc<HttpClient>, dataset_id: Uuid) -> Self {
        Self { http, dataset_id }
    }

    /// Returns the dataset this service operates on.
    #[must_use]
    pub fn dataset_id(&self) -> Uuid {
        self.dataset_id
    }

    /// Fetches one page of records, with responses, suggestions and vectors.
    pub async fn list(&self, page: Pagination) -> Result<RecordsPage> {
        let url = format!(
            "/api/v1/datasets/{}/records?{}&{INCLUDE}",
            self.dataset_id,
            page.to_query()
        );
        self.http.get(&url).await
    }

    /// Returns a pager over all records.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use argilla_sdk::ArgillaClient;
    /// # async fn example(client: ArgillaClient, dataset_id: uuid::Uuid) -> Result<(), argilla_sdk::Error> {
    /// let mut pager = client.records(dataset_id).pages(500);
    /// while let Some(record) = pager.next().await? {
    ///     println!("{}", record.id);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn pages(&self, limit: u32) -> RecordPager {
        RecordPager::new(self.clone(), Pagination::new(0, limit.max(1)))
    }

    /// Runs a text search.
    pub async fn search(&self, query: &RecordSearch, page: Pagination) -> Result<SearchPage> {
        let url = format!(
            "/api/v1/datasets/{}/records/search?{}&{INCLUDE}",
            self.dataset_id,
            page.to_query()
        );
        self.http.post(&url, query).await
    }

    /// Gets a record by id.
    pub async fn get(&self, record_id: Uuid) -> Result<RecordModel> {
        self.http
            .get(&format!("/api/v1/records/{record_id}?{INCLUDE}"))
            .await
    }

    /// Creates or updates records, matching on `id` or `external_id`.
    #[instrument(skip(self, items), fields(dataset_id = %self.dataset_id, count = items.len()))]
    pub async fn upsert_bulk(&self, items: &[RecordUpsert]) -> Result<Vec<RecordModel>> {
        let url = format!("/api/v1/datasets/{}/records/bulk", self.dataset_id);
        let body = RecordsBulk {
            items: items.to_vec(),
        };
        let created: RecordsBulk<RecordModel> = self.http.put(&url, &body).await?;
        Ok(created.items)
    }

    /// Creates records. Fails if any record already exists.
    #[instrument(skip(self, items), fields(dataset_id = %self.dataset_id, count = items.len()))]
    pub async fn create_bulk(&self, items: &[RecordUpsert]) -> Result<Vec<RecordModel>> {
        let url = format!("/api/v1/datasets/{}/records/bulk", self.dataset_id);
        let body = RecordsBulk {
            items: items.to_vec(),
        };
        let created: RecordsBulk<RecordModel> = self.http.post(&url, &body).await?;
        Ok(created.items)
    }

    /// Deletes records by id.
    pub async fn delete_many(&self, ids: &[Uuid]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let ids = ids.iter().map(Uuid::to_string).collect::<Vec<_>>().join(",");
        let url = format!(
            "/api/v1/datasets/{}/records?ids={}",
            self.dataset_id,
            urlencoding::encode(&ids)
        );
        self.http.delete(&url).await
    }

    /// Maps raw records against the dataset settings and upserts them.
    ///
    /// Batches are sent one after another. The first record that fails to
    /// map aborts the call before its batch is sent; earlier batches stay
    /// stored.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use argilla_sdk::{ArgillaClient, LogOptions, mapping::RenameMapping};
    /// # use serde_json::json;
    /// # async fn example(client: ArgillaClient, dataset_id: uuid::Uuid) -> Result<(), argilla_sdk::Error> {
    /// let rows = vec![
    ///     json!({"review": "Arrived broken", "sentiment": "negative", "sentiment.suggestion.score": 0.8}),
    /// ];
    /// let rows: Vec<_> = rows.into_iter().filter_map(|r| r.as_object().cloned()).collect();
    ///
    /// let options = LogOptions::new().with_mapping(RenameMapping::new().with("review", "text"));
    /// let stored = client.records(dataset_id).log(&rows, &options).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns mapping errors for invalid records and API errors for failed
    /// requests.
    #[instrument(skip(self, raws, options), fields(dataset_id = %self.dataset_id, count = raws.len()))]
    pub async fn log(
        &self,
        raws: &[Map<String, Value>],
        options: &LogOptions,
    ) -> Result<Vec<RecordModel>> {
        if options.batch_size == 0 {
            return Err(Error::config("batch size must be positive"));
        }

        let settings = self.datasets().settings(self.dataset_id).await?;
        let registry = settings.registry()?;

        let default_user_id = match options.default_user_id {
            Some(user_id) => user_id,
            None => UsersService::new(Arc::clone(&self.http)).me().await?.id,
        };
        let assembler = RecordAssembler::new(&registry)
            .with_mapping(options.mapping.clone())
            .with_default_user(default_user_id);

        let mut stored = Vec::with_capacity(raws.len());
        for (index, chunk) in raws.chunks(options.batch_size).enumerate() {
            let items = chunk
                .iter()
                .map(|raw| assembler.assemble(raw)?.record.to_upsert(&registry))
                .collect::<Result<Vec<_>>>()?;

            debug!(batch = index, size = items.len(), "Sending record batch");
            stored.extend(self.upsert_bulk(&items).await?);
        }

        info!(records = stored.len(), "Logged records");
        Ok(stored)
    }

    /// Fetches every record, resolved against the dataset settings.
    pub async fn fetch_all(&self) -> Result<Vec<Record>> {
        let settings = self.datasets().settings(self.dataset_id).await?;
        self.fetch_with(&settings).await
    }

    async fn fetch_with(&self, settings: &crate::Settings) -> Result<Vec<Record>> {
        let registry = settings.registry()?;
        let mut pager = self.pages(Pagination::DEFAULT_LIMIT);
        let mut records = Vec::new();
        while let Some(model) = pager.next().await? {
            records.push(Record::from_model(model, &registry));
        }
        Ok(records)
    }

    /// Exports every record as a dictionary. All rows share the same keys.
    #[instrument(skip(self), fields(dataset_id = %self.dataset_id))]
    pub async fn export(&self, mode: FlattenMode) -> Result<Vec<Map<String, Value>>> {
        let settings = self.datasets().settings(self.dataset_id).await?;
        let records = self.fetch_with(&settings).await?;
        let registry = settings.registry()?;
        Ok(RecordFlattener::new(&registry).flatten_batch(&records, mode))
    }

    /// Downloads the dataset, its settings and all records into an archive.
    pub async fn archive(&self) -> Result<DatasetArchive> {
        let datasets = self.datasets();
        let dataset = datasets.get(self.dataset_id).await?;
        let settings = datasets.settings_of(&dataset).await?;
        let records = self.fetch_with(&settings).await?;
        Ok(DatasetArchive {
            dataset: Some(dataset),
            settings,
            records,
        })
    }

    fn datasets(&self) -> DatasetsService {
        DatasetsService::new(Arc::clone(&self.http))
    }
}

impl std::fmt::Debug for RecordsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordsService")
            .field("dataset_id", &self.dataset_id)
            .finish_non_exhaustive()
    }
}

/// Pages through the records of a dataset.
///
/// A page is requested only once the previous one has been consumed.
#[derive(Debug)]
pub struct RecordPager {
    service: RecordsService,
    page: Pagination,
    buffer: VecDeque<RecordModel>,
    exhausted: bool,
}

impl RecordPager {
    fn new(service: RecordsService, page: Pagination) -> Self {
        Self {
            service,
            page,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Returns the next record, or `None` after the last one.
    pub async fn next(&mut self) -> Result<Option<RecordModel>> {
        if self.buffer.is_empty() && !self.exhausted {
            self.fetch().await?;
        }
        Ok(self.buffer.pop_front())
    }

    /// Returns the rest of the current page, fetching a new one if needed.
    pub async fn next_page(&mut self) -> Result<Option<Vec<RecordModel>>> {
        if self.buffer.is_empty() && !self.exhausted {
            self.fetch().await?;
        }
        if self.buffer.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.buffer.drain(..).collect()))
    }

    async fn fetch(&mut self) -> Result<()> {
        let page = self.service.list(self.page).await?;
        let received = page.items.len();
        debug!(
            offset = self.page.offset,
            received,
            total = page.total,
            "Fetched record page"
        );

        let next = self.page.next();
        self.exhausted = received < self.page.limit as usize
            || (page.total > 0 && next.offset >= page.total);
        self.page = next;
        self.buffer.extend(page.items);
        Ok(())
    }
}
