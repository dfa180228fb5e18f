//! Suggestions and responses of individual records.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::Result;
use crate::models::{ItemList, ResponseUpsert, SuggestionModel, UserResponseModel};

use super::super::http::HttpClient;

/// Service for record suggestions.
#[derive(Clone)]
pub struct SuggestionsService {
    http: Arc<HttpClient>,
}

impl SuggestionsService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists the suggestions of a record.
    pub async fn list(&self, record_id: Uuid) -> Result<Vec<SuggestionModel>> {
        let list: ItemList<SuggestionModel> = self
            .http
            .get(&format!("/api/v1/records/{record_id}/suggestions"))
            .await?;
        Ok(list.into_inner())
    }

    /// Creates or replaces the suggestion for the suggestion's question.
    pub async fn upsert(
        &self,
        record_id: Uuid,
        suggestion: &SuggestionModel,
    ) -> Result<SuggestionModel> {
        self.http
            .put(&format!("/api/v1/records/{record_id}/suggestions"), suggestion)
            .await
    }

    /// Deletes a suggestion.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.http.delete(&format!("/api/v1/suggestions/{id}")).await
    }
}

/// Service for user responses.
///
/// Responses are always written as the user of the API key.
#[derive(Clone)]
pub struct ResponsesService {
    http: Arc<HttpClient>,
}

impl ResponsesService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Creates the current user's response to a record.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use argilla_sdk::ArgillaClient;
    /// # use argilla_sdk::models::{ResponseStatus, ResponseUpsert};
    /// # async fn example(client: ArgillaClient, record_id: uuid::Uuid) -> Result<(), argilla_sdk::Error> {
    /// let response = ResponseUpsert::new(ResponseStatus::Submitted).with_value("sentiment", "positive");
    /// client.responses().create(record_id, &response).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(
        &self,
        record_id: Uuid,
        response: &ResponseUpsert,
    ) -> Result<UserResponseModel> {
        self.http
            .post(&format!("/api/v1/records/{record_id}/responses"), response)
            .await
    }

    /// Replaces a response.
    pub async fn update(&self, id: Uuid, response: &ResponseUpsert) -> Result<UserResponseModel> {
        self.http
            .put(&format!("/api/v1/responses/{id}"), response)
            .await
    }

    /// Deletes a response.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.http.delete(&format!("/api/v1/responses/{id}")).await
    }
}

impl std::fmt::Debug for SuggestionsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionsService").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for ResponsesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponsesService").finish_non_exhaustive()
    }
}
