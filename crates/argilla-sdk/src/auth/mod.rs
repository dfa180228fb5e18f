//! Request authentication.
//!
//! Argilla authenticates API calls with a per-user API key sent in the
//! [`API_KEY_HEADER`] header. Deployments behind an OAuth proxy use a bearer
//! token instead.

mod provider;

pub use provider::{ApiKeyAuth, AuthProvider, BearerAuth, NoAuth};

use async_trait::async_trait;
use reqwest::RequestBuilder;

use crate::error::Result;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-Argilla-Api-Key";

/// Adds credentials to an outgoing request.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Applies credentials to a request.
    async fn authenticate(&self, request: RequestBuilder) -> Result<RequestBuilder>;
}
