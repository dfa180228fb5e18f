//! Authentication providers.

use std::fmt;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};

use super::{Authenticator, API_KEY_HEADER};
use crate::error::{Error, Result};

/// API key authentication.
#[derive(Clone)]
pub struct ApiKeyAuth {
    api_key: SecretString,
}

impl ApiKeyAuth {
    /// Creates an API key authenticator.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
        }
    }
}

#[async_trait]
impl Authenticator for ApiKeyAuth {
    async fn authenticate(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let key = self.api_key.expose_secret();
        if key.is_empty() {
            return Err(Error::unauthorized("API key is empty"));
        }
        Ok(request.header(API_KEY_HEADER, key.as_str()))
    }
}

impl fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Bearer token authentication.
#[derive(Clone)]
pub struct BearerAuth {
    token: SecretString,
}

impl BearerAuth {
    /// Creates a bearer token authenticator.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::new(token.into()),
        }
    }
}

#[async_trait]
impl Authenticator for BearerAuth {
    async fn authenticate(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        Ok(request.bearer_auth(self.token.expose_secret()))
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// No authentication, for local servers with auth disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

#[async_trait]
impl Authenticator for NoAuth {
    async fn authenticate(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        Ok(request)
    }
}

/// The authentication method of a client.
#[derive(Clone, Default)]
pub enum AuthProvider {
    /// API key in the `X-Argilla-Api-Key` header.
    ApiKey(ApiKeyAuth),
    /// Bearer token.
    Bearer(BearerAuth),
    /// No credentials.
    #[default]
    None,
}

impl AuthProvider {
    /// API key authentication.
    #[must_use]
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(ApiKeyAuth::new(key))
    }

    /// Bearer token authentication.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(BearerAuth::new(token))
    }

    /// Returns true when credentials are configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[async_trait]
impl Authenticator for AuthProvider {
    async fn authenticate(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        match self {
            Self::ApiKey(auth) => auth.authenticate(request).await,
            Self::Bearer(auth) => auth.authenticate(request).await,
            Self::None => NoAuth.authenticate(request).await,
        }
    }
}

impl fmt::Debug for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(auth) => write!(f, "AuthProvider::ApiKey({auth:?})"),
            Self::Bearer(auth) => write!(f, "AuthProvider::Bearer({auth:?})"),
            Self::None => write!(f, "AuthProvider::None"),
        }
    }
}
