//! Client builder for fluent configuration.

use std::time::Duration;

use crate::auth::AuthProvider;
use crate::error::Result;

use super::config::{ArgillaConfig, DEFAULT_API_URL};
use super::ArgillaClient;

/// Builder for creating an [`ArgillaClient`].
///
/// # Example
///
/// ```rust,no_run
/// use argilla_sdk::ArgillaClient;
/// use std::time::Duration;
///
/// let client = ArgillaClient::builder()
///     .base_url("https://my-argilla.hf.space")
///     .api_key("argilla.apikey")
///     .timeout(Duration::from_secs(120))
///     .build()?;
/// # Ok::<(), argilla_sdk::Error>(())
/// ```
#[derive(Debug, Default)]
#[must_use]
pub struct ArgillaClientBuilder {
    base_url: Option<String>,
    auth: Option<AuthProvider>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    proxy: Option<String>,
    tls_verify: Option<bool>,
}

impl ArgillaClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server URL. Defaults to `http://localhost:6900`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Authenticates with an API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.auth = Some(AuthProvider::api_key(key));
        self
    }

    /// Authenticates with a bearer token.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(AuthProvider::bearer(token));
        self
    }

    /// Sets a custom authentication provider.
    pub fn auth(mut self, auth: AuthProvider) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the request timeout.
    ///
    /// Default: 60 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// Default: 10 seconds.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the proxy URL.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Sets whether to verify TLS certificates.
    ///
    /// Only disable verification for local servers with self-signed
    /// certificates.
    pub fn tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = Some(verify);
        self
    }

    /// Builds the configuration without creating a client.
    pub fn build_config(self) -> ArgillaConfig {
        let mut config =
            ArgillaConfig::new(self.base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()));

        if let Some(auth) = self.auth {
            config = config.with_auth(auth);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            config = config.with_connect_timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        if let Some(proxy) = self.proxy {
            config = config.with_proxy(proxy);
        }
        if let Some(verify) = self.tls_verify {
            config = config.with_tls_verify(verify);
        }
        config
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or proxy is invalid.
    pub fn build(self) -> Result<ArgillaClient> {
        ArgillaClient::new(self.build_config())
    }
}
