//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::auth::AuthProvider;
use crate::error::{Error, Result};

/// Environment variable holding the server URL.
pub const API_URL_ENV: &str = "ARGILLA_API_URL";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "ARGILLA_API_KEY";

/// Server URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:6900";

/// Configuration for the Argilla client.
#[derive(Debug, Clone)]
pub struct ArgillaConfig {
    /// Base URL of the Argilla server, without the `/api/v1` prefix.
    pub base_url: String,

    /// Authentication provider.
    pub auth: AuthProvider,

    /// Request timeout.
    pub timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// User agent string.
    pub user_agent: String,

    /// Optional proxy URL.
    pub proxy: Option<String>,

    /// Whether to verify TLS certificates.
    pub tls_verify: bool,
}

impl ArgillaConfig {
    /// Creates a configuration for the given server.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth: AuthProvider::default(),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            user_agent: crate::USER_AGENT.to_string(),
            proxy: None,
            tls_verify: true,
        }
    }

    /// Reads `ARGILLA_API_URL` and `ARGILLA_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(API_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let mut config = Self::new(base_url);
        if let Some(key) = lookup(API_KEY_ENV).filter(|key| !key.is_empty()) {
            config.auth = AuthProvider::api_key(key);
        }
        config.validate()?;
        Ok(config)
    }

    /// Sets the authentication provider.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthProvider) -> Self {
        self.auth = auth;
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(self, api_key: impl Into<String>) -> Self {
        self.with_auth(AuthProvider::api_key(api_key))
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the proxy URL.
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Sets whether to verify TLS certificates.
    #[must_use]
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Checks the base URL is an absolute http(s) URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] or a configuration error.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(Error::config(format!(
                "unsupported URL scheme '{other}' in {}",
                self.base_url
            ))),
        }
    }

    /// Builds the full URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ArgillaConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
