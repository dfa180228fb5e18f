//! HTTP client wrapper with authentication and error mapping.

use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument};

use crate::auth::Authenticator;
use crate::error::{ApiError, Error, Result};

use super::config::ArgillaConfig;

/// Shared HTTP client. Requests are sent once; failed statuses become errors.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: ArgillaConfig,
}

impl HttpClient {
    /// Creates a new HTTP client.
    pub fn new(config: &ArgillaConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .brotli(true);

        if !config.tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref proxy_url) = config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| Error::config(format!("Invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ArgillaConfig {
        &self.config
    }

    /// Makes a GET request.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.request(Method::GET, url, Option::<&()>::None).await
    }

    /// Makes a POST request.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        self.request(Method::POST, url, Some(body)).await
    }

    /// Makes a PUT request.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        self.request(Method::PUT, url, Some(body)).await
    }

    /// Makes a PATCH request.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        self.request(Method::PATCH, url, Some(body)).await
    }

    /// Makes a DELETE request, ignoring any response body.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn delete(&self, url: &str) -> Result<()> {
        let full_url = self.config.url(url);
        self.execute(Method::DELETE, &full_url, Option::<&()>::None)
            .await?;
        Ok(())
    }

    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let full_url = self.config.url(url);
        let response = self.execute(method, &full_url, body).await?;
        let bytes = response.bytes().await?;

        // 204 responses decode as `null`, which fits `()` and `Option<T>`.
        let payload: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };

        serde_json::from_slice(payload).map_err(|e| {
            debug!("Failed to parse response: {}", String::from_utf8_lossy(&bytes));
            Error::Serialization(e)
        })
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let mut request = self.client.request(method.clone(), url);
        request = self.config.auth.authenticate(request).await?;

        if let Some(b) = body {
            request = request.json(b);
        }
        request = request.header("Accept", "application/json");

        let response = request.send().await?;
        let status = response.status();
        debug!(%method, %url, status = status.as_u16(), "Request completed");

        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::response_to_error(response).await)
        }
    }

    async fn response_to_error(response: Response) -> Error {
        let status = response.status();

        match response.bytes().await {
            Ok(bytes) => match serde_json::from_slice::<ApiError>(&bytes) {
                Ok(api_error) => api_error.into_error(status.as_u16()),
                Err(_) => Self::status_to_error(status, String::from_utf8_lossy(&bytes).into_owned()),
            },
            Err(_) => Self::status_to_error(status, "Unknown error".to_string()),
        }
    }

    fn status_to_error(status: StatusCode, message: String) -> Error {
        match status {
            StatusCode::BAD_REQUEST => Error::bad_request(message),
            StatusCode::UNAUTHORIZED => Error::unauthorized(message),
            StatusCode::FORBIDDEN => Error::forbidden(message),
            StatusCode::NOT_FOUND => Error::not_found("resource", message),
            StatusCode::CONFLICT => Error::conflict(message),
            StatusCode::UNPROCESSABLE_ENTITY => Error::Unprocessable { message },
            _ => Error::server_error(status.as_u16(), message),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}
