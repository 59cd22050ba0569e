//! Proxy client struct and builder.

use std::future::Future;

use futures::TryStreamExt;
use relay_types::{ByteStream, ExchangeError, ProxyRequest, ProxyResponse, Transport};
use tokio_util::sync::CancellationToken;

use crate::config::{ConfigError, ProxyConfig};
use crate::error::{map_body_error, map_http_status, map_reqwest_error};

/// Client for a Gemini proxy endpoint.
///
/// Implements [`Transport`] for use with the stream controller and
/// session.
///
/// # Example
///
/// ```no_run
/// use relay_proxy::ProxyClient;
///
/// let client = ProxyClient::new("https://example.web.app/api/gemini");
/// ```
#[derive(Debug, Clone)]
pub struct ProxyClient {
    /// URL requests are POSTed to.
    pub(crate) endpoint: String,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl ProxyClient {
    /// Create a client for `endpoint` with a default HTTP client.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from a [`ProxyConfig`].
    pub fn from_config(config: ProxyConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        Ok(Self {
            endpoint: config.endpoint,
            client: builder.build()?,
        })
    }

    /// Create a client configured from the environment.
    ///
    /// See [`ProxyConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_config(ProxyConfig::from_env()?)
    }

    /// Override the endpoint.
    ///
    /// Useful for testing with a local mock server.
    #[must_use]
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// The configured endpoint.
    #[must_use]
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for ProxyClient {
    /// POST `request` and hand back the body as a byte stream once headers
    /// arrive.
    fn open_stream(
        &self,
        request: &ProxyRequest,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<ByteStream, ExchangeError>> + Send {
        let send = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .header("accept", "text/event-stream")
            .json(request)
            .send();
        let endpoint = self.endpoint.clone();
        let model = request.model.clone();

        async move {
            tracing::debug!(url = %endpoint, model = %model, stream = true, "opening stream");

            let response = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(ExchangeError::Cancelled),
                response = send => response.map_err(map_reqwest_error)?,
            };

            let status = response.status();
            if !status.is_success() {
                let body = tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(ExchangeError::Cancelled),
                    body = response.text() => body.unwrap_or_default(),
                };
                return Err(map_http_status(status, &body));
            }

            let stream: ByteStream = Box::pin(response.bytes_stream().map_err(map_body_error));
            Ok(stream)
        }
    }

    /// POST `request` and decode the `{text, usage}` reply.
    fn complete(
        &self,
        request: &ProxyRequest,
    ) -> impl Future<Output = Result<ProxyResponse, ExchangeError>> + Send {
        let send = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(request)
            .send();
        let endpoint = self.endpoint.clone();
        let model = request.model.clone();

        async move {
            tracing::debug!(url = %endpoint, model = %model, stream = false, "sending completion request");

            let response = send.await.map_err(map_reqwest_error)?;
            let status = response.status();
            let body = response.text().await.map_err(map_reqwest_error)?;

            if !status.is_success() {
                return Err(map_http_status(status, &body));
            }

            serde_json::from_str(&body)
                .map_err(|e| ExchangeError::InvalidResponse(format!("invalid JSON response: {e}")))
        }
    }
}
