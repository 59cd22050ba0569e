//! Endpoint configuration for [`ProxyClient`](crate::ProxyClient).

use std::time::Duration;

/// Environment variable holding the proxy endpoint URL.
pub const ENDPOINT_ENV: &str = "GEMINI_PROXY_URL";

/// Environment variable holding the connect timeout in seconds.
pub const CONNECT_TIMEOUT_ENV: &str = "GEMINI_PROXY_CONNECT_TIMEOUT_SECS";

/// Errors from building a [`ProxyConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No endpoint was configured.
    #[error("GEMINI_PROXY_URL is not set")]
    MissingEndpoint,
    /// The connect timeout could not be parsed.
    #[error("invalid GEMINI_PROXY_CONNECT_TIMEOUT_SECS: {0:?}")]
    InvalidTimeout(String),
    /// The HTTP client could not be built.
    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Where and how to reach the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Full URL the proxy accepts POSTs on.
    pub endpoint: String,
    /// Limit on establishing the connection. The body itself is not
    /// time-limited since streams may run for minutes.
    pub connect_timeout: Option<Duration>,
}

impl ProxyConfig {
    /// Config for `endpoint` with no connect timeout.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_timeout: None,
        }
    }

    /// Set the connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Read [`ENDPOINT_ENV`] and [`CONNECT_TIMEOUT_ENV`] from the process
    /// environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// The endpoint is trimmed; a blank value counts as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = lookup(ENDPOINT_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;

        let mut config = Self::new(endpoint);
        if let Some(raw) = lookup(CONNECT_TIMEOUT_ENV) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config = config.connect_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}
