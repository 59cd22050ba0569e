//! Error type shared by transports, the stream controller and sessions.

/// Errors from one exchange with the model proxy.
///
/// The `Display` output of every variant except [`ExchangeError::Cancelled`]
/// is the single human-readable message surfaced to the user.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// The proxy answered with a non-success status.
    ///
    /// `message` is the body's `error` field when present, otherwise
    /// `HTTP <status>`.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message shown to the user.
        message: String,
    },
    /// Network-level failure before a response arrived.
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The response body failed while it was being read.
    #[error("stream error: {0}")]
    Stream(String),
    /// A non-streaming body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The exchange was cancelled by the caller. Never shown as an error.
    #[error("cancelled")]
    Cancelled,
}

impl ExchangeError {
    /// Build a [`ExchangeError::Status`] from a status code and the raw
    /// response body.
    ///
    /// The body is read as `{"error": "..."}`; `{"error": {"message": "..."}}`
    /// is accepted too. Anything else falls back to `HTTP <status>`.
    #[must_use]
    pub fn status(status: u16, body: &str) -> Self {
        let message = error_message(body).unwrap_or_else(|| format!("HTTP {status}"));
        Self::Status { status, message }
    }

    /// Whether this is the caller's own cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

fn error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = json.get("error")?;
    let message = match error {
        serde_json::Value::String(s) => s.as_str(),
        serde_json::Value::Object(obj) => obj.get("message")?.as_str()?,
        _ => return None,
    };
    (!message.is_empty()).then(|| message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_error_field() {
        let err = ExchangeError::status(400, r#"{"error":"prompt is required"}"#);
        assert_eq!(err.to_string(), "prompt is required");
        assert!(matches!(err, ExchangeError::Status { status: 400, .. }));
    }

    #[test]
    fn status_accepts_nested_message() {
        let err = ExchangeError::status(429, r#"{"error":{"message":"quota exceeded"}}"#);
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn status_falls_back_to_code() {
        assert_eq!(ExchangeError::status(502, "Bad Gateway").to_string(), "HTTP 502");
        assert_eq!(ExchangeError::status(500, "{}").to_string(), "HTTP 500");
        assert_eq!(ExchangeError::status(500, r#"{"error":""}"#).to_string(), "HTTP 500");
        assert_eq!(ExchangeError::status(500, r#"{"error":7}"#).to_string(), "HTTP 500");
    }

    #[test]
    fn only_cancelled_is_cancelled() {
        assert!(ExchangeError::Cancelled.is_cancelled());
        assert!(!ExchangeError::Stream("reset".into()).is_cancelled());
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            ExchangeError::Stream("connection reset".into()).to_string(),
            "stream error: connection reset"
        );
        assert_eq!(
            ExchangeError::InvalidResponse("bad json".into()).to_string(),
            "invalid response: bad json"
        );
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(
            ExchangeError::Network(Box::new(io)).to_string(),
            "network error: refused"
        );
    }
}
