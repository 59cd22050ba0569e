//! Internal helpers for mapping reqwest failures to [`ExchangeError`].

use relay_types::ExchangeError;

/// Map a non-success response to [`ExchangeError::Status`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ExchangeError {
    ExchangeError::status(status.as_u16(), body)
}

/// Map a [`reqwest::Error`] raised before the body started.
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ExchangeError {
    ExchangeError::Network(Box::new(err))
}

/// Map a [`reqwest::Error`] raised while the body was being read.
pub(crate) fn map_body_error(err: reqwest::Error) -> ExchangeError {
    ExchangeError::Stream(err.to_string())
}
