//! Transport trait for reaching the model proxy.
//!
//! The trait uses RPITIT (return-position `impl Trait` in traits) and is not
//! object-safe; the stream controller and session are generic over it.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use tokio_util::sync::CancellationToken;

use crate::error::ExchangeError;
use crate::request::{ProxyRequest, ProxyResponse};

/// Incremental response body: raw byte segments in arrival order.
///
/// Segment boundaries carry no meaning; they may split lines, frames or
/// multi-byte characters.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ExchangeError>> + Send>>;

/// A way to send requests to the model proxy.
pub trait Transport: Send + Sync + 'static {
    /// Open a streaming call.
    ///
    /// Resolves once response headers arrive. A non-success status must be
    /// reported as [`ExchangeError::Status`]; tripping `cancel` while waiting
    /// must resolve to [`ExchangeError::Cancelled`].
    fn open_stream(
        &self,
        request: &ProxyRequest,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<ByteStream, ExchangeError>> + Send;

    /// Perform a non-streaming call and decode the reply.
    fn complete(
        &self,
        request: &ProxyRequest,
    ) -> impl Future<Output = Result<ProxyResponse, ExchangeError>> + Send;
}
