//! Scripted transport shared by the relay-stream integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use bytes::Bytes;
use relay_types::{ByteStream, ExchangeError, ProxyRequest, ProxyResponse, Transport};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// What the mock does for the next request.
pub enum Reply {
    /// Open a stream that yields these items then ends.
    Chunks(Vec<Result<Bytes, ExchangeError>>),
    /// Open a stream fed by the test; it ends when the sender drops.
    Live(mpsc::UnboundedReceiver<Result<Bytes, ExchangeError>>),
    /// Fail before any byte arrives.
    Refuse(ExchangeError),
    /// Never answer.
    Hang,
    /// Answer a non-streaming request.
    Response(Result<ProxyResponse, ExchangeError>),
}

/// A transport that replays scripted replies in order and records requests.
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ProxyRequest>>,
}

impl MockTransport {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ProxyRequest> {
        self.requests.lock().expect("test lock poisoned").clone()
    }

    fn next_reply(&self, request: &ProxyRequest) -> Reply {
        self.requests
            .lock()
            .expect("test lock poisoned")
            .push(request.clone());
        self.replies
            .lock()
            .expect("test lock poisoned")
            .pop_front()
            .expect("MockTransport: no more replies configured")
    }
}

impl Transport for MockTransport {
    fn open_stream(
        &self,
        request: &ProxyRequest,
        _cancel: CancellationToken,
    ) -> impl Future<Output = Result<ByteStream, ExchangeError>> + Send {
        let reply = self.next_reply(request);
        async move {
            match reply {
                Reply::Chunks(items) => {
                    let stream: ByteStream = Box::pin(futures::stream::iter(items));
                    Ok(stream)
                }
                Reply::Live(mut rx) => {
                    let stream: ByteStream = Box::pin(async_stream::stream! {
                        while let Some(item) = rx.recv().await {
                            yield item;
                        }
                    });
                    Ok(stream)
                }
                Reply::Refuse(e) => Err(e),
                Reply::Hang => futures::future::pending().await,
                Reply::Response(_) => panic!("MockTransport: streaming request got a completion reply"),
            }
        }
    }

    fn complete(
        &self,
        request: &ProxyRequest,
    ) -> impl Future<Output = Result<ProxyResponse, ExchangeError>> + Send {
        let reply = self.next_reply(request);
        async move {
            match reply {
                Reply::Response(result) => result,
                _ => panic!("MockTransport: completion request got a streaming reply"),
            }
        }
    }
}

/// One `data:` frame carrying a text delta.
pub fn text_frame(text: &str) -> Bytes {
    Bytes::from(format!(
        "event: message\ndata: {}\n\n",
        serde_json::json!({ "text": text })
    ))
}

/// The proxy's closing frame.
pub fn done_frame() -> Bytes {
    Bytes::from_static(b"event: done\ndata: {}\n\n")
}

/// Drain every snapshot the exchange publishes.
pub async fn collect_snapshots(handle: &mut relay_stream::ExchangeHandle) -> Vec<String> {
    let mut snapshots = Vec::new();
    while let Some(text) = handle.next_snapshot().await {
        snapshots.push(text);
    }
    snapshots
}
