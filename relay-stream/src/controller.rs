//! The stream controller: one streaming exchange into a shared conversation.

use std::sync::Arc;

use futures::StreamExt;
use relay_sse::{Frame, FrameDecoder, Utf8Decoder};
use relay_types::{ConversationTurn, ExchangeError, GenerationConfig, ProxyRequest, Transport};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::conversation::SharedConversation;
use crate::exchange::{ExchangeHandle, ExchangeState};

/// Drives streaming exchanges against a [`Transport`].
///
/// Each call to [`start_stream`](Self::start_stream) seeds an empty model
/// turn, then fills it in place as deltas arrive. The turn's text is always
/// the concatenation of every non-empty delta applied so far.
///
/// # Example
///
/// ```no_run
/// # async fn demo() {
/// use std::sync::Arc;
/// use relay_proxy::ProxyClient;
/// use relay_stream::{Conversation, StreamController};
/// use relay_types::GenerationConfig;
///
/// let client = Arc::new(ProxyClient::new("http://localhost:5001/api/gemini"));
/// let controller = StreamController::new(client, Conversation::new().shared());
///
/// let mut handle = controller.start_stream("Hello", &GenerationConfig::default()).await;
/// while let Some(text) = handle.next_snapshot().await {
///     println!("{text}");
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct StreamController<T> {
    transport: Arc<T>,
    conversation: SharedConversation,
}

impl<T> Clone for StreamController<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            conversation: Arc::clone(&self.conversation),
        }
    }
}

impl<T: Transport> StreamController<T> {
    /// Create a controller writing into `conversation`.
    pub fn new(transport: Arc<T>, conversation: SharedConversation) -> Self {
        Self {
            transport,
            conversation,
        }
    }

    /// The transport exchanges are sent over.
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// The conversation exchanges write into.
    pub fn conversation(&self) -> &SharedConversation {
        &self.conversation
    }

    /// Begin streaming a reply to `prompt`.
    ///
    /// Before returning, a model turn with empty text is appended, `busy`
    /// is set, the `""` snapshot is published and the handle reports
    /// [`ExchangeState::Requesting`]. The request itself runs on a spawned
    /// task; use the returned handle to follow or cancel it. Failures never
    /// surface here: they land in the conversation's `error` field and the
    /// handle's terminal state.
    ///
    /// Snapshots queue on the handle until read. Callers that render from
    /// the conversation instead should call
    /// [`ExchangeHandle::close_snapshots`].
    pub async fn start_stream(
        &self,
        prompt: impl Into<String>,
        config: &GenerationConfig,
    ) -> ExchangeHandle {
        let request = ProxyRequest::streaming(prompt, config);
        let cancel = CancellationToken::new();
        let (state_tx, state_rx) = watch::channel(ExchangeState::Requesting);
        let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();

        let turn_index = {
            let mut conversation = self.conversation.write().await;
            conversation.busy = true;
            conversation.push(ConversationTurn::seed())
        };
        let _ = snapshot_tx.send(String::new());

        let exchange = Exchange {
            transport: Arc::clone(&self.transport),
            conversation: Arc::clone(&self.conversation),
            request,
            cancel: cancel.clone(),
            state: state_tx,
            snapshots: snapshot_tx,
            turn_index,
        };
        let span = tracing::info_span!("exchange", model = %config.model, turn = turn_index);
        let task = tokio::spawn(exchange.run().instrument(span));

        ExchangeHandle {
            cancel,
            state: state_rx,
            snapshots: snapshot_rx,
            task,
            turn_index,
        }
    }
}

/// State owned by the spawned exchange task.
struct Exchange<T> {
    transport: Arc<T>,
    conversation: SharedConversation,
    request: ProxyRequest,
    cancel: CancellationToken,
    state: watch::Sender<ExchangeState>,
    snapshots: mpsc::UnboundedSender<String>,
    turn_index: usize,
}

impl<T: Transport> Exchange<T> {
    async fn run(self) -> ExchangeState {
        let outcome = self.drive().await;

        let terminal = match &outcome {
            Ok(()) => ExchangeState::Completed,
            Err(e) if e.is_cancelled() => ExchangeState::Cancelled,
            Err(_) => ExchangeState::Failed,
        };

        {
            let mut conversation = self.conversation.write().await;
            conversation.busy = false;
            if let Err(e) = &outcome {
                if !e.is_cancelled() {
                    tracing::warn!(error = %e, "exchange failed");
                    conversation.error = Some(e.to_string());
                }
            }
        }

        self.advance(terminal);
        tracing::debug!(state = ?terminal, "exchange finished");
        terminal
    }

    async fn drive(&self) -> Result<(), ExchangeError> {
        let mut body = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Err(ExchangeError::Cancelled),
            opened = self.transport.open_stream(&self.request, self.cancel.clone()) => opened?,
        };
        self.advance(ExchangeState::Streaming);

        let mut utf8 = Utf8Decoder::new();
        let mut decoder = FrameDecoder::new();
        let mut accumulated = String::new();

        loop {
            let next = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Err(ExchangeError::Cancelled),
                next = body.next() => next,
            };
            let Some(chunk) = next else { break };

            let text = utf8.decode(&chunk?);
            let frames = decoder.frames(&text);
            if !frames.is_empty() {
                self.apply(frames, &mut accumulated).await?;
            }
        }

        if !decoder.pending().trim().is_empty() || utf8.pending_len() > 0 {
            tracing::debug!(
                pending = decoder.pending().len(),
                "stream ended inside a frame, discarding"
            );
        }
        Ok(())
    }

    /// Apply one chunk's frames under a single write lock.
    async fn apply(&self, frames: Vec<Frame>, accumulated: &mut String) -> Result<(), ExchangeError> {
        let mut conversation = self.conversation.write().await;
        // Cancellation may land while waiting for the lock.
        if self.cancel.is_cancelled() {
            return Err(ExchangeError::Cancelled);
        }

        for frame in frames {
            if frame.is_done() {
                continue;
            }
            let delta = frame.text_delta();
            if delta.is_empty() {
                continue;
            }
            accumulated.push_str(delta);
            if let Some(turn) = conversation.turns.get_mut(self.turn_index) {
                turn.text.clone_from(accumulated);
            }
            tracing::trace!(len = accumulated.len(), event = %frame.event, "applied delta");
            if !self.snapshots.is_closed() {
                let _ = self.snapshots.send(accumulated.clone());
            }
        }
        Ok(())
    }

    fn advance(&self, next: ExchangeState) {
        self.state.send_if_modified(|current| {
            if current.can_transition_to(next) {
                *current = next;
                true
            } else {
                tracing::debug!(from = ?current, to = ?next, "ignoring transition");
                false
            }
        });
    }
}
