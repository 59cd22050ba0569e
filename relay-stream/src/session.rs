//! A chat session: send, stop, clear over one conversation.

use std::sync::Arc;

use relay_types::{ConversationTurn, GenerationConfig, ProxyRequest, Transport};

use crate::controller::StreamController;
use crate::conversation::{Conversation, SharedConversation};
use crate::exchange::{ExchangeHandle, ExchangeState};

/// Errors from [`Session`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Another exchange is still in flight.
    #[error("an exchange is already in progress")]
    Busy,
    /// The prompt was empty or whitespace.
    #[error("prompt is empty")]
    EmptyPrompt,
}

/// One conversation plus the settings used for each send.
///
/// At most one exchange runs at a time. In streaming mode the reply fills
/// a model turn through a [`StreamController`]; otherwise the whole reply
/// arrives in one response, with prior turns sent as history.
///
/// The conversation is the source of truth. Per-delta snapshots on the
/// exchange handle are off unless enabled with
/// [`snapshots`](Self::snapshots).
pub struct Session<T> {
    controller: StreamController<T>,
    config: GenerationConfig,
    streaming: bool,
    snapshots: bool,
    current: Option<ExchangeHandle>,
}

impl<T: Transport> Session<T> {
    /// A streaming session with default generation settings.
    pub fn new(transport: T) -> Self {
        Self::with_conversation(Arc::new(transport), Conversation::new().shared())
    }

    /// A session over an existing transport and conversation.
    pub fn with_conversation(transport: Arc<T>, conversation: SharedConversation) -> Self {
        Self {
            controller: StreamController::new(transport, conversation),
            config: GenerationConfig::default(),
            streaming: true,
            snapshots: false,
            current: None,
        }
    }

    /// Replace the generation settings.
    #[must_use]
    pub fn config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Choose streaming or single-response mode.
    #[must_use]
    pub fn streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Keep per-delta snapshots on the handle returned by
    /// [`current`](Self::current). They queue until read.
    #[must_use]
    pub fn snapshots(mut self, enabled: bool) -> Self {
        self.snapshots = enabled;
        self
    }

    /// Switch between streaming and single-response mode for later sends.
    pub fn set_streaming(&mut self, streaming: bool) {
        self.streaming = streaming;
    }

    /// Whether sends stream.
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Settings used for the next send.
    pub fn generation_config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Mutable access to the settings used for the next send.
    pub fn generation_config_mut(&mut self) -> &mut GenerationConfig {
        &mut self.config
    }

    /// The shared conversation.
    pub fn conversation(&self) -> &SharedConversation {
        self.controller.conversation()
    }

    /// A copy of the conversation as it is now.
    pub async fn snapshot(&self) -> Conversation {
        self.conversation().read().await.clone()
    }

    /// Whether `prompt` could be sent right now.
    pub async fn can_send(&self, prompt: &str) -> bool {
        !prompt.trim().is_empty() && !self.conversation().read().await.busy
    }

    /// Send `prompt`.
    ///
    /// Clears the previous error and appends the user turn. In streaming
    /// mode this returns as soon as the exchange has started; follow it
    /// with [`current`](Self::current) or [`wait`](Self::wait). In
    /// single-response mode it returns after the reply (or error) has been
    /// recorded.
    pub async fn send(&mut self, prompt: &str) -> Result<(), SessionError> {
        if prompt.trim().is_empty() {
            return Err(SessionError::EmptyPrompt);
        }

        let history = {
            let mut conversation = self.conversation().write().await;
            if conversation.busy {
                return Err(SessionError::Busy);
            }
            conversation.error = None;
            let history = conversation.turns.clone();
            conversation.push(ConversationTurn::user(prompt));
            if !self.streaming {
                conversation.busy = true;
            }
            history
        };

        if self.streaming {
            let mut handle = self.controller.start_stream(prompt, &self.config).await;
            if !self.snapshots {
                handle.close_snapshots();
            }
            self.current = Some(handle);
        } else {
            self.current = None;
            self.send_once(prompt, &history).await;
        }
        Ok(())
    }

    async fn send_once(&self, prompt: &str, history: &[ConversationTurn]) {
        let request = ProxyRequest::complete(prompt, &self.config, history);
        let result = self.controller.transport().complete(&request).await;

        let mut conversation = self.conversation().write().await;
        conversation.busy = false;
        match result {
            Ok(response) => {
                conversation.push(response.into_turn());
            }
            Err(e) => {
                tracing::warn!(error = %e, "completion failed");
                conversation.error = Some(e.to_string());
            }
        }
    }

    /// Cancel the in-flight streaming exchange, if any.
    pub fn stop(&self) {
        if let Some(handle) = &self.current {
            handle.cancel();
        }
    }

    /// Drop all turns and the error. Refused while an exchange is running.
    pub async fn clear(&mut self) -> Result<(), SessionError> {
        let mut conversation = self.conversation().write().await;
        if conversation.busy {
            return Err(SessionError::Busy);
        }
        conversation.turns.clear();
        conversation.error = None;
        drop(conversation);
        self.current = None;
        Ok(())
    }

    /// The most recent streaming exchange.
    pub fn current(&mut self) -> Option<&mut ExchangeHandle> {
        self.current.as_mut()
    }

    /// Wait for the most recent streaming exchange to end.
    ///
    /// Returns `None` when no streaming exchange was started since the
    /// last wait.
    pub async fn wait(&mut self) -> Option<ExchangeState> {
        let handle = self.current.take()?;
        Some(handle.wait().await)
    }
}

impl<T> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("streaming", &self.streaming)
            .field("snapshots", &self.snapshots)
            .field("current", &self.current.as_ref().map(ExchangeHandle::state))
            .finish()
    }
}
