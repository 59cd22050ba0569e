//! Exchange lifecycle: the state machine and the caller's handle.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Lifecycle of one streaming exchange.
///
/// ```text
/// Idle → Requesting → Streaming → Completed
///             │            ├────→ Cancelled
///             │            └────→ Failed
///             ├──────────────────→ Failed
///             └──────────────────→ Cancelled
/// ```
///
/// Terminal states have no outgoing transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeState {
    /// Not started. Handles are returned already `Requesting`.
    Idle,
    /// Request sent, waiting for response headers.
    Requesting,
    /// Reading the event stream.
    Streaming,
    /// The byte stream ended normally.
    Completed,
    /// The caller cancelled the exchange.
    Cancelled,
    /// The request or the stream failed.
    Failed,
}

impl ExchangeState {
    /// Whether the exchange is over.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }

    /// Whether `self → next` is a legal transition.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use ExchangeState::*;
        matches!(
            (self, next),
            (Idle, Requesting)
                | (Requesting, Streaming | Failed | Cancelled)
                | (Streaming, Completed | Cancelled | Failed)
        )
    }
}

/// Handle to one in-flight streaming exchange.
///
/// Returned by [`StreamController::start_stream`](crate::StreamController::start_stream).
/// Dropping the handle does not cancel the exchange; the turn keeps filling
/// in the shared conversation until the stream ends.
#[derive(Debug)]
pub struct ExchangeHandle {
    pub(crate) cancel: CancellationToken,
    pub(crate) state: watch::Receiver<ExchangeState>,
    pub(crate) snapshots: mpsc::UnboundedReceiver<String>,
    pub(crate) task: JoinHandle<ExchangeState>,
    pub(crate) turn_index: usize,
}

impl ExchangeHandle {
    /// Request cancellation. The read loop stops at its next suspension
    /// point and the turn keeps the text accumulated so far.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A clone of the exchange's cancellation token.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ExchangeState {
        *self.state.borrow()
    }

    /// A receiver that observes every state change.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<ExchangeState> {
        self.state.clone()
    }

    /// Index of the model turn this exchange fills.
    #[must_use]
    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    /// Next full-text snapshot of the turn.
    ///
    /// The first snapshot is always `""` (the seeded turn); each later one
    /// is the complete accumulated text after a delta. Returns `None` once
    /// the exchange has ended and all snapshots were taken.
    pub async fn next_snapshot(&mut self) -> Option<String> {
        self.snapshots.recv().await
    }

    /// Stop publishing snapshots and drop any that are queued.
    ///
    /// The turn in the shared conversation keeps filling; only the
    /// per-delta copies stop. [`next_snapshot`](Self::next_snapshot)
    /// returns `None` afterwards.
    pub fn close_snapshots(&mut self) {
        self.snapshots.close();
        while self.snapshots.try_recv().is_ok() {}
    }

    /// Number of snapshots published but not yet taken.
    #[must_use]
    pub fn queued_snapshots(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the exchange task has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the exchange to end and return its terminal state.
    pub async fn wait(self) -> ExchangeState {
        match self.task.await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(error = %e, "exchange task did not finish cleanly");
                ExchangeState::Failed
            }
        }
    }
}
