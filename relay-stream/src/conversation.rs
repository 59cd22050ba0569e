//! The conversation state a UI renders from.

use std::sync::Arc;

use relay_types::ConversationTurn;
use tokio::sync::RwLock;

/// Conversation shared between the caller and running exchanges.
pub type SharedConversation = Arc<RwLock<Conversation>>;

/// Turns plus the busy flag and the last user-visible error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    /// Turns in order.
    pub turns: Vec<ConversationTurn>,
    /// Whether an exchange is in flight.
    pub busy: bool,
    /// Message of the last failed exchange, cleared on the next send.
    pub error: Option<String>,
}

impl Conversation {
    /// An empty conversation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously saved turns.
    #[must_use]
    pub fn with_turns(turns: Vec<ConversationTurn>) -> Self {
        Self {
            turns,
            ..Self::default()
        }
    }

    /// Wrap in a [`SharedConversation`].
    #[must_use]
    pub fn shared(self) -> SharedConversation {
        Arc::new(RwLock::new(self))
    }

    /// Append a turn and return its index.
    pub fn push(&mut self, turn: ConversationTurn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    /// The last turn, if any.
    #[must_use]
    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_returns_index() {
        let mut conversation = Conversation::new();
        assert_eq!(conversation.push(ConversationTurn::user("a")), 0);
        assert_eq!(conversation.push(ConversationTurn::seed()), 1);
        assert_eq!(conversation.last().unwrap().text, "");
    }

    #[test]
    fn with_turns_starts_idle() {
        let conversation = Conversation::with_turns(vec![ConversationTurn::user("hi")]);
        assert_eq!(conversation.turns.len(), 1);
        assert!(!conversation.busy);
        assert!(conversation.error.is_none());
    }
}
