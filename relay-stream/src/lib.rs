#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod controller;
pub mod conversation;
pub mod exchange;
pub mod session;

pub use controller::StreamController;
pub use conversation::{Conversation, SharedConversation};
pub use exchange::{ExchangeHandle, ExchangeState};
pub use session::{Session, SessionError};
