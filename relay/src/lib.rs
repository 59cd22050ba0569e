#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub use relay_types;
#[cfg(feature = "proxy")]
pub use relay_proxy;
#[cfg(feature = "sse")]
pub use relay_sse;
#[cfg(feature = "stream")]
pub use relay_stream;

/// Happy-path imports.
pub mod prelude {
    pub use relay_types::{
        ConversationTurn, ExchangeError, GenerationConfig, ProxyRequest, ProxyResponse, Role,
        Transport, UsageInfo,
    };

    #[cfg(feature = "sse")]
    pub use relay_sse::{Frame, FrameDecoder, Utf8Decoder};

    #[cfg(feature = "proxy")]
    pub use relay_proxy::{ProxyClient, ProxyConfig};

    #[cfg(feature = "stream")]
    pub use relay_stream::{
        Conversation, ExchangeHandle, ExchangeState, Session, SessionError, SharedConversation,
        StreamController,
    };
}
