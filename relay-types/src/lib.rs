#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod error;
pub mod request;
pub mod transport;
pub mod types;

pub use error::ExchangeError;
pub use request::{HistoryEntry, HistoryPart, ProxyRequest, ProxyResponse};
pub use transport::{ByteStream, Transport};
pub use types::*;
