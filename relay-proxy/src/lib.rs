#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod client;
pub mod config;
pub(crate) mod error;

pub use client::ProxyClient;
pub use config::{CONNECT_TIMEOUT_ENV, ConfigError, ENDPOINT_ENV, ProxyConfig};

// Re-export relay-types for convenience
pub use relay_types::{ByteStream, ExchangeError, ProxyRequest, ProxyResponse, Transport};
