#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod decoder;
pub mod utf8;

pub use decoder::{DEFAULT_EVENT, DONE_EVENT, Frame, FrameDecoder};
pub use utf8::Utf8Decoder;
