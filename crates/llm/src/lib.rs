//! Client side of the streamed chat-completion protocol.
//!
//! - [`decoder`] turns a byte stream of `data: {json}` records into text deltas.
//! - [`api`] issues streaming completion requests over HTTP.
//! - [`sse`] re-encodes deltas in the same record format.
//! - [`messages`] holds the request and chunk wire types.

pub mod api;
pub mod config;
pub mod decoder;
pub mod error;
pub mod messages;
pub mod sse;

pub use decoder::{decode_stream, DeltaStream};
pub use error::LlmError;
