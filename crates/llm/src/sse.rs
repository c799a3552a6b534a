//! Encoding of deltas as `data:` records.
//!
//! The server proxy emits exactly the format [`crate::decoder`] consumes, so
//! one decoder serves both the upstream API and the proxy.

use crate::decoder::{DATA_PREFIX, DONE_SENTINEL};
use crate::messages::ChatCompletionChunk;

/// JSON payload for a single delta (without the `data:` prefix).
pub fn encode_delta(text: &str) -> String {
    serde_json::to_string(&ChatCompletionChunk::with_delta(text))
        .unwrap_or_else(|_| String::from("{}"))
}

/// A complete record: `data: <payload>` followed by a blank line.
pub fn format_record(payload: &str) -> String {
    format!("{DATA_PREFIX} {payload}\n\n")
}

/// The terminating `data: [DONE]` record.
pub fn done_record() -> String {
    format_record(DONE_SENTINEL)
}
