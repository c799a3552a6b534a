//! Stream decoder for newline-delimited `data:` records.
//!
//! Each record is either blank, `data: [DONE]`, or `data: <json>` whose
//! `choices[0].delta.content` carries the next text fragment. Network reads
//! do not respect record boundaries, so undecoded bytes (including partial
//! UTF-8 sequences) stay buffered until a full line is available.

use std::collections::VecDeque;
use std::pin::Pin;

use futures::stream::{self, BoxStream, Stream, StreamExt};

use crate::error::LlmError;
use crate::messages::ChatCompletionChunk;

/// Record prefix for payload lines.
pub const DATA_PREFIX: &str = "data:";

/// Payload that terminates a stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// A lazy, finite, single-use sequence of text deltas.
pub type DeltaStream = BoxStream<'static, Result<String, LlmError>>;

/// Outcome of decoding one complete record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedRecord {
    Delta(String),
    Done,
}

/// Incremental line decoder. Feed it raw bytes as they arrive.
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    buf: Vec<u8>,
}

impl SseLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes and return every record completed by them, in order.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<DecodedRecord> {
        self.buf.extend_from_slice(bytes);
        let mut records = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            if let Some(record) = decode_line(&line) {
                records.push(record);
            }
        }
        records
    }

    /// Decode whatever is left once the byte stream has closed.
    pub fn finish(&mut self) -> Option<DecodedRecord> {
        let rest = std::mem::take(&mut self.buf);
        decode_line(&rest)
    }

    /// Number of bytes waiting for a line terminator.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}

/// Decode one line. Blank, non-data, malformed, and delta-less records
/// yield `None`.
fn decode_line(line: &[u8]) -> Option<DecodedRecord> {
    let line = String::from_utf8_lossy(line);
    let payload = line.trim().strip_prefix(DATA_PREFIX)?.trim();
    if payload.is_empty() {
        return None;
    }
    if payload == DONE_SENTINEL {
        return Some(DecodedRecord::Done);
    }
    match serde_json::from_str::<ChatCompletionChunk>(payload) {
        Ok(chunk) => chunk.into_delta().map(DecodedRecord::Delta),
        Err(e) => {
            tracing::trace!(error = %e, "Skipping malformed stream record");
            None
        }
    }
}

struct DecodeState<S> {
    inner: Pin<Box<S>>,
    decoder: SseLineDecoder,
    pending: VecDeque<String>,
    finished: bool,
}

impl<S> DecodeState<S> {
    fn absorb(&mut self, records: impl IntoIterator<Item = DecodedRecord>) {
        for record in records {
            match record {
                DecodedRecord::Delta(text) => self.pending.push_back(text),
                DecodedRecord::Done => {
                    self.finished = true;
                    break;
                }
            }
        }
    }
}

/// Turn a byte stream into a [`DeltaStream`].
///
/// The returned stream ends at `[DONE]`, when the byte stream closes, or
/// right after yielding the first transport error.
pub fn decode_stream<S, B, E>(bytes: S) -> DeltaStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<LlmError> + Send + 'static,
{
    let state = DecodeState {
        inner: Box::pin(bytes),
        decoder: SseLineDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            if let Some(text) = st.pending.pop_front() {
                return Some((Ok(text), st));
            }
            if st.finished {
                return None;
            }
            match st.inner.next().await {
                Some(Ok(chunk)) => {
                    let records = st.decoder.push(chunk.as_ref());
                    st.absorb(records);
                }
                Some(Err(e)) => {
                    st.finished = true;
                    return Some((Err(e.into()), st));
                }
                None => {
                    let tail = st.decoder.finish();
                    st.absorb(tail);
                    st.finished = true;
                }
            }
        }
    })
    .boxed()
}
