/// Errors from the completion client and stream decoder.
///
/// Malformed individual records are not errors; the decoder skips them.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The HTTP request itself failed (network, DNS, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx status code.
    #[error("LLM API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The byte stream failed after the response started.
    #[error("Completion stream interrupted: {0}")]
    Stream(String),

    /// No API key is configured for the upstream endpoint.
    #[error("LLM API key is not configured")]
    NotConfigured,
}
