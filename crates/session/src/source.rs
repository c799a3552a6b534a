//! The seam between sessions and whatever produces completion deltas.

use async_trait::async_trait;
use stagecraft_llm::messages::ProxyChatRequest;
use stagecraft_llm::{DeltaStream, LlmError};

use crate::client::ApiClient;

/// Opens a delta stream for a completion request.
///
/// Resolving the future means the response has started; errors after that
/// arrive as `Err` items on the stream.
#[async_trait]
pub trait CompletionSource: Send + Sync {
    async fn open(&self, request: &ProxyChatRequest) -> Result<DeltaStream, LlmError>;
}

#[async_trait]
impl CompletionSource for ApiClient {
    async fn open(&self, request: &ProxyChatRequest) -> Result<DeltaStream, LlmError> {
        self.open_chat(request).await
    }
}
