//! Wire types for the streamed chat-completion protocol.

use serde::{Deserialize, Serialize};
use stagecraft_core::chat::Message;
use stagecraft_core::prompts::CompletionKind;
use stagecraft_core::types::DbId;

/// Body of `POST /api/chat` on the stagecraft server.
///
/// The server resolves the character, prepends the matching system prompt,
/// and streams the upstream completion back in the same record format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyChatRequest {
    pub character_id: DbId,
    #[serde(default = "default_kind")]
    pub kind: CompletionKind,
    pub messages: Vec<Message>,
}

fn default_kind() -> CompletionKind {
    CompletionKind::Chat
}

/// Body of a streaming `POST /chat/completions` request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub stream: bool,
    pub messages: Vec<Message>,
}

impl ChatCompletionRequest {
    /// Build a request with `stream` enabled.
    pub fn streaming(model: impl Into<String>, temperature: f32, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            temperature,
            stream: true,
            messages,
        }
    }
}

/// One streamed record: `{"choices":[{"delta":{"content":"..."}}]}`.
///
/// Every level is optional on the wire; missing pieces decode to "no delta".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// A chunk carrying a single text delta.
    pub fn with_delta(text: impl Into<String>) -> Self {
        Self {
            choices: vec![ChunkChoice {
                delta: ChunkDelta {
                    content: Some(text.into()),
                },
            }],
        }
    }

    /// The text of `choices[0].delta.content`, if present and non-empty.
    pub fn into_delta(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|text| !text.is_empty())
    }
}
