//! Chat message model.
//!
//! A conversation is an ordered sequence of [`Message`]s. The sequence is
//! append-only except for its tail, which may hold a single provisional
//! [`Role::Streaming`] message while a completion is arriving. Persisted
//! sequences never contain that placeholder role.

use serde::{Deserialize, Serialize};

/// Notice appended to a transcript when a completion request fails.
pub const FAILURE_NOTICE: &str = "出错了，请稍后再试。";

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    /// Provisional assistant message, replaced in place while deltas arrive.
    Streaming,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Streaming => "streaming",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// An empty streaming placeholder.
    pub fn placeholder() -> Self {
        Self::new(Role::Streaming, String::new())
    }

    pub fn is_placeholder(&self) -> bool {
        self.role == Role::Streaming
    }
}

/// Whether a message sequence may be written to durable storage.
///
/// Streaming placeholders are transient UI state and must never be persisted.
pub fn is_persistable(messages: &[Message]) -> bool {
    !messages.iter().any(Message::is_placeholder)
}

/// Messages that may be forwarded upstream as conversation history.
///
/// Drops placeholders and any client-supplied system messages; the system
/// prompt is always chosen by the server.
pub fn upstream_history(messages: &[Message]) -> impl Iterator<Item = &Message> {
    messages
        .iter()
        .filter(|m| matches!(m.role, Role::User | Role::Assistant))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&Message::placeholder()).unwrap();
        assert_eq!(json, r#"{"role":"streaming","content":""}"#);

        let msg: Message = serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#).unwrap();
        assert_eq!(msg, Message::assistant("hi"));
    }

    #[test]
    fn placeholder_blocks_persistence() {
        let mut msgs = vec![Message::user("你好")];
        assert!(is_persistable(&msgs));

        msgs.push(Message::placeholder());
        assert!(!is_persistable(&msgs));
    }

    #[test]
    fn upstream_history_keeps_only_dialogue() {
        let msgs = vec![
            Message::system("ignore me"),
            Message::user("a"),
            Message::assistant("b"),
            Message::placeholder(),
        ];
        let kept: Vec<_> = upstream_history(&msgs).cloned().collect();
        assert_eq!(kept, vec![Message::user("a"), Message::assistant("b")]);
    }
}
