//! Conversation entity model and DTOs.

use serde::{Deserialize, Serialize};
use stagecraft_core::chat::Message;
use stagecraft_core::types::{DbId, Timestamp, UserId};

/// A user's transcript with one character.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: DbId,
    pub user_id: UserId,
    pub character_id: DbId,
    /// Never contains a streaming placeholder.
    pub messages: Vec<Message>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a conversation. The owner comes from the request identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversation {
    pub character_id: DbId,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// DTO replacing a conversation's messages wholesale.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateConversation {
    pub messages: Vec<Message>,
}
