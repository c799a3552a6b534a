//! Repository for conversations.

use stagecraft_core::chat::{is_persistable, Message};
use stagecraft_core::types::DbId;

use crate::models::conversation::{Conversation, CreateConversation};
use crate::{DbError, DbPool};

pub struct ConversationRepo;

impl ConversationRepo {
    /// Find the user's conversation with a character (the earliest, if
    /// several were created).
    pub async fn find_for_user(
        pool: &DbPool,
        user_id: &str,
        character_id: DbId,
    ) -> Option<Conversation> {
        pool.read()
            .await
            .conversations
            .values()
            .find(|c| c.user_id == user_id && c.character_id == character_id)
            .cloned()
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Option<Conversation> {
        pool.read().await.conversations.get(&id).cloned()
    }

    /// Create a conversation owned by `user_id`.
    ///
    /// Fails if the character does not exist or the messages still hold a
    /// streaming placeholder.
    pub async fn create(
        pool: &DbPool,
        user_id: &str,
        input: &CreateConversation,
    ) -> Result<Conversation, DbError> {
        if !is_persistable(&input.messages) {
            return Err(DbError::InvalidMessages);
        }
        let mut tables = pool.write().await;
        if !tables.characters.contains_key(&input.character_id) {
            return Err(DbError::MissingReference {
                entity: "Character",
                id: input.character_id,
            });
        }
        let now = chrono::Utc::now();
        let conversation = Conversation {
            id: pool.allocate_id(),
            user_id: user_id.to_string(),
            character_id: input.character_id,
            messages: input.messages.clone(),
            created_at: now,
            updated_at: now,
        };
        tables
            .conversations
            .insert(conversation.id, conversation.clone());
        Ok(conversation)
    }

    /// Replace a conversation's messages wholesale.
    pub async fn update_messages(
        pool: &DbPool,
        id: DbId,
        messages: Vec<Message>,
    ) -> Result<Conversation, DbError> {
        if !is_persistable(&messages) {
            return Err(DbError::InvalidMessages);
        }
        let mut tables = pool.write().await;
        let conversation = tables
            .conversations
            .get_mut(&id)
            .ok_or(DbError::NotFound {
                entity: "Conversation",
                id,
            })?;
        conversation.messages = messages;
        conversation.updated_at = chrono::Utc::now();
        Ok(conversation.clone())
    }
}
