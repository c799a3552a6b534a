//! Transcript persistence keyed by character name.
//!
//! Every store refuses sequences containing a streaming placeholder, so a
//! transcript reloaded later is always a clean user/assistant sequence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use stagecraft_core::chat::{is_persistable, Message};
use stagecraft_core::types::DbId;
use stagecraft_db::models::conversation::{CreateConversation, UpdateConversation};
use tokio::sync::Mutex;

use crate::client::ApiClient;
use crate::error::HistoryError;

/// Storage key for a character's transcript.
pub fn history_key(character_name: &str) -> String {
    format!("chat_history_{character_name}")
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Load a transcript. A missing transcript is an empty one.
    async fn load(&self, character_name: &str) -> Result<Vec<Message>, HistoryError>;

    /// Replace a transcript.
    async fn save(&self, character_name: &str, messages: &[Message]) -> Result<(), HistoryError>;
}

fn ensure_persistable(messages: &[Message]) -> Result<(), HistoryError> {
    if is_persistable(messages) {
        Ok(())
    } else {
        Err(HistoryError::Placeholder)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<HashMap<String, Vec<Message>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn load(&self, character_name: &str) -> Result<Vec<Message>, HistoryError> {
        let entries = self.entries.lock().await;
        Ok(entries
            .get(&history_key(character_name))
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, character_name: &str, messages: &[Message]) -> Result<(), HistoryError> {
        ensure_persistable(messages)?;
        self.entries
            .lock()
            .await
            .insert(history_key(character_name), messages.to_vec());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON files
// ---------------------------------------------------------------------------

/// One `chat_history_<name>.json` file per character under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileHistoryStore {
    dir: PathBuf,
}

impl JsonFileHistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path separators in names are replaced so every key stays inside `dir`.
    pub fn path_for(&self, character_name: &str) -> PathBuf {
        let safe: String = history_key(character_name)
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

#[async_trait]
impl HistoryStore for JsonFileHistoryStore {
    async fn load(&self, character_name: &str) -> Result<Vec<Message>, HistoryError> {
        let path = self.path_for(character_name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, character_name: &str, messages: &[Message]) -> Result<(), HistoryError> {
        ensure_persistable(messages)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(character_name);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(messages)?).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Server conversations
// ---------------------------------------------------------------------------

/// Stores transcripts as conversations on the stagecraft server.
///
/// Character names resolve to ids through the map given at construction.
pub struct ServerHistoryStore {
    client: ApiClient,
    characters: HashMap<String, DbId>,
    conversations: Mutex<HashMap<DbId, DbId>>,
}

impl ServerHistoryStore {
    pub fn new(client: ApiClient, characters: HashMap<String, DbId>) -> Self {
        Self {
            client,
            characters,
            conversations: Mutex::new(HashMap::new()),
        }
    }

    fn character_id(&self, name: &str) -> Result<DbId, HistoryError> {
        self.characters
            .get(name)
            .copied()
            .ok_or_else(|| HistoryError::UnknownCharacter(name.to_string()))
    }
}

#[async_trait]
impl HistoryStore for ServerHistoryStore {
    async fn load(&self, character_name: &str) -> Result<Vec<Message>, HistoryError> {
        let character_id = self.character_id(character_name)?;
        let Some(conversation) = self.client.find_conversation(character_id).await? else {
            return Ok(Vec::new());
        };
        self.conversations
            .lock()
            .await
            .insert(character_id, conversation.id);
        Ok(conversation.messages)
    }

    async fn save(&self, character_name: &str, messages: &[Message]) -> Result<(), HistoryError> {
        ensure_persistable(messages)?;
        let character_id = self.character_id(character_name)?;

        let mut conversations = self.conversations.lock().await;
        let known = match conversations.get(&character_id) {
            Some(id) => Some(*id),
            None => self
                .client
                .find_conversation(character_id)
                .await?
                .map(|c| c.id),
        };

        let saved = match known {
            Some(id) => {
                let input = UpdateConversation {
                    messages: messages.to_vec(),
                };
                self.client.update_conversation(id, &input).await?
            }
            None => {
                let input = CreateConversation {
                    character_id,
                    messages: messages.to_vec(),
                };
                self.client.create_conversation(&input).await?
            }
        };
        conversations.insert(character_id, saved.id);
        Ok(())
    }
}
