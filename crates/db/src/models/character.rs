//! Character entity model and DTOs.

use serde::{Deserialize, Serialize};
use stagecraft_core::prompts::CharacterProfile;
use stagecraft_core::types::{DbId, Timestamp};

/// A playable character from a play.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub personality: Option<String>,
    pub background: Option<String>,
    pub play_name: String,
    pub created_at: Timestamp,
}

impl Character {
    /// The identity fields used to build prompts.
    pub fn profile(&self) -> CharacterProfile {
        CharacterProfile {
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            personality: self.personality.clone().unwrap_or_default(),
            background: self.background.clone().unwrap_or_default(),
        }
    }
}

/// DTO for creating a new character.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCharacter {
    pub name: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub personality: Option<String>,
    pub background: Option<String>,
    pub play_name: String,
}
