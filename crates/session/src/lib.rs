//! Client-side session state for character chat and script generation.
//!
//! - [`chat::ChatSession`] -- the send/stream/finalize state machine.
//! - [`script::ScriptSession`] -- script generation plus preview/edit modes.
//! - [`history`] -- transcript persistence keyed by character name.
//! - [`client`] -- HTTP client for the stagecraft server, including the
//!   `/api/chat` streaming proxy.

pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod script;
pub mod source;

use serde::{Deserialize, Serialize};
use stagecraft_core::prompts::CharacterProfile;
use stagecraft_core::types::DbId;

/// Who the current user is and which server they talk to.
///
/// Built once at startup and passed to whatever needs identity.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user: String,
    pub base_url: String,
}

/// The character a session is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCharacter {
    pub id: DbId,
    pub profile: CharacterProfile,
}

impl From<&stagecraft_db::models::character::Character> for SessionCharacter {
    fn from(character: &stagecraft_db::models::character::Character) -> Self {
        Self {
            id: character.id,
            profile: character.profile(),
        }
    }
}
