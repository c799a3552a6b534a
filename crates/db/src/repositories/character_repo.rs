//! Repository for characters.

use stagecraft_core::types::DbId;

use crate::models::character::{Character, CreateCharacter};
use crate::store::Tables;
use crate::DbPool;

/// Provides read and create operations for characters.
pub struct CharacterRepo;

pub(crate) fn insert_character(tables: &mut Tables, id: DbId, input: &CreateCharacter) -> Character {
    let character = Character {
        id,
        name: input.name.clone(),
        description: input.description.clone(),
        avatar: input.avatar.clone(),
        personality: input.personality.clone(),
        background: input.background.clone(),
        play_name: input.play_name.clone(),
        created_at: chrono::Utc::now(),
    };
    tables.characters.insert(id, character.clone());
    character
}

impl CharacterRepo {
    /// Insert a new character, returning the stored row.
    pub async fn create(pool: &DbPool, input: &CreateCharacter) -> Character {
        let mut tables = pool.write().await;
        let id = pool.allocate_id();
        insert_character(&mut tables, id, input)
    }

    /// Find a character by id.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Option<Character> {
        pool.read().await.characters.get(&id).cloned()
    }

    /// List all characters in id order.
    pub async fn list(pool: &DbPool) -> Vec<Character> {
        pool.read().await.characters.values().cloned().collect()
    }

    /// List characters belonging to a play (exact name match), in id order.
    pub async fn list_by_play(pool: &DbPool, play_name: &str) -> Vec<Character> {
        pool.read()
            .await
            .characters
            .values()
            .filter(|c| c.play_name == play_name)
            .cloned()
            .collect()
    }
}
