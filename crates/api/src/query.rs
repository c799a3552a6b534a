//! Query parameter types shared by list handlers.

use serde::Deserialize;
use stagecraft_core::types::DbId;

/// `?play=` filter on the character list.
#[derive(Debug, Deserialize)]
pub struct PlayFilter {
    pub play: Option<String>,
}

/// `?characterId=` selector for the conversation lookup.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSelector {
    pub character_id: Option<DbId>,
}
