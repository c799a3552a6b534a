//! Script entity model and DTOs.

use serde::{Deserialize, Serialize};
use stagecraft_core::types::{DbId, Timestamp, UserId};

/// A saved stage script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub id: DbId,
    pub title: String,
    pub content: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub user_id: UserId,
    pub created_at: Timestamp,
}

/// DTO for creating a script. The owner comes from the request identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScript {
    pub title: String,
    pub content: String,
    pub genre: String,
    pub description: Option<String>,
}

/// DTO for updating a script. Only provided fields are applied.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScript {
    pub title: Option<String>,
    pub content: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
}
