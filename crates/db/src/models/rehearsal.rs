//! Rehearsal entity model and DTOs.

use serde::{Deserialize, Serialize};
use stagecraft_core::types::{DbId, Timestamp, UserId};

/// Rehearsal notes against a script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rehearsal {
    pub id: DbId,
    pub script_id: DbId,
    pub user_id: UserId,
    pub notes: Option<String>,
    /// Free-form performance data recorded by the client.
    pub performance: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for creating a rehearsal. The owner comes from the request identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRehearsal {
    pub script_id: DbId,
    pub notes: Option<String>,
    pub performance: Option<serde_json::Value>,
}

/// DTO for updating a rehearsal. Only provided fields are applied.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRehearsal {
    pub script_id: Option<DbId>,
    pub notes: Option<String>,
    pub performance: Option<serde_json::Value>,
}
