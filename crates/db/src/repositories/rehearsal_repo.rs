//! Repository for rehearsals.

use stagecraft_core::types::DbId;

use crate::models::rehearsal::{CreateRehearsal, Rehearsal, UpdateRehearsal};
use crate::{DbError, DbPool};

pub struct RehearsalRepo;

impl RehearsalRepo {
    /// List rehearsals in id order, optionally only those owned by `user_id`.
    pub async fn list(pool: &DbPool, user_id: Option<&str>) -> Vec<Rehearsal> {
        pool.read()
            .await
            .rehearsals
            .values()
            .filter(|r| user_id.is_none_or(|u| r.user_id == u))
            .cloned()
            .collect()
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Option<Rehearsal> {
        pool.read().await.rehearsals.get(&id).cloned()
    }

    /// Create a rehearsal. The referenced script must exist.
    pub async fn create(
        pool: &DbPool,
        user_id: &str,
        input: &CreateRehearsal,
    ) -> Result<Rehearsal, DbError> {
        let mut tables = pool.write().await;
        if !tables.scripts.contains_key(&input.script_id) {
            return Err(DbError::MissingReference {
                entity: "Script",
                id: input.script_id,
            });
        }
        let rehearsal = Rehearsal {
            id: pool.allocate_id(),
            script_id: input.script_id,
            user_id: user_id.to_string(),
            notes: input.notes.clone(),
            performance: input.performance.clone(),
            created_at: chrono::Utc::now(),
        };
        tables.rehearsals.insert(rehearsal.id, rehearsal.clone());
        Ok(rehearsal)
    }

    /// Apply the provided fields.
    pub async fn update(
        pool: &DbPool,
        id: DbId,
        input: &UpdateRehearsal,
    ) -> Result<Rehearsal, DbError> {
        let mut tables = pool.write().await;
        if let Some(script_id) = input.script_id {
            if !tables.scripts.contains_key(&script_id) {
                return Err(DbError::MissingReference {
                    entity: "Script",
                    id: script_id,
                });
            }
        }
        let rehearsal = tables.rehearsals.get_mut(&id).ok_or(DbError::NotFound {
            entity: "Rehearsal",
            id,
        })?;
        if let Some(script_id) = input.script_id {
            rehearsal.script_id = script_id;
        }
        if let Some(notes) = &input.notes {
            rehearsal.notes = Some(notes.clone());
        }
        if let Some(performance) = &input.performance {
            rehearsal.performance = Some(performance.clone());
        }
        Ok(rehearsal.clone())
    }
}
