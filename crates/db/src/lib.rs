//! In-memory persistence for stagecraft entities.
//!
//! [`MemStore`] owns every entity; repositories hand out clones. Ids come
//! from one monotonic counter shared by all entity kinds.

use std::sync::Arc;

use stagecraft_core::types::DbId;

pub mod models;
pub mod repositories;
pub mod seed;
mod store;

pub use store::MemStore;

/// Shared handle to the store, cloned into every handler.
pub type DbPool = Arc<MemStore>;

/// Errors raised by the repository layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The row being updated does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// An input references a row that does not exist.
    #[error("Referenced {entity} with id {id} does not exist")]
    MissingReference { entity: &'static str, id: DbId },

    /// A message sequence still holds a streaming placeholder.
    #[error("Message sequence contains a streaming placeholder")]
    InvalidMessages,
}

/// Create a store pre-populated with the Twelfth Night cast.
pub fn create_pool() -> DbPool {
    let mut store = MemStore::new();
    seed::seed_characters(&mut store);
    tracing::debug!(next_id = store.peek_next_id(), "Seeded character data");
    Arc::new(store)
}

/// Create an empty store (used by tests).
pub fn create_empty_pool() -> DbPool {
    Arc::new(MemStore::new())
}

/// Verify the store is reachable.
///
/// Acquiring the read lock proves no writer is wedged holding it.
pub async fn health_check(pool: &DbPool) -> Result<(), DbError> {
    let _tables = pool.read().await;
    Ok(())
}
