use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};

use stagecraft_core::types::{DbId, UserId};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::character::Character;
use crate::models::conversation::Conversation;
use crate::models::rehearsal::Rehearsal;
use crate::models::script::Script;
use crate::models::user::User;

/// Keyed entity maps. `BTreeMap` keeps list endpoints in id (creation) order.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub users: HashMap<UserId, User>,
    pub characters: BTreeMap<DbId, Character>,
    pub conversations: BTreeMap<DbId, Conversation>,
    pub scripts: BTreeMap<DbId, Script>,
    pub rehearsals: BTreeMap<DbId, Rehearsal>,
}

/// Owner of all entity state.
///
/// A single `RwLock` guards every table so multi-table checks (e.g. a
/// rehearsal referencing a script) observe a consistent snapshot.
#[derive(Debug)]
pub struct MemStore {
    tables: RwLock<Tables>,
    next_id: AtomicI64,
}

impl MemStore {
    /// Create an empty store; the first allocated id is 1.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Allocate the next id. Ids are never reused.
    pub(crate) fn allocate_id(&self) -> DbId {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// The id the next allocation will return.
    pub fn peek_next_id(&self) -> DbId {
        self.next_id.load(Ordering::SeqCst)
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }

    /// Direct access while the store is still exclusively owned (seeding).
    pub(crate) fn tables_mut(&mut self) -> &mut Tables {
        self.tables.get_mut()
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}
