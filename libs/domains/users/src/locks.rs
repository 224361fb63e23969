//! Per-user mutual exclusion for read-modify-write sequences.
//!
//! Every signup mutation is a load-mutate-save against the repository.
//! Without serialization, two concurrent updates for the same user race
//! and the loser's write is silently dropped. Holding the user's lock
//! across the whole sequence makes each mutation atomic per user while
//! leaving different users fully concurrent.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Keyed async mutexes, one per user id.
///
/// Lock entries are retained for the life of the process; the map grows
/// with the number of distinct users touched, which the in-memory
/// deployment model already bounds.
#[derive(Debug, Clone, Default)]
pub struct UserLocks {
    locks: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a user, creating it on first use.
    ///
    /// The returned guard keeps the user serialized until dropped.
    pub async fn acquire(&self, user_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(user_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }
}
