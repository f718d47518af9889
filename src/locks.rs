use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Per-game mutual exclusion. Every mutating command holds the guard for
/// its game id across the whole read-validate-mutate-persist section, so
/// at most one mutation is in flight per game at any time. Commands for
/// different games run fully in parallel.
///
/// Entries are never removed; a finished game keeps its mutex for the
/// process lifetime.
#[derive(Default)]
pub struct GameLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl GameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and take the exclusive section for a game. The guard is
    /// released on drop, on every exit path.
    pub async fn acquire(&self, game_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(game_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
