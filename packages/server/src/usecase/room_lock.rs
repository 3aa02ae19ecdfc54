//! Per-room serialization.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::RoomId;

/// Holds one or more room locks; dropping it releases them.
pub struct RoomGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

const DEFAULT_PRUNE_THRESHOLD: usize = 64;

struct LockTable {
    entries: HashMap<RoomId, Arc<AsyncMutex<()>>>,
    /// Table size at which idle entries are swept next.
    prune_at: usize,
}

impl LockTable {
    /// Drop entries nobody holds or awaits, then double the next sweep point
    /// relative to what survived, so sweeps stay amortized O(1) per acquisition.
    fn prune_if_full(&mut self, base: usize) {
        if self.entries.len() < self.prune_at {
            return;
        }
        // An entry only referenced by the map is neither held nor awaited.
        self.entries.retain(|_, mutex| Arc::strong_count(mutex) > 1);
        self.prune_at = base.max(self.entries.len() * 2);
    }
}

/// Lazily created async mutex per room id.
///
/// Rooms are locked in sorted order so that callers holding two rooms (a room
/// switch) cannot deadlock with each other. Idle entries are swept once the
/// table reaches its prune threshold.
pub struct RoomLocks {
    locks: Mutex<LockTable>,
    prune_threshold: usize,
}

impl Default for RoomLocks {
    fn default() -> Self {
        Self::with_prune_threshold(DEFAULT_PRUNE_THRESHOLD)
    }
}

impl RoomLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prune_threshold(prune_threshold: usize) -> Self {
        let prune_threshold = prune_threshold.max(1);
        Self {
            locks: Mutex::new(LockTable {
                entries: HashMap::new(),
                prune_at: prune_threshold,
            }),
            prune_threshold,
        }
    }

    pub async fn lock(&self, room_id: &RoomId) -> RoomGuard {
        self.lock_all([room_id]).await
    }

    pub async fn lock_all<'a, I>(&self, room_ids: I) -> RoomGuard
    where
        I: IntoIterator<Item = &'a RoomId>,
    {
        let mut room_ids: Vec<&RoomId> = room_ids.into_iter().collect();
        room_ids.sort();
        room_ids.dedup();

        let mutexes: Vec<Arc<AsyncMutex<()>>> = {
            let mut table = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            table.prune_if_full(self.prune_threshold);
            room_ids
                .iter()
                .map(|room_id| table.entries.entry((*room_id).clone()).or_default().clone())
                .collect()
        };

        let mut guards = Vec::with_capacity(mutexes.len());
        for mutex in mutexes {
            guards.push(mutex.lock_owned().await);
        }
        RoomGuard { _guards: guards }
    }

    /// Number of rooms with a lock entry.
    pub fn tracked_rooms(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }
}
