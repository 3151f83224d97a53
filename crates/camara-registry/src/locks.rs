// SPDX-FileCopyrightText: 2026 Camara Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-resource mutation locks.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per resource id.
///
/// Holding the guard returned by [`lock`](Self::lock) gives the caller the
/// only in-flight mutation of that resource. Different ids never contend.
/// Entries live only while someone holds or awaits them.
#[derive(Debug, Default)]
pub struct ResourceLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Exclusive access to one resource id.
///
/// Dropping the guard unlocks the id and removes its entry from the table
/// unless another caller is already waiting on it.
#[must_use = "the resource is unlocked as soon as the guard is dropped"]
pub struct ResourceGuard<'a> {
    locks: &'a ResourceLocks,
    id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ResourceGuard<'_> {
    fn drop(&mut self) {
        // The mutex guard keeps its own reference to the entry.
        drop(self.guard.take());
        self.locks.release(&self.id);
    }
}

impl ResourceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `id`.
    pub async fn lock(&self, id: &str) -> ResourceGuard<'_> {
        let lock = self.locks.entry(id.to_string()).or_default().clone();
        let guard = lock.lock_owned().await;
        ResourceGuard {
            locks: self,
            id: id.to_string(),
            guard: Some(guard),
        }
    }

    /// Drops the entry for `id` once nobody holds or awaits it.
    fn release(&self, id: &str) {
        self.locks.remove_if(id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
