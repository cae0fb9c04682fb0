//! Optimistic in-memory mirror of the remote workout collection.
//!
//! All mutations apply to memory first and enqueue a remote operation on
//! an outbox; the host drains the outbox at its own pace. Remote writes
//! are fire-and-forget: failures are logged and dropped, never rolled
//! back, so persistent write failure can leave local and remote state
//! diverged.

use crate::model::Workout;
use crate::storage::{RemoteStore, StorageResult};
use std::collections::VecDeque;

/// A queued remote write.
#[derive(Debug, Clone)]
pub enum RemoteOp {
    Upsert(Workout),
    Delete(String),
}

/// The shared workout collection, passed by handle to whoever needs it.
#[derive(Debug, Default)]
pub struct OptimisticStore {
    /// Records ordered newest-first by scheduled date.
    records: Vec<Workout>,
    outbox: VecDeque<RemoteOp>,
}

impl OptimisticStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, newest-first.
    pub fn records(&self) -> &[Workout] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&Workout> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Replace the mirror wholesale with a refreshed remote listing.
    /// Queued local writes stay on the outbox.
    pub fn hydrate(&mut self, mut records: Vec<Workout>) {
        records.sort_by(|a, b| b.date_ms.cmp(&a.date_ms));
        self.records = records;
    }

    /// Insert or update a record in memory and queue the remote write.
    pub fn upsert(&mut self, record: Workout) {
        self.outbox.push_back(RemoteOp::Upsert(record.clone()));
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        self.records.sort_by(|a, b| b.date_ms.cmp(&a.date_ms));
    }

    /// Remove a record from memory and queue the remote delete.
    /// Returns whether the record existed locally.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let existed = self.records.len() != before;
        if existed {
            self.outbox.push_back(RemoteOp::Delete(id.to_string()));
        }
        existed
    }

    /// Copy a record into a fresh one scheduled for now. Returns the new
    /// record's id. Backs the swipe-reveal "copy" action.
    pub fn duplicate(&mut self, id: &str, now_ms: u64) -> Option<String> {
        let copy = self.get(id)?.duplicated(now_ms);
        let new_id = copy.id.clone();
        self.upsert(copy);
        Some(new_id)
    }

    /// Number of queued remote writes.
    pub fn pending_ops(&self) -> usize {
        self.outbox.len()
    }

    /// Drain the outbox against the remote store. Failed writes are
    /// logged and dropped; memory keeps the optimistic state either way.
    pub async fn flush_remote<R: RemoteStore + ?Sized>(&mut self, remote: &R) {
        while let Some(op) = self.outbox.pop_front() {
            let result = match &op {
                RemoteOp::Upsert(record) => remote.upsert(record).await,
                RemoteOp::Delete(id) => remote.delete(id).await,
            };
            if let Err(e) = result {
                match op {
                    RemoteOp::Upsert(record) => {
                        log::warn!("dropping failed remote upsert of {}: {}", record.id, e);
                    }
                    RemoteOp::Delete(id) => {
                        log::warn!("dropping failed remote delete of {}: {}", id, e);
                    }
                }
            }
        }
    }

    /// Re-list the collection from the remote store and replace the
    /// mirror. The caller decides what to re-hydrate into open editors.
    pub async fn refresh_from_remote<R: RemoteStore + ?Sized>(
        &mut self,
        remote: &R,
    ) -> StorageResult<()> {
        let records = remote.list().await?;
        self.hydrate(records);
        Ok(())
    }
}
