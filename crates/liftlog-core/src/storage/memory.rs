//! In-memory remote store for testing and ephemeral use.

use super::{BoxFuture, RemoteStore, StorageError, StorageResult, StoredRecord};
use crate::model::Workout;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory [`RemoteStore`]. Writes can be made to fail on demand so
/// fire-and-forget error paths are testable.
#[derive(Default)]
pub struct MemoryRemote {
    records: RwLock<HashMap<String, StoredRecord>>,
    fail_writes: AtomicBool,
}

impl MemoryRemote {
    /// Create a new empty remote.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent upserts and deletes fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io("simulated write failure".to_string()));
        }
        Ok(())
    }
}

impl RemoteStore for MemoryRemote {
    fn upsert(&self, record: &Workout) -> BoxFuture<'_, StorageResult<()>> {
        let record = StoredRecord::from(record);
        Box::pin(async move {
            self.check_writable()?;
            let mut records = self
                .records
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            records.insert(record.id.clone(), record);
            Ok(())
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            self.check_writable()?;
            let mut records = self
                .records
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            records.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<Workout>>> {
        Box::pin(async move {
            let records = self
                .records
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            Ok(records.values().cloned().map(Workout::from).collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {}
            }
        }
    }

    #[test]
    fn test_upsert_and_list() {
        let remote = MemoryRemote::new();
        let workout = Workout::new(100);
        let id = workout.id.clone();

        block_on(remote.upsert(&workout)).unwrap();
        let listed = block_on(remote.list()).unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let remote = MemoryRemote::new();
        assert!(block_on(remote.delete("nonexistent")).is_ok());
    }

    #[test]
    fn test_upsert_replaces() {
        let remote = MemoryRemote::new();
        let mut workout = Workout::new(100);
        block_on(remote.upsert(&workout)).unwrap();

        workout.title = "updated".to_string();
        block_on(remote.upsert(&workout)).unwrap();

        let listed = block_on(remote.list()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "updated");
    }

    #[test]
    fn test_simulated_write_failure() {
        let remote = MemoryRemote::new();
        remote.set_fail_writes(true);

        let workout = Workout::new(0);
        assert!(matches!(
            block_on(remote.upsert(&workout)),
            Err(StorageError::Io(_))
        ));
        assert!(block_on(remote.list()).unwrap().is_empty());
    }
}
