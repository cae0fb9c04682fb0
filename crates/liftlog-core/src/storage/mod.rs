//! Remote persistence contract and backends.
//!
//! The interaction core only requires an opaque collection store with
//! upsert/delete/list; backends here cover tests, ephemeral use, and an
//! offline file store. Records cross this boundary in the flat-plus-
//! payload wire shape defined in [`record`].

mod memory;
mod record;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryRemote;
pub use record::{StoredPayload, StoredRecord};

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileRemote;

use crate::model::Workout;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async storage operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// The remote workout collection contract.
///
/// Implementations must round-trip the full [`Workout`] shape with no
/// loss; the core does not otherwise care how records are stored.
pub trait RemoteStore: Send + Sync {
    /// Insert or replace a record.
    fn upsert(&self, record: &Workout) -> BoxFuture<'_, StorageResult<()>>;

    /// Delete a record by id. Deleting a missing record is not an error.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all records.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<Workout>>>;
}
