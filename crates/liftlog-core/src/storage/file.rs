//! File-backed remote store for native platforms.
//!
//! Stores one JSON file per record in a base directory; stands in for
//! the hosted collection when working offline.

use super::{BoxFuture, RemoteStore, StorageError, StorageResult, StoredRecord};
use crate::model::Workout;
use std::fs;
use std::path::PathBuf;

/// File-backed [`RemoteStore`].
pub struct FileRemote {
    base_path: PathBuf,
}

impl FileRemote {
    /// Create a store rooted at the given directory, creating it if
    /// missing.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {e}"))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create a store in the default per-user data location.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("liftlog").join("workouts"))
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    fn record_path(&self, id: &str) -> PathBuf {
        // Sanitize the id to be safe for filenames.
        let safe_id: String = id
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{safe_id}.json"))
    }
}

impl RemoteStore for FileRemote {
    fn upsert(&self, record: &Workout) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.record_path(&record.id);
        let record = StoredRecord::from(record);
        Box::pin(async move {
            let json = serde_json::to_string_pretty(&record)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            fs::write(&path, json)
                .map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", path.display())))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.record_path(id);
        Box::pin(async move {
            match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StorageError::Io(format!(
                    "Failed to delete {}: {e}",
                    path.display()
                ))),
            }
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<Workout>>> {
        Box::pin(async move {
            let entries = fs::read_dir(&self.base_path)
                .map_err(|e| StorageError::Io(format!("Failed to read storage dir: {e}")))?;

            let mut records = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| StorageError::Io(e.to_string()))?;
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                let json = fs::read_to_string(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to read {}: {e}", path.display()))
                })?;
                let record: StoredRecord = serde_json::from_str(&json)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                records.push(Workout::from(record));
            }
            Ok(records)
        })
    }
}
