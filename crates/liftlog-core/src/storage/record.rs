//! Wire shape for stored workout records.
//!
//! Records persist as top-level indexed fields (identity, date, title,
//! completion) plus a nested payload carrying everything else. The split
//! matches what the remote indexes on; the core only requires that the
//! round-trip is lossless.

use crate::model::{ExerciseEntry, Workout};
use serde::{Deserialize, Serialize};

/// Top-level stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    pub date_ms: u64,
    pub title: String,
    pub completed: bool,
    pub payload: StoredPayload,
}

/// The nested, unindexed remainder of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPayload {
    pub note: String,
    pub exercises: Vec<ExerciseEntry>,
    pub elapsed_secs: u64,
    pub started_at_ms: Option<u64>,
}

impl From<&Workout> for StoredRecord {
    fn from(workout: &Workout) -> Self {
        Self {
            id: workout.id.clone(),
            date_ms: workout.date_ms,
            title: workout.title.clone(),
            completed: workout.completed,
            payload: StoredPayload {
                note: workout.note.clone(),
                exercises: workout.exercises.clone(),
                elapsed_secs: workout.elapsed_secs,
                started_at_ms: workout.started_at_ms,
            },
        }
    }
}

impl From<StoredRecord> for Workout {
    fn from(record: StoredRecord) -> Self {
        Self {
            id: record.id,
            date_ms: record.date_ms,
            title: record.title,
            completed: record.completed,
            note: record.payload.note,
            exercises: record.payload.exercises,
            elapsed_secs: record.payload.elapsed_secs,
            started_at_ms: record.payload.started_at_ms,
        }
    }
}
