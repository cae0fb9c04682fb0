//! Workout document model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to freshly created workouts.
pub const DEFAULT_TITLE: &str = "Workout";

/// One logged set of an exercise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    pub weight_kg: f64,
    pub reps: u32,
    pub completed: bool,
}

/// An exercise instance within a workout, holding an ordered list of sets.
///
/// Invariant: an exercise always has at least one set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub name: String,
    pub sets: Vec<SetEntry>,
}

impl ExerciseEntry {
    /// Create an exercise with one empty default set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sets: vec![SetEntry::default()],
        }
    }

    /// Append a set, carrying over weight and reps from the last one.
    pub fn add_set(&mut self) {
        let mut set = self.sets.last().cloned().unwrap_or_default();
        set.completed = false;
        self.sets.push(set);
    }

    /// Remove a set by index. Removing the last remaining set replaces it
    /// with one empty default set instead of leaving the exercise empty.
    pub fn remove_set(&mut self, index: usize) {
        if index < self.sets.len() {
            self.sets.remove(index);
        }
        if self.sets.is_empty() {
            self.sets.push(SetEntry::default());
        }
    }
}

/// A full workout record: scheduling, content, and timer state.
///
/// Timer invariants: `started_at_ms` non-null means the session is
/// actively running; a completed workout always has `started_at_ms = None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Unique record identifier.
    pub id: String,
    /// Scheduled date, epoch milliseconds.
    pub date_ms: u64,
    pub title: String,
    pub note: String,
    pub exercises: Vec<ExerciseEntry>,
    pub completed: bool,
    /// Accumulated session time from previous runs.
    pub elapsed_secs: u64,
    /// When the current run started, if the timer is running.
    pub started_at_ms: Option<u64>,
}

impl Workout {
    /// Create a fresh workout scheduled for now.
    pub fn new(now_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date_ms: now_ms,
            title: DEFAULT_TITLE.to_string(),
            note: String::new(),
            exercises: Vec::new(),
            completed: false,
            elapsed_secs: 0,
            started_at_ms: None,
        }
    }

    /// Whether the session timer is currently running.
    pub fn is_running(&self) -> bool {
        self.started_at_ms.is_some()
    }

    /// Total session time including the in-flight run, in seconds.
    pub fn effective_elapsed_secs(&self, now_ms: u64) -> u64 {
        match self.started_at_ms {
            Some(start) => self.elapsed_secs + now_ms.saturating_sub(start) / 1_000,
            None => self.elapsed_secs,
        }
    }

    /// Start the timer if paused, or fold the running time into
    /// `elapsed_secs` and pause.
    pub fn toggle_timer(&mut self, now_ms: u64) {
        match self.started_at_ms.take() {
            Some(start) => self.elapsed_secs += now_ms.saturating_sub(start) / 1_000,
            None => self.started_at_ms = Some(now_ms),
        }
    }

    /// Complete the workout: fold any running time, stop the timer.
    pub fn finish(&mut self, now_ms: u64) {
        if let Some(start) = self.started_at_ms.take() {
            self.elapsed_secs += now_ms.saturating_sub(start) / 1_000;
        }
        self.completed = true;
    }

    /// Reopen a completed workout without restarting the timer.
    pub fn resume(&mut self) {
        self.completed = false;
    }

    /// Append a new exercise instance.
    pub fn add_exercise(&mut self, name: impl Into<String>) {
        self.exercises.push(ExerciseEntry::new(name));
    }

    /// Remove an exercise instance by index.
    pub fn remove_exercise(&mut self, index: usize) {
        if index < self.exercises.len() {
            self.exercises.remove(index);
        }
    }

    /// Copy this workout into a fresh record scheduled for now, with the
    /// timer reset and all completion flags cleared.
    pub fn duplicated(&self, now_ms: u64) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4().to_string();
        copy.date_ms = now_ms;
        copy.completed = false;
        copy.elapsed_secs = 0;
        copy.started_at_ms = None;
        for exercise in &mut copy.exercises {
            for set in &mut exercise.sets {
                set.completed = false;
            }
        }
        copy
    }
}

/// Parse a committed weight field. Empty or non-numeric text coerces to
/// zero; intermediate editing states are the caller's concern.
pub fn commit_weight(text: &str) -> f64 {
    text.trim().parse().unwrap_or(0.0)
}

/// Parse a committed reps field, coercing invalid text to zero.
pub fn commit_reps(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}
