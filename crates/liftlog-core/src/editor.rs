//! Draft editing and reconciliation for a single open workout.
//!
//! One [`DraftEditor`] owns the mutable working copy of a record and
//! mediates between three writers: remote hydration, local field edits,
//! and the debounced autosave flush. The governing rule is that local
//! edits are never silently overwritten — once editing has begun, a
//! remote refresh for the same record is dropped, not merged.

use crate::model::{ExerciseEntry, Workout};
use crate::store::OptimisticStore;

/// Quiet period after the last edit before the working copy is flushed.
pub const AUTOSAVE_DEBOUNCE_MS: u64 = 650;

/// Which record identity is currently hydrated into this editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedIdentity {
    /// Nothing loaded; the editor is inert.
    None,
    /// A fresh, never-stored draft.
    New,
    /// A record copied from the collection store.
    Existing(String),
}

/// An armed debounce deadline, capturing the edit sequence at schedule
/// time so a flush can tell whether later edits superseded it.
#[derive(Debug, Clone, Copy)]
struct PendingFlush {
    deadline_ms: u64,
    edit_seq: u64,
}

/// The editor state machine for one open workout draft.
#[derive(Debug)]
pub struct DraftEditor {
    draft: Option<Workout>,
    loaded: LoadedIdentity,
    /// Local edits exist that are not yet confirmed flushed to the store.
    dirty: bool,
    /// Bumped on every local edit; detects staleness of a scheduled flush.
    edit_seq: u64,
    /// True for the window where the working copy is being overwritten
    /// from an external snapshot; suppresses autosave scheduling.
    hydrating: bool,
    pending: Option<PendingFlush>,
    debounce_ms: u64,
}

impl Default for DraftEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftEditor {
    pub fn new() -> Self {
        Self {
            draft: None,
            loaded: LoadedIdentity::None,
            dirty: false,
            edit_seq: 0,
            hydrating: false,
            pending: None,
            debounce_ms: AUTOSAVE_DEBOUNCE_MS,
        }
    }

    /// The working copy, if one is loaded.
    pub fn draft(&self) -> Option<&Workout> {
        self.draft.as_ref()
    }

    pub fn loaded(&self) -> &LoadedIdentity {
        &self.loaded
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_hydrating(&self) -> bool {
        self.hydrating
    }

    /// Whether a debounce flush is currently armed.
    pub fn has_pending_flush(&self) -> bool {
        self.pending.is_some()
    }

    // ---- hydration ----------------------------------------------------

    /// Initialize a fresh default draft.
    ///
    /// Idempotent while a new draft is already open, so a re-render cannot
    /// generate a second record id for the same editing session.
    pub fn open_new(&mut self, now_ms: u64) {
        if self.loaded == LoadedIdentity::New && self.draft.is_some() {
            return;
        }
        self.pending = None;
        self.draft = Some(Workout::new(now_ms));
        self.loaded = LoadedIdentity::New;
        self.dirty = false;
        self.hydrating = true;
    }

    /// Hydrate the working copy from a store snapshot.
    ///
    /// Skipped entirely when this identity is already loaded, or when
    /// local edits are pending: local edits always win over a remote
    /// refresh, even if that means the refresh is dropped. Returns
    /// whether hydration happened.
    pub fn open_existing(&mut self, snapshot: &Workout) -> bool {
        if self.loaded == LoadedIdentity::Existing(snapshot.id.clone()) {
            return false;
        }
        if self.dirty {
            log::debug!(
                "skipping hydration of {}: local edits pending",
                snapshot.id
            );
            return false;
        }
        self.pending = None;
        self.loaded = LoadedIdentity::Existing(snapshot.id.clone());
        self.draft = Some(snapshot.clone());
        self.dirty = false;
        self.hydrating = true;
        true
    }

    // ---- local edits --------------------------------------------------

    pub fn set_title(&mut self, title: &str, now_ms: u64) {
        if let Some(draft) = self.draft.as_mut() {
            draft.title = title.to_string();
            self.touch(now_ms);
        }
    }

    pub fn set_note(&mut self, note: &str, now_ms: u64) {
        if let Some(draft) = self.draft.as_mut() {
            draft.note = note.to_string();
            self.touch(now_ms);
        }
    }

    pub fn set_date(&mut self, date_ms: u64, now_ms: u64) {
        if let Some(draft) = self.draft.as_mut() {
            draft.date_ms = date_ms;
            self.touch(now_ms);
        }
    }

    pub fn add_exercise(&mut self, name: &str, now_ms: u64) {
        if let Some(draft) = self.draft.as_mut() {
            draft.add_exercise(name);
            self.touch(now_ms);
        }
    }

    pub fn remove_exercise(&mut self, index: usize, now_ms: u64) {
        if let Some(draft) = self.draft.as_mut() {
            draft.remove_exercise(index);
            self.touch(now_ms);
        }
    }

    pub fn add_set(&mut self, exercise: usize, now_ms: u64) {
        if let Some(entry) = self.exercise_mut(exercise) {
            entry.add_set();
            self.touch(now_ms);
        }
    }

    pub fn remove_set(&mut self, exercise: usize, set: usize, now_ms: u64) {
        if let Some(entry) = self.exercise_mut(exercise) {
            entry.remove_set(set);
            self.touch(now_ms);
        }
    }

    pub fn set_weight(&mut self, exercise: usize, set: usize, weight_kg: f64, now_ms: u64) {
        if let Some(entry) = self.set_mut(exercise, set) {
            entry.weight_kg = weight_kg;
            self.touch(now_ms);
        }
    }

    pub fn set_reps(&mut self, exercise: usize, set: usize, reps: u32, now_ms: u64) {
        if let Some(entry) = self.set_mut(exercise, set) {
            entry.reps = reps;
            self.touch(now_ms);
        }
    }

    pub fn toggle_set_completed(&mut self, exercise: usize, set: usize, now_ms: u64) {
        if let Some(entry) = self.set_mut(exercise, set) {
            entry.completed = !entry.completed;
            self.touch(now_ms);
        }
    }

    fn exercise_mut(&mut self, exercise: usize) -> Option<&mut ExerciseEntry> {
        self.draft.as_mut()?.exercises.get_mut(exercise)
    }

    fn set_mut(&mut self, exercise: usize, set: usize) -> Option<&mut crate::model::SetEntry> {
        self.exercise_mut(exercise)?.sets.get_mut(set)
    }

    fn touch(&mut self, now_ms: u64) {
        self.dirty = true;
        self.edit_seq += 1;
        self.schedule_flush(now_ms);
    }

    /// (Re)arm the single debounce deadline. An empty draft is not worth
    /// persisting, so it disarms instead.
    fn schedule_flush(&mut self, now_ms: u64) {
        if self.hydrating || !self.dirty {
            return;
        }
        let Some(draft) = self.draft.as_ref() else {
            return;
        };
        if draft.exercises.is_empty() {
            self.pending = None;
            return;
        }
        self.pending = Some(PendingFlush {
            deadline_ms: now_ms + self.debounce_ms,
            edit_seq: self.edit_seq,
        });
    }

    // ---- explicit save paths ------------------------------------------

    /// Toggle the session timer and flush immediately.
    pub fn toggle_timer(&mut self, now_ms: u64, store: &mut OptimisticStore) {
        if let Some(draft) = self.draft.as_mut() {
            draft.toggle_timer(now_ms);
            self.dirty = true;
            self.edit_seq += 1;
            self.flush_now(store);
        }
    }

    /// Complete the workout and flush immediately. Finishing a draft
    /// with no exercises follows the same rule as closing one: the
    /// stored record (if any) is deleted, and no empty stub is upserted.
    pub fn finish(&mut self, now_ms: u64, store: &mut OptimisticStore) {
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        draft.finish(now_ms);
        self.edit_seq += 1;
        if draft.exercises.is_empty() {
            let id = draft.id.clone();
            self.pending = None;
            if store.get(&id).is_some() {
                store.delete(&id);
            }
            self.dirty = false;
        } else {
            self.dirty = true;
            self.flush_now(store);
        }
    }

    /// Reopen a completed workout and flush immediately.
    pub fn resume(&mut self, store: &mut OptimisticStore) {
        if let Some(draft) = self.draft.as_mut() {
            draft.resume();
            self.dirty = true;
            self.edit_seq += 1;
            self.flush_now(store);
        }
    }

    /// Navigate-away-with-save. A draft with no exercises is deleted from
    /// the store (if it was ever stored) rather than left as an empty
    /// stub; anything else is upserted. The editor returns to empty.
    pub fn save_and_close(&mut self, store: &mut OptimisticStore) {
        self.pending = None;
        if let Some(draft) = self.draft.take() {
            if draft.exercises.is_empty() {
                if store.get(&draft.id).is_some() {
                    store.delete(&draft.id);
                }
            } else {
                store.upsert(draft);
            }
        }
        self.reset();
    }

    /// Discard the working copy without saving, cancelling any pending
    /// flush. Used on unmount or before loading a different identity.
    pub fn discard(&mut self) {
        self.pending = None;
        self.draft = None;
        self.reset();
    }

    fn reset(&mut self) {
        self.loaded = LoadedIdentity::None;
        self.dirty = false;
        self.hydrating = false;
    }

    // ---- scheduling ---------------------------------------------------

    /// Advance the editor's timers. Call once per frame (or scheduling
    /// tick): closes the hydration window and fires the debounce flush
    /// when its deadline has passed.
    pub fn tick(&mut self, now_ms: u64, store: &mut OptimisticStore) {
        self.hydrating = false;
        let Some(pending) = self.pending else {
            return;
        };
        if now_ms < pending.deadline_ms {
            return;
        }
        self.pending = None;
        self.flush(pending.edit_seq, store);
    }

    /// Flush immediately, superseding any armed debounce deadline.
    fn flush_now(&mut self, store: &mut OptimisticStore) {
        self.pending = None;
        self.flush(self.edit_seq, store);
    }

    /// Write the current working copy to the store. The flush is always
    /// the latest state, never a stale snapshot; `dirty` clears only if
    /// no edit arrived after the flush was scheduled.
    fn flush(&mut self, scheduled_seq: u64, store: &mut OptimisticStore) {
        let Some(draft) = self.draft.as_ref() else {
            return;
        };
        store.upsert(draft.clone());
        if self.loaded == LoadedIdentity::New {
            // The record now exists in the store; later refreshes for it
            // must hit the already-loaded guard.
            self.loaded = LoadedIdentity::Existing(draft.id.clone());
        }
        if self.edit_seq == scheduled_seq {
            self.dirty = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SetEntry;

    fn editor_with_exercise(now_ms: u64) -> DraftEditor {
        let mut scratch = OptimisticStore::new();
        let mut editor = DraftEditor::new();
        editor.open_new(now_ms);
        editor.tick(now_ms, &mut scratch);
        editor.add_exercise("Squat", now_ms);
        editor
    }

    #[test]
    fn test_open_new_is_idempotent_per_instance() {
        let mut editor = DraftEditor::new();
        editor.open_new(0);
        let first_id = editor.draft().expect("draft").id.clone();

        // A re-render re-requests the new draft; no second id appears.
        editor.open_new(5);
        assert_eq!(editor.draft().expect("draft").id, first_id);
    }

    #[test]
    fn test_hydration_clears_dirty_and_marks_window() {
        let mut editor = DraftEditor::new();
        let snapshot = Workout::new(0);

        assert!(editor.open_existing(&snapshot));
        assert!(editor.is_hydrating());
        assert!(!editor.is_dirty());

        let mut store = OptimisticStore::new();
        editor.tick(1, &mut store);
        assert!(!editor.is_hydrating());
    }

    #[test]
    fn test_same_identity_is_hydrated_once() {
        let mut editor = DraftEditor::new();
        let mut snapshot = Workout::new(0);
        assert!(editor.open_existing(&snapshot));

        // The store refreshed with different content for the same record.
        snapshot.title = "refreshed".to_string();
        assert!(!editor.open_existing(&snapshot));
        assert_eq!(editor.draft().expect("draft").title, crate::model::DEFAULT_TITLE);
    }

    #[test]
    fn test_dirty_draft_wins_over_remote_refresh() {
        let mut store = OptimisticStore::new();
        let mut editor = DraftEditor::new();
        let snapshot = Workout::new(0);
        editor.open_existing(&snapshot);
        editor.tick(1, &mut store);

        editor.add_exercise("Bench", 10);
        editor.set_title("my edit", 20);
        assert!(editor.is_dirty());

        // Refresh arrives for a different record while dirty: dropped too.
        let other = Workout::new(50);
        assert!(!editor.open_existing(&other));
        assert_eq!(editor.draft().expect("draft").title, "my edit");
        assert_eq!(editor.draft().expect("draft").id, snapshot.id);
    }

    #[test]
    fn test_autosave_coalesces_rapid_edits_into_one_upsert() {
        let mut store = OptimisticStore::new();
        let mut editor = editor_with_exercise(0);

        // Five rapid edits inside one debounce window.
        editor.set_title("a", 100);
        editor.set_note("b", 200);
        editor.set_weight(0, 0, 60.0, 300);
        editor.set_reps(0, 0, 5, 350);
        editor.set_title("final", 400);

        // Quiet period not yet over.
        editor.tick(400 + AUTOSAVE_DEBOUNCE_MS - 1, &mut store);
        assert_eq!(store.records().len(), 0);
        assert!(editor.is_dirty());

        editor.tick(400 + AUTOSAVE_DEBOUNCE_MS, &mut store);
        assert_eq!(store.records().len(), 1);
        assert_eq!(store.records()[0].title, "final");
        assert_eq!(store.records()[0].exercises[0].sets[0].reps, 5);
        assert!(!editor.is_dirty());

        // Nothing further scheduled.
        editor.tick(10_000, &mut store);
        assert_eq!(store.pending_ops(), 1);
    }

    #[test]
    fn test_new_edit_restarts_the_quiet_period() {
        let mut store = OptimisticStore::new();
        let mut editor = editor_with_exercise(0);

        editor.set_title("first", 100);
        // The second edit re-arms the single deadline rather than
        // stacking another; the first deadline never fires.
        editor.set_title("second", 700);
        editor.tick(100 + AUTOSAVE_DEBOUNCE_MS, &mut store);
        assert_eq!(store.records().len(), 0);

        editor.tick(700 + AUTOSAVE_DEBOUNCE_MS, &mut store);
        assert_eq!(store.records().len(), 1);
        assert_eq!(store.records()[0].title, "second");
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_empty_draft_is_never_autosaved() {
        let mut store = OptimisticStore::new();
        let mut editor = DraftEditor::new();
        editor.open_new(0);
        editor.tick(0, &mut store);

        editor.set_title("just a title", 10);
        assert!(!editor.has_pending_flush());
        editor.tick(10_000, &mut store);
        assert_eq!(store.records().len(), 0);
    }

    #[test]
    fn test_empty_draft_deleted_on_close() {
        let mut store = OptimisticStore::new();
        let mut editor = editor_with_exercise(0);
        let id = editor.draft().expect("draft").id.clone();

        // Flush once so the record exists in the store.
        editor.set_weight(0, 0, 40.0, 100);
        editor.tick(100 + AUTOSAVE_DEBOUNCE_MS, &mut store);
        assert!(store.get(&id).is_some());

        // Removing the only exercise empties the draft and disarms the
        // debounce; navigating away deletes instead of upserting a stub.
        editor.remove_exercise(0, 2_000);
        assert!(!editor.has_pending_flush());
        editor.save_and_close(&mut store);

        assert!(store.get(&id).is_none());
        assert_eq!(*editor.loaded(), LoadedIdentity::None);
    }

    #[test]
    fn test_finish_of_empty_draft_deletes_instead_of_upserting() {
        let mut store = OptimisticStore::new();
        let mut editor = editor_with_exercise(0);
        let id = editor.draft().expect("draft").id.clone();

        editor.set_weight(0, 0, 40.0, 100);
        editor.tick(100 + AUTOSAVE_DEBOUNCE_MS, &mut store);
        assert!(store.get(&id).is_some());

        // Emptying the draft and then finishing takes the deletion
        // branch, same as navigating away.
        editor.remove_exercise(0, 2_000);
        editor.finish(2_100, &mut store);

        assert!(store.get(&id).is_none());
        assert!(!editor.is_dirty());
        assert!(!editor.has_pending_flush());
    }

    #[test]
    fn test_finish_of_never_stored_empty_draft_upserts_nothing() {
        let mut store = OptimisticStore::new();
        let mut editor = DraftEditor::new();
        editor.open_new(0);
        editor.tick(0, &mut store);

        editor.finish(100, &mut store);

        assert_eq!(store.records().len(), 0);
        assert_eq!(store.pending_ops(), 0);
    }

    #[test]
    fn test_edits_during_hydration_window_do_not_arm_autosave() {
        let mut store = OptimisticStore::new();
        let mut editor = DraftEditor::new();
        let mut snapshot = Workout::new(0);
        snapshot.add_exercise("Curl");
        editor.open_existing(&snapshot);
        assert!(editor.is_hydrating());

        // An edit landing before the hydration window closes must not
        // arm the debounce.
        editor.set_title("early edit", 5);
        assert!(editor.is_dirty());
        assert!(!editor.has_pending_flush());

        // After the window closes, editing schedules normally.
        editor.tick(10, &mut store);
        editor.set_title("later edit", 20);
        assert!(editor.has_pending_flush());
    }

    #[test]
    fn test_close_of_never_stored_empty_draft_touches_nothing() {
        let mut store = OptimisticStore::new();
        let mut editor = DraftEditor::new();
        editor.open_new(0);
        editor.save_and_close(&mut store);

        assert_eq!(store.records().len(), 0);
        assert_eq!(store.pending_ops(), 0);
    }

    #[test]
    fn test_save_and_close_flushes_pending_edits() {
        let mut store = OptimisticStore::new();
        let mut editor = editor_with_exercise(0);

        editor.set_title("leaving now", 100);
        assert!(editor.has_pending_flush());
        editor.save_and_close(&mut store);

        assert_eq!(store.records().len(), 1);
        assert_eq!(store.records()[0].title, "leaving now");
        assert!(!editor.has_pending_flush());
    }

    #[test]
    fn test_discard_cancels_pending_flush() {
        let mut store = OptimisticStore::new();
        let mut editor = editor_with_exercise(0);
        editor.set_title("doomed", 100);

        editor.discard();
        editor.tick(10_000, &mut store);

        assert_eq!(store.records().len(), 0);
        assert!(editor.draft().is_none());
    }

    #[test]
    fn test_timer_toggle_flushes_immediately() {
        let t0 = 1_000_000;
        let mut store = OptimisticStore::new();
        let mut editor = editor_with_exercise(t0);

        editor.toggle_timer(t0, &mut store);
        assert_eq!(store.records().len(), 1);
        assert!(store.records()[0].is_running());
        assert!(!editor.is_dirty());

        editor.toggle_timer(t0 + 5_000, &mut store);
        assert_eq!(store.records()[0].elapsed_secs, 5);

        editor.toggle_timer(t0 + 5_000, &mut store);
        editor.finish(t0 + 8_000, &mut store);
        let record = store.records()[0].clone();
        assert_eq!(record.elapsed_secs, 8);
        assert_eq!(record.started_at_ms, None);
        assert!(record.completed);
    }

    #[test]
    fn test_first_flush_of_new_draft_claims_its_identity() {
        let mut store = OptimisticStore::new();
        let mut editor = editor_with_exercise(0);

        editor.set_title("fresh", 100);
        editor.tick(100 + AUTOSAVE_DEBOUNCE_MS, &mut store);
        let id = store.records()[0].id.clone();
        assert_eq!(*editor.loaded(), LoadedIdentity::Existing(id.clone()));

        // The refreshed store offering the record back does not rehydrate.
        let snapshot = store.get(&id).expect("stored").clone();
        assert!(!editor.open_existing(&snapshot));
    }

    #[test]
    fn test_full_session_against_a_remote() {
        use crate::clock::{Clock, ManualClock};
        use crate::storage::{MemoryRemote, RemoteStore};

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

        let clock = ManualClock::at(1_000_000);
        let remote = MemoryRemote::new();
        let mut store = OptimisticStore::new();
        let mut editor = DraftEditor::new();

        // Plan a session, let the debounce persist it.
        editor.open_new(clock.now_ms());
        editor.tick(clock.now_ms(), &mut store);
        editor.add_exercise("Squat", clock.now_ms());
        editor.set_weight(0, 0, 100.0, clock.now_ms());
        clock.advance(AUTOSAVE_DEBOUNCE_MS);
        editor.tick(clock.now_ms(), &mut store);
        assert_eq!(store.records().len(), 1);

        // Run the timer for five minutes, then finish.
        editor.toggle_timer(clock.now_ms(), &mut store);
        clock.advance(5 * 60 * 1_000);
        editor.finish(clock.now_ms(), &mut store);
        editor.save_and_close(&mut store);

        block_on(store.flush_remote(&remote));
        let listed = block_on(remote.list()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].elapsed_secs, 300);
        assert!(listed[0].completed);

        // A fresh mirror sees the same record after refresh.
        let mut rehydrated = OptimisticStore::new();
        block_on(rehydrated.refresh_from_remote(&remote)).unwrap();
        assert_eq!(rehydrated.records().len(), 1);
    }

    #[test]
    fn test_remove_last_set_keeps_exercise_nonempty() {
        let mut editor = editor_with_exercise(0);
        editor.set_weight(0, 0, 100.0, 10);

        editor.remove_set(0, 0, 20);
        let draft = editor.draft().expect("draft");
        assert_eq!(draft.exercises[0].sets.len(), 1);
        assert_eq!(draft.exercises[0].sets[0], SetEntry::default());
    }
}
