//! Async media resolution with stale-result protection.
//!
//! A component kicks off a fetch for a media reference, then may be
//! disposed or restarted before the result arrives. Each fetch is stamped
//! with a generation number; results carrying a stale stamp, or arriving
//! after disposal, are ignored so they never mutate disposed state.

/// Resolution state of one media reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

/// Holder for one asynchronously resolved media resource.
#[derive(Debug)]
pub struct MediaSlot<T> {
    state: MediaState<T>,
    generation: u64,
    disposed: bool,
}

impl<T> Default for MediaSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MediaSlot<T> {
    pub fn new() -> Self {
        Self {
            state: MediaState::Idle,
            generation: 0,
            disposed: false,
        }
    }

    pub fn state(&self) -> &MediaState<T> {
        &self.state
    }

    /// Begin a fetch, invalidating any in-flight one. The returned stamp
    /// must be passed back with the result.
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        if !self.disposed {
            self.state = MediaState::Loading;
        }
        self.generation
    }

    /// Deliver a successful result. Returns false if the result was
    /// stale or the slot was disposed, in which case it is discarded.
    pub fn resolve(&mut self, stamp: u64, resource: T) -> bool {
        if self.disposed || stamp != self.generation {
            return false;
        }
        self.state = MediaState::Ready(resource);
        true
    }

    /// Deliver a failure. Stale and post-disposal failures are discarded.
    pub fn fail(&mut self, stamp: u64, message: impl Into<String>) -> bool {
        if self.disposed || stamp != self.generation {
            return false;
        }
        self.state = MediaState::Failed(message.into());
        true
    }

    /// Mark the owning component as gone; all outstanding results are
    /// dropped on arrival.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.state = MediaState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_current_stamp_lands() {
        let mut slot = MediaSlot::new();
        let stamp = slot.begin_fetch();
        assert_eq!(*slot.state(), MediaState::Loading);

        assert!(slot.resolve(stamp, "image-bytes"));
        assert_eq!(*slot.state(), MediaState::Ready("image-bytes"));
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut slot = MediaSlot::new();
        let first = slot.begin_fetch();
        let second = slot.begin_fetch();

        assert!(!slot.resolve(first, "old"));
        assert_eq!(*slot.state(), MediaState::Loading);

        assert!(slot.resolve(second, "new"));
        assert_eq!(*slot.state(), MediaState::Ready("new"));
    }

    #[test]
    fn test_disposed_slot_ignores_results() {
        let mut slot = MediaSlot::new();
        let stamp = slot.begin_fetch();
        slot.dispose();

        assert!(!slot.resolve(stamp, "late"));
        assert!(!slot.fail(stamp, "late error"));
        assert_eq!(*slot.state(), MediaState::Idle);
    }

    #[test]
    fn test_failure_is_recorded() {
        let mut slot: MediaSlot<&str> = MediaSlot::new();
        let stamp = slot.begin_fetch();

        assert!(slot.fail(stamp, "404"));
        assert_eq!(*slot.state(), MediaState::Failed("404".to_string()));
    }
}
