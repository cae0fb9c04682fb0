//! LiftLog Core Library
//!
//! Platform-agnostic gesture recognition, draft reconciliation, and sync
//! logic for the LiftLog workout tracker.

pub mod clock;
pub mod editor;
pub mod gesture;
pub mod input;
pub mod media;
pub mod model;
pub mod reveal;
pub mod storage;
pub mod store;
pub mod swipe;

pub use clock::{Clock, ManualClock, SystemClock};
pub use editor::{DraftEditor, LoadedIdentity};
pub use gesture::{GestureDetector, GestureEvent};
pub use input::PointerEvent;
pub use media::{MediaSlot, MediaState};
pub use model::{ExerciseEntry, SetEntry, Workout};
pub use reveal::{ReleaseOutcome, RevealSide, RevealState};
pub use store::{OptimisticStore, RemoteOp};
pub use swipe::{SwipeDetector, SwipeDirection};
