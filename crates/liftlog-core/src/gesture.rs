//! Tap vs long-press classification for a single pointer session.

use crate::input::PointerEvent;
use kurbo::Point;

/// Default hold duration before a press becomes a long-press.
pub const LONG_PRESS_MS: u64 = 500;
/// Maximum movement from the start point (per axis) before the session
/// is cancelled and yields neither gesture.
pub const MOVE_TOLERANCE: f64 = 10.0;

/// Classified outcome of a pointer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    Tap,
    LongPress,
}

/// Transient state for one pointer-down-to-up lifecycle.
#[derive(Debug, Clone, Copy)]
struct PressSession {
    start: Point,
    /// When the hold timer fires.
    deadline_ms: u64,
    /// Long-press already emitted; suppresses the subsequent tap.
    fired: bool,
    /// Movement tolerance exceeded; neither gesture will fire.
    cancelled: bool,
}

/// Classifies a pointer interaction stream into tap or long-press.
///
/// Feed pointer events through [`GestureDetector::handle`] and call
/// [`GestureDetector::poll`] once per frame so the hold timer can fire
/// mid-press. For any single session at most one event is emitted.
#[derive(Debug, Clone)]
pub struct GestureDetector {
    hold_ms: u64,
    session: Option<PressSession>,
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureDetector {
    /// Create a detector with the default hold duration.
    pub fn new() -> Self {
        Self::with_hold(LONG_PRESS_MS)
    }

    /// Create a detector with a custom hold duration.
    pub fn with_hold(hold_ms: u64) -> Self {
        Self {
            hold_ms,
            session: None,
        }
    }

    /// Whether a press session is currently active.
    pub fn is_pressed(&self) -> bool {
        self.session.is_some()
    }

    /// Process a pointer event. Returns the classified gesture, if any.
    pub fn handle(&mut self, event: PointerEvent, now_ms: u64) -> Option<GestureEvent> {
        match event {
            PointerEvent::Down { position } => {
                self.session = Some(PressSession {
                    start: position,
                    deadline_ms: now_ms + self.hold_ms,
                    fired: false,
                    cancelled: false,
                });
                None
            }
            PointerEvent::Move { position } => {
                if let Some(session) = self.session.as_mut() {
                    let dx = (position.x - session.start.x).abs();
                    let dy = (position.y - session.start.y).abs();
                    if dx > MOVE_TOLERANCE || dy > MOVE_TOLERANCE {
                        session.cancelled = true;
                    }
                }
                None
            }
            PointerEvent::Up { .. } => {
                let session = self.session.take()?;
                if session.cancelled || session.fired {
                    return None;
                }
                // The deadline may have elapsed without a poll in between;
                // the press still classifies as a long-press, never both.
                if now_ms >= session.deadline_ms {
                    Some(GestureEvent::LongPress)
                } else {
                    Some(GestureEvent::Tap)
                }
            }
            PointerEvent::Leave => {
                self.session = None;
                None
            }
        }
    }

    /// Fire the hold timer if its deadline has passed.
    ///
    /// Emits [`GestureEvent::LongPress`] at most once per session; the
    /// eventual pointer-up is then swallowed.
    pub fn poll(&mut self, now_ms: u64) -> Option<GestureEvent> {
        let session = self.session.as_mut()?;
        if session.cancelled || session.fired || now_ms < session.deadline_ms {
            return None;
        }
        session.fired = true;
        Some(GestureEvent::LongPress)
    }
}
