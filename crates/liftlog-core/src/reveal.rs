//! Swipeable list row that drags horizontally to reveal an action button.
//!
//! Maps live pointer movement to a bounded horizontal offset, with
//! rubber-band resistance past the bounds, and decides on release whether
//! to snap closed or to one of the revealed positions.

use crate::input::PointerEvent;
use kurbo::Point;

/// Width of the revealed action panel.
pub const ACTION_WIDTH: f64 = 128.0;
/// Combined movement below this is treated as pointer noise; no axis lock.
pub const AXIS_NOISE_THRESHOLD: f64 = 6.0;
/// Horizontal wins the axis lock when `|dx| > AXIS_RATIO * |dy|`.
pub const AXIS_RATIO: f64 = 1.2;
/// Drag amplification so touch dragging feels responsive.
pub const DRAG_AMPLIFICATION: f64 = 1.25;
/// Compression applied to movement past the reveal bound.
pub const RUBBER_BAND_FACTOR: f64 = 0.12;
/// Minimum net drag for a velocity-based open.
pub const FLING_MIN_DRAG: f64 = 12.0;
/// Release speed (px/ms on the drag axis) above which a short drag still opens.
pub const VELOCITY_OPEN_THRESHOLD: f64 = 0.3;

/// Which action panel is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealSide {
    /// Negative offset; the panel under the row's left edge.
    Left,
    /// Positive offset; the panel under the row's right edge.
    Right,
}

/// Locked drag axis for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    /// Vertical gestures are relinquished to ambient scrolling.
    Vertical,
}

/// What the host should do after a pointer-up on the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// A horizontal drag settled; suppress the row's normal tap action.
    Settled { revealed: Option<RevealSide> },
    /// A tap on an open row closed it; suppress the row's tap action.
    ClosedByTap,
    /// Plain tap on a closed row; let it propagate.
    Tap,
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    base_offset: f64,
    start: Point,
    start_ms: u64,
    axis: Option<Axis>,
}

/// Drag-tracking state for one swipeable row.
///
/// The offset is always in `[-ACTION_WIDTH, +ACTION_WIDTH]` after any
/// settle; mid-drag it may transiently exceed the bound by the compressed
/// rubber-band excess.
#[derive(Debug, Clone)]
pub struct RevealState {
    action_width: f64,
    open_threshold: f64,
    offset: f64,
    drag: Option<DragSession>,
}

impl Default for RevealState {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealState {
    /// Create a row with the default action panel width.
    pub fn new() -> Self {
        Self::with_action_width(ACTION_WIDTH)
    }

    /// Create a row with a custom action panel width.
    pub fn with_action_width(action_width: f64) -> Self {
        Self {
            action_width,
            open_threshold: (action_width * 0.18).max(18.0),
            offset: 0.0,
            drag: None,
        }
    }

    /// Current horizontal offset of the row content.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Offset past which a release snaps open.
    pub fn open_threshold(&self) -> f64 {
        self.open_threshold
    }

    /// The locked axis of the in-flight drag, if any.
    pub fn axis(&self) -> Option<Axis> {
        self.drag.and_then(|d| d.axis)
    }

    /// Which panel is currently revealed at rest.
    pub fn revealed_side(&self) -> Option<RevealSide> {
        if self.offset >= self.action_width {
            Some(RevealSide::Right)
        } else if self.offset <= -self.action_width {
            Some(RevealSide::Left)
        } else {
            None
        }
    }

    /// Close the row. Used when a revealed action button is tapped: the
    /// host closes the row and invokes the button's own callback.
    pub fn close(&mut self) {
        self.offset = 0.0;
        self.drag = None;
    }

    /// Process a pointer event against this row.
    pub fn handle(&mut self, event: PointerEvent, now_ms: u64) -> Option<ReleaseOutcome> {
        match event {
            PointerEvent::Down { position } => {
                self.drag = Some(DragSession {
                    base_offset: self.offset,
                    start: position,
                    start_ms: now_ms,
                    axis: None,
                });
                None
            }
            PointerEvent::Move { position } => {
                self.track(position);
                None
            }
            PointerEvent::Up { position } => {
                let session = self.drag.take()?;
                Some(self.release(session, position, now_ms))
            }
            PointerEvent::Leave => {
                // Stream cancelled mid-drag: settle by distance alone.
                let session = self.drag.take()?;
                if session.axis == Some(Axis::Horizontal) {
                    let revealed = self.settle_by_distance();
                    Some(ReleaseOutcome::Settled { revealed })
                } else {
                    None
                }
            }
        }
    }

    fn track(&mut self, position: Point) {
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        let dx = position.x - session.start.x;
        let dy = position.y - session.start.y;

        if session.axis.is_none() {
            if dx.abs() + dy.abs() < AXIS_NOISE_THRESHOLD {
                return;
            }
            session.axis = Some(if dx.abs() > AXIS_RATIO * dy.abs() {
                Axis::Horizontal
            } else {
                Axis::Vertical
            });
        }

        if session.axis == Some(Axis::Horizontal) {
            let raw = session.base_offset + dx * DRAG_AMPLIFICATION;
            self.offset = Self::rubber_band(raw, self.action_width);
        }
    }

    fn release(&mut self, session: DragSession, position: Point, now_ms: u64) -> ReleaseOutcome {
        if session.axis != Some(Axis::Horizontal) {
            // Tap or vertical gesture: an open row closes and swallows the
            // tap; a closed row lets it propagate.
            if self.offset != 0.0 {
                self.offset = 0.0;
                return ReleaseOutcome::ClosedByTap;
            }
            return ReleaseOutcome::Tap;
        }

        let net_dx = position.x - session.start.x;
        let elapsed = now_ms.saturating_sub(session.start_ms).max(1) as f64;
        let velocity = net_dx.abs() / elapsed;
        let fling = velocity > VELOCITY_OPEN_THRESHOLD;

        let revealed = if self.offset > self.open_threshold || (net_dx > FLING_MIN_DRAG && fling) {
            self.offset = self.action_width;
            Some(RevealSide::Right)
        } else if self.offset < -self.open_threshold || (net_dx < -FLING_MIN_DRAG && fling) {
            self.offset = -self.action_width;
            Some(RevealSide::Left)
        } else {
            self.offset = 0.0;
            None
        };
        ReleaseOutcome::Settled { revealed }
    }

    fn settle_by_distance(&mut self) -> Option<RevealSide> {
        if self.offset > self.open_threshold {
            self.offset = self.action_width;
            Some(RevealSide::Right)
        } else if self.offset < -self.open_threshold {
            self.offset = -self.action_width;
            Some(RevealSide::Left)
        } else {
            self.offset = 0.0;
            None
        }
    }

    /// Compress movement past the bound instead of clipping it.
    fn rubber_band(raw: f64, bound: f64) -> f64 {
        if raw > bound {
            bound + (raw - bound) * RUBBER_BAND_FACTOR
        } else if raw < -bound {
            -bound + (raw + bound) * RUBBER_BAND_FACTOR
        } else {
            raw
        }
    }
}
