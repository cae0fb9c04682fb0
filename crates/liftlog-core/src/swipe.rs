//! Directional swipe classification for a completed pointer drag.

use crate::input::PointerEvent;
use kurbo::Point;

/// Minimum displacement on the dominant axis for a drag to count as a swipe.
pub const MIN_SWIPE_DISTANCE: f64 = 50.0;

/// Swipe direction, named for the displacement of the content under the
/// pointer: dragging the finger rightward yields [`SwipeDirection::Right`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Classifies a pointer-down/move/up stream into a swipe direction.
///
/// Ambiguous input resolves to no swipe at all; a drag that does not
/// clearly cross the distance threshold triggers nothing.
#[derive(Debug, Clone)]
pub struct SwipeDetector {
    min_distance: f64,
    start: Option<Point>,
}

impl Default for SwipeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SwipeDetector {
    /// Create a detector with the default minimum distance.
    pub fn new() -> Self {
        Self::with_min_distance(MIN_SWIPE_DISTANCE)
    }

    /// Create a detector with a custom minimum distance.
    pub fn with_min_distance(min_distance: f64) -> Self {
        Self {
            min_distance,
            start: None,
        }
    }

    /// Process a pointer event. Classification happens on pointer-up.
    pub fn handle(&mut self, event: PointerEvent) -> Option<SwipeDirection> {
        match event {
            PointerEvent::Down { position } => {
                self.start = Some(position);
                None
            }
            PointerEvent::Move { .. } => None,
            PointerEvent::Up { position } => {
                let start = self.start.take()?;
                self.classify(start, position)
            }
            PointerEvent::Leave => {
                self.start = None;
                None
            }
        }
    }

    /// Classify a drag by dominant axis and minimum distance.
    ///
    /// Displacement is start-minus-end, applied uniformly on both axes:
    /// a rightward drag produces negative `dx` and maps to `Right`.
    fn classify(&self, start: Point, end: Point) -> Option<SwipeDirection> {
        let dx = start.x - end.x;
        let dy = start.y - end.y;

        if dx.abs() > dy.abs() {
            if dx.abs() < self.min_distance {
                return None;
            }
            if dx > 0.0 {
                Some(SwipeDirection::Left)
            } else {
                Some(SwipeDirection::Right)
            }
        } else {
            if dy.abs() < self.min_distance {
                return None;
            }
            if dy > 0.0 {
                Some(SwipeDirection::Up)
            } else {
                Some(SwipeDirection::Down)
            }
        }
    }
}
