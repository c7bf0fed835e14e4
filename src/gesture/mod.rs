//! Direct-manipulation state machines for the side drawer and page swipes.
//!
//! Both machines are driven by pointer samples and frame ticks only; the
//! session loop owns the clock.

pub mod drawer;
pub mod swipe;

pub use drawer::{DrawerConfig, DrawerEndpoint, DrawerMachine, DrawerState, DriftReport};
pub use swipe::{PaneOffsets, SwipeConfig, SwipeDecision, SwipeDirection, SwipeMachine};

/// Pointer movement since the drag began.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragSample {
    pub dx: f32,
    pub dy: f32,
    /// Horizontal velocity in px/s at the time of the sample.
    pub vx: f32,
}

impl DragSample {
    pub fn new(dx: f32, dy: f32, vx: f32) -> Self {
        Self { dx, dy, vx }
    }

    pub fn is_horizontally_dominant(&self) -> bool {
        self.dx.abs() > 2.0 * self.dy.abs()
    }
}
