//! Three-pane page swipe.
//!
//! A single `translate` value drives the previous, current and next panes.
//! Commits slide the neighbour into place and hand the navigation to the
//! caller; snap-backs return to zero on a damped spring.

use super::DragSample;
use crate::motion::{Spring, SpringParams, Tween, ease_out_cubic};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeConfig {
    /// Drag clamp as a fraction of viewport width.
    pub max_translate: f32,
    /// Position commit threshold as a fraction of viewport width.
    pub commit_threshold: f32,
    pub flick_velocity: f32,
    pub commit_duration: Duration,
    pub reentry_guard: Duration,
    /// Left band reserved for the drawer.
    pub edge_band: f32,
    pub spring: SpringParams,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            max_translate: 0.8,
            commit_threshold: 0.5,
            flick_velocity: 500.0,
            commit_duration: Duration::from_millis(180),
            reentry_guard: Duration::from_millis(300),
            edge_band: 24.0,
            spring: SpringParams::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDecision {
    Commit(SwipeDirection),
    SnapBack,
    /// No drag was in progress.
    Ignored,
}

#[derive(Debug, Clone, Copy)]
pub enum SwipePhase {
    Idle,
    Dragging { origin: f32 },
    Committing { direction: SwipeDirection, tween: Tween },
    Cooldown { remaining: Duration },
    SnappingBack(Spring),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneOffsets {
    pub previous: f32,
    pub current: f32,
    pub next: f32,
}

/// Release decision for a drag ending at `translate`.
///
/// Vertical-leaning drags never commit. Going back from the first page is
/// blocked by `can_go_previous`.
pub fn decide_release(
    translate: f32,
    sample: DragSample,
    viewport_width: f32,
    config: &SwipeConfig,
    can_go_previous: bool,
) -> SwipeDecision {
    if !sample.is_horizontally_dominant() {
        return SwipeDecision::SnapBack;
    }
    let threshold = config.commit_threshold * viewport_width;
    let next = translate < -threshold || (translate < 0.0 && sample.vx < -config.flick_velocity);
    let previous = translate > threshold || (translate > 0.0 && sample.vx > config.flick_velocity);
    if next {
        SwipeDecision::Commit(SwipeDirection::Next)
    } else if previous && can_go_previous {
        SwipeDecision::Commit(SwipeDirection::Previous)
    } else {
        SwipeDecision::SnapBack
    }
}

pub struct SwipeMachine {
    config: SwipeConfig,
    viewport_width: f32,
    translate: f32,
    phase: SwipePhase,
}

impl SwipeMachine {
    pub fn new(config: SwipeConfig, viewport_width: f32) -> Self {
        Self {
            config,
            viewport_width: viewport_width.max(1.0),
            translate: 0.0,
            phase: SwipePhase::Idle,
        }
    }

    pub fn translate(&self) -> f32 {
        self.translate
    }

    pub fn phase(&self) -> &SwipePhase {
        &self.phase
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, SwipePhase::Dragging { .. })
    }

    /// Commit, cooldown and snap-back all need frame ticks.
    pub fn is_animating(&self) -> bool {
        matches!(
            self.phase,
            SwipePhase::Committing { .. }
                | SwipePhase::Cooldown { .. }
                | SwipePhase::SnappingBack(_)
        )
    }

    pub fn is_committing(&self) -> bool {
        matches!(
            self.phase,
            SwipePhase::Committing { .. } | SwipePhase::Cooldown { .. }
        )
    }

    pub fn pane_offsets(&self) -> PaneOffsets {
        PaneOffsets {
            previous: self.translate - self.viewport_width,
            current: self.translate,
            next: self.translate + self.viewport_width,
        }
    }

    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width.max(1.0);
        let limit = self.limit();
        self.translate = self.translate.clamp(-limit, limit);
    }

    /// Starts a drag, interrupting a snap-back at its current position.
    pub fn begin(&mut self, x: f32, drawer_visible: bool) -> bool {
        if drawer_visible || x <= self.config.edge_band {
            return false;
        }
        match self.phase {
            SwipePhase::Idle | SwipePhase::SnappingBack(_) => {
                self.phase = SwipePhase::Dragging {
                    origin: self.translate,
                };
                true
            }
            SwipePhase::Dragging { .. }
            | SwipePhase::Committing { .. }
            | SwipePhase::Cooldown { .. } => false,
        }
    }

    pub fn update(&mut self, dx: f32) {
        if let SwipePhase::Dragging { origin } = self.phase {
            let limit = self.limit();
            self.translate = (origin + dx).clamp(-limit, limit);
        }
    }

    pub fn end(&mut self, sample: DragSample, can_go_previous: bool) -> SwipeDecision {
        if !self.is_dragging() {
            return SwipeDecision::Ignored;
        }
        self.update(sample.dx);
        let decision = decide_release(
            self.translate,
            sample,
            self.viewport_width,
            &self.config,
            can_go_previous,
        );
        debug!(
            translate = self.translate,
            vx = sample.vx,
            ?decision,
            "Swipe released"
        );
        match decision {
            SwipeDecision::Commit(direction) => {
                let target = match direction {
                    SwipeDirection::Next => -self.viewport_width,
                    SwipeDirection::Previous => self.viewport_width,
                };
                let tween = Tween::new(self.translate, target, self.config.commit_duration)
                    .easing(ease_out_cubic);
                self.phase = SwipePhase::Committing { direction, tween };
            }
            SwipeDecision::SnapBack | SwipeDecision::Ignored => self.snap_back(sample.vx),
        }
        decision
    }

    pub fn cancel(&mut self) {
        if self.is_dragging() {
            self.snap_back(0.0);
        }
    }

    /// Advances animations. Returns the direction of a commit that finished
    /// this tick; `translate` is already back at zero when it does.
    pub fn tick(&mut self, dt: Duration) -> Option<SwipeDirection> {
        match &mut self.phase {
            SwipePhase::Committing { direction, tween } => {
                tween.tick(dt);
                if tween.is_complete() {
                    let direction = *direction;
                    self.translate = 0.0;
                    self.phase = SwipePhase::Cooldown {
                        remaining: self.config.reentry_guard,
                    };
                    return Some(direction);
                }
                self.translate = tween.value();
            }
            SwipePhase::Cooldown { remaining } => {
                *remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    self.phase = SwipePhase::Idle;
                }
            }
            SwipePhase::SnappingBack(spring) => {
                spring.tick(dt);
                self.translate = spring.value();
                if spring.is_complete() {
                    self.translate = 0.0;
                    self.phase = SwipePhase::Idle;
                }
            }
            SwipePhase::Idle | SwipePhase::Dragging { .. } => {}
        }
        None
    }

    fn snap_back(&mut self, velocity: f32) {
        let spring = Spring::new(self.translate, 0.0, velocity, self.config.spring);
        if spring.is_complete() {
            self.translate = 0.0;
            self.phase = SwipePhase::Idle;
        } else {
            self.phase = SwipePhase::SnappingBack(spring);
        }
    }

    fn limit(&self) -> f32 {
        self.config.max_translate * self.viewport_width
    }
}
