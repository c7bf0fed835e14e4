//! Two-endpoint side drawer.
//!
//! The phase enum is the only guard between gesture writes and the watchdog:
//! the watchdog acts in `Open` and `Closed` and nowhere else.

use super::DragSample;
use crate::motion::{Tween, ease_in_cubic, ease_out_cubic};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawerConfig {
    /// Panel width `W`; offsets live in `[-W, 0]`.
    pub width: f32,
    /// Pointers starting at `x <= edge_band` may grab a closed drawer.
    pub edge_band: f32,
    pub open_duration: Duration,
    pub close_duration: Duration,
    /// Release opens when within this fraction of `W` from the open edge.
    pub open_position: f32,
    pub open_flick_velocity: f32,
    pub close_flick_velocity: f32,
    /// Fraction of `W` splitting the two endpoints for cancel and drift repair.
    pub snap_threshold: f32,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            width: 260.0,
            edge_band: 24.0,
            open_duration: Duration::from_millis(220),
            close_duration: Duration::from_millis(200),
            open_position: 0.4,
            open_flick_velocity: 1000.0,
            close_flick_velocity: 500.0,
            snap_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerEndpoint {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy)]
pub enum DrawerPhase {
    Closed,
    Opening(Tween),
    Open,
    Closing(Tween),
    Dragging { start_offset: f32 },
}

/// Snapshot for renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawerState {
    pub offset: f32,
    pub visible: bool,
    pub settled: bool,
}

/// A torn offset the watchdog found and repaired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftReport {
    pub observed: f32,
    pub corrected_to: DrawerEndpoint,
}

/// Deterministic release rule, first match wins:
/// opening flick, closing flick, position within `open_position` of the open
/// edge, otherwise close.
pub fn release_target(offset: f32, vx: f32, config: &DrawerConfig) -> DrawerEndpoint {
    if vx >= config.open_flick_velocity {
        DrawerEndpoint::Open
    } else if vx <= -config.close_flick_velocity {
        DrawerEndpoint::Closed
    } else if offset >= -config.open_position * config.width {
        DrawerEndpoint::Open
    } else {
        DrawerEndpoint::Closed
    }
}

pub struct DrawerMachine {
    config: DrawerConfig,
    phase: DrawerPhase,
    offset: f32,
    drift_corrections: u64,
}

impl DrawerMachine {
    pub fn new(config: DrawerConfig) -> Self {
        Self {
            offset: -config.width,
            config,
            phase: DrawerPhase::Closed,
            drift_corrections: 0,
        }
    }

    pub fn config(&self) -> &DrawerConfig {
        &self.config
    }

    pub fn phase(&self) -> &DrawerPhase {
        &self.phase
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn drift_corrections(&self) -> u64 {
        self.drift_corrections
    }

    pub fn state(&self) -> DrawerState {
        DrawerState {
            offset: self.offset,
            visible: self.is_visible(),
            settled: self.is_settled(),
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.phase, DrawerPhase::Closed)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.phase, DrawerPhase::Open | DrawerPhase::Closed)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DrawerPhase::Dragging { .. })
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, DrawerPhase::Opening(_) | DrawerPhase::Closing(_))
    }

    pub fn open(&mut self) {
        if matches!(self.phase, DrawerPhase::Open | DrawerPhase::Opening(_)) {
            return;
        }
        debug!(from = self.offset, "Opening drawer");
        self.animate_to(DrawerEndpoint::Open);
    }

    pub fn close(&mut self) {
        if matches!(self.phase, DrawerPhase::Closed | DrawerPhase::Closing(_)) {
            return;
        }
        debug!(from = self.offset, "Closing drawer");
        self.animate_to(DrawerEndpoint::Closed);
    }

    pub fn toggle(&mut self) {
        match self.phase {
            DrawerPhase::Open | DrawerPhase::Opening(_) => self.close(),
            _ => self.open(),
        }
    }

    pub fn accepts_drag(&self, x: f32) -> bool {
        x <= self.config.edge_band || self.is_visible()
    }

    /// Takes over from any running animation at the current offset.
    pub fn begin_drag(&mut self, x: f32) -> bool {
        if self.is_dragging() || !self.accepts_drag(x) {
            return false;
        }
        self.phase = DrawerPhase::Dragging {
            start_offset: self.offset,
        };
        true
    }

    pub fn update_drag(&mut self, dx: f32) {
        if let DrawerPhase::Dragging { start_offset } = self.phase {
            self.offset = (start_offset + dx).clamp(-self.config.width, 0.0);
        }
    }

    pub fn end_drag(&mut self, sample: DragSample) -> Option<DrawerEndpoint> {
        if !self.is_dragging() {
            return None;
        }
        self.update_drag(sample.dx);
        let target = release_target(self.offset, sample.vx, &self.config);
        debug!(offset = self.offset, vx = sample.vx, ?target, "Drawer released");
        self.animate_to(target);
        Some(target)
    }

    pub fn cancel_drag(&mut self) {
        if self.is_dragging() {
            let target = self.nearest_endpoint(self.offset);
            self.animate_to(target);
        }
    }

    /// Advances a running animation. Returns the endpoint reached this tick.
    pub fn tick(&mut self, dt: Duration) -> Option<DrawerEndpoint> {
        let (tween, endpoint) = match &mut self.phase {
            DrawerPhase::Opening(tween) => (tween, DrawerEndpoint::Open),
            DrawerPhase::Closing(tween) => (tween, DrawerEndpoint::Closed),
            _ => return None,
        };
        tween.tick(dt);
        self.offset = tween.value();
        if tween.is_complete() {
            self.settle(endpoint);
            Some(endpoint)
        } else {
            None
        }
    }

    /// Offset the renderer actually presented. Only accepted while settled.
    pub fn record_presented_offset(&mut self, offset: f32) {
        if self.is_settled() {
            self.offset = offset.clamp(-self.config.width, 0.0);
        }
    }

    /// Repairs a settled drawer whose offset is not its endpoint.
    pub fn watchdog(&mut self) -> Option<DriftReport> {
        let expected = match self.phase {
            DrawerPhase::Open => 0.0,
            DrawerPhase::Closed => -self.config.width,
            _ => return None,
        };
        if self.offset == expected {
            return None;
        }
        let observed = self.offset;
        let corrected_to = self.nearest_endpoint(observed);
        self.settle(corrected_to);
        self.drift_corrections += 1;
        warn!(
            observed,
            ?corrected_to,
            corrections = self.drift_corrections,
            "Drawer offset drifted; snapped to endpoint"
        );
        Some(DriftReport {
            observed,
            corrected_to,
        })
    }

    fn nearest_endpoint(&self, offset: f32) -> DrawerEndpoint {
        if offset >= -self.config.snap_threshold * self.config.width {
            DrawerEndpoint::Open
        } else {
            DrawerEndpoint::Closed
        }
    }

    fn endpoint_offset(&self, endpoint: DrawerEndpoint) -> f32 {
        match endpoint {
            DrawerEndpoint::Open => 0.0,
            DrawerEndpoint::Closed => -self.config.width,
        }
    }

    fn animate_to(&mut self, endpoint: DrawerEndpoint) {
        let target = self.endpoint_offset(endpoint);
        if self.offset == target {
            self.settle(endpoint);
            return;
        }
        self.phase = match endpoint {
            DrawerEndpoint::Open => DrawerPhase::Opening(
                Tween::new(self.offset, target, self.config.open_duration).easing(ease_out_cubic),
            ),
            DrawerEndpoint::Closed => DrawerPhase::Closing(
                Tween::new(self.offset, target, self.config.close_duration)
                    .easing(ease_in_cubic),
            ),
        };
    }

    fn settle(&mut self, endpoint: DrawerEndpoint) {
        self.offset = self.endpoint_offset(endpoint);
        self.phase = match endpoint {
            DrawerEndpoint::Open => DrawerPhase::Open,
            DrawerEndpoint::Closed => DrawerPhase::Closed,
        };
    }
}
