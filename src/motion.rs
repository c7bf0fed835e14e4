//! Tick-driven animation primitives for the gesture machines.
//!
//! Nothing here reads a clock. The session loop feeds frame durations in, so
//! tests can step animations deterministically.

use std::time::Duration;

/// Maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-in (slow start).
#[inline]
pub fn ease_in_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t
}

/// Cubic ease-out (slow end).
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Interpolates a scalar from `from` to `to` over a fixed duration.
///
/// Once complete, [`Tween::value`] is exactly `to`.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f32,
    to: f32,
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: ease_out_cubic,
        }
    }

    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    pub fn value(&self) -> f32 {
        if self.is_complete() {
            return self.to;
        }
        self.from + (self.to - self.from) * (self.easing)(self.progress())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: 170.0,
            damping: 26.0,
        }
    }
}

const SPRING_SUBSTEP: f32 = 0.004;
const REST_DISTANCE: f32 = 0.5;
const REST_VELOCITY: f32 = 5.0;
const MAX_SPRING_TIME: Duration = Duration::from_millis(1500);

/// Damped unit-mass spring pulling `position` toward `target`.
///
/// Settles when both distance and speed are negligible, or after a hard time
/// cap; either way the final position is exactly `target`.
#[derive(Debug, Clone, Copy)]
pub struct Spring {
    position: f32,
    velocity: f32,
    target: f32,
    params: SpringParams,
    elapsed: Duration,
    settled: bool,
}

impl Spring {
    pub fn new(position: f32, target: f32, velocity: f32, params: SpringParams) -> Self {
        let mut spring = Self {
            position,
            velocity,
            target,
            params,
            elapsed: Duration::ZERO,
            settled: false,
        };
        spring.check_rest();
        spring
    }

    pub fn tick(&mut self, dt: Duration) {
        if self.settled {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        let mut remaining = dt.as_secs_f32();
        while remaining > 0.0 {
            let step = remaining.min(SPRING_SUBSTEP);
            let displacement = self.position - self.target;
            let accel =
                -self.params.stiffness * displacement - self.params.damping * self.velocity;
            self.velocity += accel * step;
            self.position += self.velocity * step;
            remaining -= step;
        }
        if !self.position.is_finite() || self.elapsed >= MAX_SPRING_TIME {
            self.snap();
        } else {
            self.check_rest();
        }
    }

    fn check_rest(&mut self) {
        if (self.position - self.target).abs() < REST_DISTANCE
            && self.velocity.abs() < REST_VELOCITY
        {
            self.snap();
        }
    }

    fn snap(&mut self) {
        self.position = self.target;
        self.velocity = 0.0;
        self.settled = true;
    }

    pub fn value(&self) -> f32 {
        self.position
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_complete(&self) -> bool {
        self.settled
    }
}
