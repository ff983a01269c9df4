#![forbid(unsafe_code)]

//! Animation primitives: easing curves, tweens, staggering, timelines.
//!
//! Everything here is driven by explicit `tick(dt)` calls. Nothing reads a
//! clock, so a run is a pure function of the durations fed in.
//!
//! - [`Tween`]: a single eased interpolation between two numbers.
//! - [`timeline::Timeline`]: an ordered list of tween steps with start offsets
//!   and labelled markers.
//! - [`animator::Animator`]: the per-frame scheduler that plays timelines
//!   against a table of element properties and enforces the supersede rule.
//! - [`stagger`]: start offsets for cascading list entrances.

pub mod animator;
pub mod stagger;
pub mod timeline;

use std::f32::consts::TAU;
use std::time::Duration;

pub use animator::{Animator, AnimatorEvent, TimelineId};
pub use timeline::{Marker, Step, Timeline};

/// An easing function maps linear progress `t ∈ [0, 1]` to eased progress.
///
/// Inputs outside `[0, 1]` are clamped. Outputs are `0` at `t = 0` and `1` at
/// `t = 1`; elastic and back curves overshoot in between.
pub type EasingFn = fn(f32) -> f32;

// ---------------------------------------------------------------------------
// Easing curves
// ---------------------------------------------------------------------------

#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in.
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out.
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out.
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-in.
#[inline]
pub fn ease_in_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t
}

/// Cubic ease-out.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Cubic ease-in-out.
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Exponential ease-in-out.
#[inline]
pub fn expo_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else if t < 0.5 {
        2f32.powf(20.0 * t - 10.0) / 2.0
    } else {
        (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
    }
}

/// Elastic ease-out with explicit amplitude (clamped to ≥ 1) and period.
#[inline]
pub fn elastic_out_with(t: f32, amplitude: f32, period: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let a = amplitude.max(1.0);
    let p = period.max(f32::EPSILON);
    let s = p / TAU * (1.0 / a).asin();
    a * 2f32.powf(-10.0 * t) * ((t - s) * TAU / p).sin() + 1.0
}

/// Elastic ease-out, amplitude 1, period 0.3.
#[inline]
pub fn elastic_out(t: f32) -> f32 {
    elastic_out_with(t, 1.0, 0.3)
}

/// Elastic ease-out with a long period (amplitude 1, period 0.5).
#[inline]
pub fn elastic_out_loose(t: f32) -> f32 {
    elastic_out_with(t, 1.0, 0.5)
}

/// Strong, fast-ringing elastic ease-out (amplitude 1.5, period 0.2).
#[inline]
pub fn elastic_out_ringing(t: f32) -> f32 {
    elastic_out_with(t, 1.5, 0.2)
}

/// Bounce ease-out.
#[inline]
pub fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;
    let t = t.clamp(0.0, 1.0);
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

/// Back ease-out (overshoots by ~10% before settling).
#[inline]
pub fn back_out(t: f32) -> f32 {
    const C1: f32 = 1.70158;
    const C3: f32 = C1 + 1.0;
    let t = t.clamp(0.0, 1.0);
    1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-driven animation.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value.
    fn value(&self) -> f32;

    /// Rewind to the start.
    fn reset(&mut self);

    /// Time past the end consumed by the last `tick`, for chaining.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Eased interpolation from `from` to `to` over `duration`.
///
/// A zero duration is clamped to 1ns so the tween completes on the first tick
/// and `progress()` never divides by zero.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
    easing: EasingFn,
}

impl Tween {
    #[must_use]
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration: duration.max(Duration::from_nanos(1)),
            elapsed: Duration::ZERO,
            easing: linear,
        }
    }

    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Jump to an absolute elapsed time.
    pub fn seek(&mut self, elapsed: Duration) {
        self.elapsed = elapsed.min(self.duration);
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
    }

    pub fn from(&self) -> f32 {
        self.from
    }

    pub fn to(&self) -> f32 {
        self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        if self.is_complete() {
            return self.to;
        }
        self.from + (self.to - self.from) * (self.easing)(self.progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}
