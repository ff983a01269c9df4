#![forbid(unsafe_code)]

//! Timelines: ordered tween steps with start offsets and labelled markers.
//!
//! A [`Timeline`] is a pure description. It does nothing until handed to an
//! [`Animator`](super::Animator), which plays it against element properties.
//!
//! # Placement
//!
//! Steps are placed relative to the timeline built so far:
//!
//! - [`then`](Timeline::then) starts a step when everything before it ends.
//! - [`with`](Timeline::with) starts a step together with the previous step.
//! - [`overlap`](Timeline::overlap) starts a step some time before the end.
//! - [`at`](Timeline::at) places a step at an absolute offset.
//!
//! A step's own [`delay`](Step::delay) is added on top of its placement.
//!
//! # Invariants
//!
//! 1. `duration()` is the latest step end or marker time, whichever is later.
//! 2. Markers are kept sorted by time; equal times keep insertion order.
//! 3. A step with `from = None` starts from whatever value the property holds
//!    when the step begins, not when the timeline was built.

use std::time::Duration;

use super::{EasingFn, linear};
use crate::scene::{Prop, Target};

/// One tween acting on one element property.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub target: Target,
    pub prop: Prop,
    /// Start value; `None` means "the current value when the step starts".
    pub from: Option<f32>,
    pub to: f32,
    pub duration: Duration,
    pub easing: EasingFn,
    /// Extra delay added to the step's placement.
    pub delay: Duration,
    /// Absolute start within the timeline. Set by placement.
    pub offset: Duration,
}

impl Step {
    /// Tween `prop` of `target` from its current value to `to`.
    #[must_use]
    pub fn to(target: Target, prop: Prop, to: f32, duration: Duration) -> Self {
        Self {
            target,
            prop,
            from: None,
            to,
            duration,
            easing: linear,
            delay: Duration::ZERO,
            offset: Duration::ZERO,
        }
    }

    /// Tween with an explicit start value.
    #[must_use]
    pub fn from_to(target: Target, prop: Prop, from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from: Some(from),
            ..Self::to(target, prop, to, duration)
        }
    }

    #[must_use]
    pub fn ease(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Absolute end within the timeline.
    #[inline]
    pub fn end(&self) -> Duration {
        self.offset.saturating_add(self.duration)
    }

    /// Whether this step acts on `target`.
    #[inline]
    pub fn acts_on(&self, target: Target) -> bool {
        self.target == target
    }
}

/// A labelled point in time that the animator reports when crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub at: Duration,
    pub label: &'static str,
}

/// An ordered collection of steps and markers.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    steps: Vec<Step>,
    markers: Vec<Marker>,
    end: Duration,
    last_start: Duration,
}

impl Timeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A timeline holding a single step at offset zero.
    #[must_use]
    pub fn single(step: Step) -> Self {
        Self::new().then(step)
    }

    fn place(mut self, base: Duration, mut step: Step) -> Self {
        step.offset = base.saturating_add(step.delay);
        self.last_start = step.offset;
        self.end = self.end.max(step.end());
        self.steps.push(step);
        self
    }

    /// Start `step` when everything placed so far has ended.
    #[must_use]
    pub fn then(self, step: Step) -> Self {
        let base = self.end;
        self.place(base, step)
    }

    /// Start `step` together with the previously placed step.
    #[must_use]
    pub fn with(self, step: Step) -> Self {
        let base = self.last_start;
        self.place(base, step)
    }

    /// Start `step` `by` before the current end.
    #[must_use]
    pub fn overlap(self, by: Duration, step: Step) -> Self {
        let base = self.end.saturating_sub(by);
        self.place(base, step)
    }

    /// Start `step` at an absolute offset.
    #[must_use]
    pub fn at(self, offset: Duration, step: Step) -> Self {
        self.place(offset, step)
    }

    /// Place a marker at the current end.
    #[must_use]
    pub fn mark(self, label: &'static str) -> Self {
        let at = self.end;
        self.mark_at(at, label)
    }

    /// Place a marker at an absolute offset.
    #[must_use]
    pub fn mark_at(mut self, at: Duration, label: &'static str) -> Self {
        let idx = self.markers.partition_point(|m| m.at <= at);
        self.markers.insert(idx, Marker { at, label });
        self
    }

    /// Total running time.
    pub fn duration(&self) -> Duration {
        let last_marker = self.markers.last().map_or(Duration::ZERO, |m| m.at);
        self.end.max(last_marker)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.markers.is_empty()
    }

    /// Whether any step acts on `target`.
    pub fn touches(&self, target: Target) -> bool {
        self.steps.iter().any(|s| s.acts_on(target))
    }

    pub(crate) fn into_parts(self) -> (Vec<Step>, Vec<Marker>, Duration) {
        let duration = self.duration();
        (self.steps, self.markers, duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORD: Target = Target::new("cord");
    const BULB: Target = Target::new("bulb");
    const MS_100: Duration = Duration::from_millis(100);
    const MS_300: Duration = Duration::from_millis(300);

    #[test]
    fn then_appends_at_end() {
        let tl = Timeline::new()
            .then(Step::to(CORD, Prop::ScaleY, 2.0, MS_100))
            .then(Step::to(CORD, Prop::ScaleY, 1.0, MS_300));
        assert_eq!(tl.steps()[1].offset, MS_100);
        assert_eq!(tl.duration(), Duration::from_millis(400));
    }

    #[test]
    fn with_aligns_to_previous_start() {
        let tl = Timeline::new()
            .then(Step::to(CORD, Prop::ScaleY, 2.0, MS_100))
            .then(Step::to(CORD, Prop::ScaleY, 1.0, MS_300))
            .with(Step::to(BULB, Prop::Y, 0.0, MS_100));
        assert_eq!(tl.steps()[2].offset, MS_100);
        assert_eq!(tl.duration(), Duration::from_millis(400));
    }

    #[test]
    fn overlap_backs_off_from_end() {
        let tl = Timeline::new()
            .then(Step::to(CORD, Prop::Y, -50.0, Duration::from_millis(800)))
            .overlap(MS_300, Step::to(BULB, Prop::ScaleY, 0.0, Duration::from_millis(1000)));
        assert_eq!(tl.steps()[1].offset, Duration::from_millis(500));
        assert_eq!(tl.duration(), Duration::from_millis(1500));
    }

    #[test]
    fn delay_adds_to_placement() {
        let tl = Timeline::new().then(Step::to(BULB, Prop::Y, 0.0, MS_100).delay(MS_300));
        assert_eq!(tl.steps()[0].offset, MS_300);
        assert_eq!(tl.duration(), Duration::from_millis(400));
    }

    #[test]
    fn markers_stay_sorted_and_extend_duration() {
        let tl = Timeline::new()
            .then(Step::to(CORD, Prop::ScaleY, 2.0, MS_100))
            .mark_at(MS_300, "late")
            .mark("mid")
            .mark_at(Duration::ZERO, "start");
        let labels: Vec<_> = tl.markers().iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["start", "mid", "late"]);
        assert_eq!(tl.duration(), MS_300);
    }

    #[test]
    fn touches_reports_targets() {
        let tl = Timeline::single(Step::to(CORD, Prop::ScaleY, 2.0, MS_100));
        assert!(tl.touches(CORD));
        assert!(!tl.touches(BULB));
        assert!(!tl.is_empty());
        assert!(Timeline::new().is_empty());
    }
}
