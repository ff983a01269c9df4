#![forbid(unsafe_code)]

//! The per-frame animation scheduler.
//!
//! [`Animator`] owns the current value of every animated element property and
//! the set of running timelines. Each `tick(dt)` advances every timeline,
//! writes interpolated values, and queues [`AnimatorEvent`]s for markers and
//! completions. Callers poll events with [`drain_events`](Animator::drain_events)
//! instead of registering closures, so models stay plain data.
//!
//! # Invariants
//!
//! 1. **Supersede.** When a step starts on `(target, prop)`, every other
//!    running step on the same pair is dropped. A newer intent replaces an
//!    older one; it never queues behind it. [`set`](Animator::set) supersedes
//!    the same way.
//! 2. A step that has started is never restarted.
//! 3. Markers fire at most once each, in time order per timeline.
//! 4. `Completed(id)` fires exactly once per timeline, after all of its
//!    markers, unless the timeline is removed with [`cancel`](Animator::cancel).
//! 5. [`cancel_target`](Animator::cancel_target) removes steps but keeps their
//!    timelines alive, so markers and completion still fire on schedule.
//!
//! # Failure Modes
//!
//! - Unknown timeline ids passed to `cancel`/`is_running` are ignored.
//! - A zero `dt` is valid and only starts steps whose offset is already due.

use std::collections::BTreeMap;
use std::time::Duration;

use super::timeline::{Marker, Step, Timeline};
use super::{Animation, Tween};
use crate::scene::{Prop, Scene, Target};

/// Handle to a timeline played on an [`Animator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimelineId(u64);

impl TimelineId {
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Something a running timeline reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorEvent {
    /// A marker was crossed.
    Marker {
        timeline: TimelineId,
        label: &'static str,
    },
    /// The timeline ran to its end.
    Completed(TimelineId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Pending,
    Running,
    Done,
}

#[derive(Debug, Clone)]
struct Track {
    step: Step,
    phase: Phase,
    tween: Option<Tween>,
}

#[derive(Debug, Clone)]
struct Playing {
    id: TimelineId,
    tracks: Vec<Track>,
    markers: Vec<Marker>,
    next_marker: usize,
    duration: Duration,
    elapsed: Duration,
    completed: bool,
}

/// Property table plus running timelines.
#[derive(Debug, Default)]
pub struct Animator {
    values: BTreeMap<(Target, Prop), f32>,
    playing: Vec<Playing>,
    events: Vec<AnimatorEvent>,
    next_id: u64,
}

impl Animator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start playing `timeline`. Steps and markers due at offset zero take
    /// effect immediately.
    pub fn play(&mut self, timeline: Timeline) -> TimelineId {
        let id = TimelineId(self.next_id);
        self.next_id += 1;
        let (steps, markers, duration) = timeline.into_parts();
        self.playing.push(Playing {
            id,
            tracks: steps
                .into_iter()
                .map(|step| Track {
                    step,
                    phase: Phase::Pending,
                    tween: None,
                })
                .collect(),
            markers,
            next_marker: 0,
            duration,
            elapsed: Duration::ZERO,
            completed: false,
        });
        let idx = self.playing.len() - 1;
        self.advance(idx);
        self.reap();
        id
    }

    /// Tween a single property from its current value, replacing whatever was
    /// animating it.
    pub fn tween(&mut self, step: Step) -> TimelineId {
        self.play(Timeline::single(step))
    }

    /// Set a property immediately, superseding running steps on it.
    pub fn set(&mut self, target: Target, prop: Prop, value: f32) {
        self.supersede(target, prop, None);
        self.values.insert((target, prop), value);
    }

    /// Current value of a property (its rest value if never animated).
    pub fn value(&self, target: Target, prop: Prop) -> f32 {
        self.values
            .get(&(target, prop))
            .copied()
            .unwrap_or(prop.rest())
    }

    /// Advance every running timeline by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        for idx in 0..self.playing.len() {
            let playing = &mut self.playing[idx];
            playing.elapsed = playing.elapsed.saturating_add(dt);
            self.advance(idx);
        }
        self.reap();
    }

    /// Remove a timeline without firing its remaining markers or completion.
    pub fn cancel(&mut self, id: TimelineId) -> bool {
        let before = self.playing.len();
        self.playing.retain(|p| p.id != id);
        before != self.playing.len()
    }

    /// Drop every step acting on `target`. Returns how many were dropped.
    pub fn cancel_target(&mut self, target: Target) -> usize {
        self.cancel_where(|s| s.target == target)
    }

    /// Drop every step acting on one property of `target`.
    pub fn cancel_prop(&mut self, target: Target, prop: Prop) -> usize {
        self.cancel_where(|s| s.target == target && s.prop == prop)
    }

    fn cancel_where(&mut self, pred: impl Fn(&Step) -> bool) -> usize {
        let mut dropped = 0;
        for playing in &mut self.playing {
            for track in &mut playing.tracks {
                if track.phase != Phase::Done && pred(&track.step) {
                    track.phase = Phase::Done;
                    dropped += 1;
                }
            }
        }
        if dropped > 0 {
            crate::trace!(dropped, "animator cancelled steps");
        }
        dropped
    }

    /// Whether `id` is still playing.
    pub fn is_running(&self, id: TimelineId) -> bool {
        self.playing.iter().any(|p| p.id == id)
    }

    /// Whether any live step acts on `target`.
    pub fn is_animating(&self, target: Target) -> bool {
        self.playing.iter().any(|p| {
            p.tracks
                .iter()
                .any(|t| t.phase != Phase::Done && t.step.target == target)
        })
    }

    /// Number of timelines still playing.
    pub fn active_count(&self) -> usize {
        self.playing.len()
    }

    /// Take all queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<AnimatorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Copy every known property value into `scene`.
    pub fn write_scene(&self, scene: &mut Scene) {
        for (&(target, prop), &value) in &self.values {
            scene.set_prop(target, prop, value);
        }
    }

    // --- Private helpers ---

    fn advance(&mut self, idx: usize) {
        let elapsed = self.playing[idx].elapsed;
        for ti in 0..self.playing[idx].tracks.len() {
            let step = self.playing[idx].tracks[ti].step;
            if self.playing[idx].tracks[ti].phase == Phase::Pending && elapsed >= step.offset {
                let from = step
                    .from
                    .unwrap_or_else(|| self.value(step.target, step.prop));
                self.supersede(step.target, step.prop, Some((idx, ti)));
                let track = &mut self.playing[idx].tracks[ti];
                track.phase = Phase::Running;
                track.tween = Some(Tween::new(from, step.to, step.duration).easing(step.easing));
            }

            let track = &mut self.playing[idx].tracks[ti];
            if track.phase != Phase::Running {
                continue;
            }
            if let Some(tween) = track.tween.as_mut() {
                tween.seek(elapsed.saturating_sub(step.offset));
                let value = if step.duration.is_zero() {
                    step.to
                } else {
                    tween.value()
                };
                if tween.is_complete() || step.duration.is_zero() {
                    track.phase = Phase::Done;
                }
                self.values.insert((step.target, step.prop), value);
            }
        }

        let playing = &mut self.playing[idx];
        while let Some(marker) = playing.markers.get(playing.next_marker) {
            if marker.at > elapsed {
                break;
            }
            self.events.push(AnimatorEvent::Marker {
                timeline: playing.id,
                label: marker.label,
            });
            playing.next_marker += 1;
        }

        let steps_done = playing.tracks.iter().all(|t| t.phase == Phase::Done);
        let markers_done = playing.next_marker == playing.markers.len();
        if !playing.completed && steps_done && markers_done && elapsed >= playing.duration {
            playing.completed = true;
            self.events.push(AnimatorEvent::Completed(playing.id));
        }
    }

    /// Drop running steps on `(target, prop)` except the one at `keep`.
    fn supersede(&mut self, target: Target, prop: Prop, keep: Option<(usize, usize)>) {
        for (pi, playing) in self.playing.iter_mut().enumerate() {
            for (ti, track) in playing.tracks.iter_mut().enumerate() {
                if Some((pi, ti)) == keep || track.phase != Phase::Running {
                    continue;
                }
                if track.step.target == target && track.step.prop == prop {
                    crate::trace!(
                        element = %target,
                        prop = prop.as_str(),
                        "superseded running step"
                    );
                    track.phase = Phase::Done;
                }
            }
        }
    }

    fn reap(&mut self) {
        self.playing.retain(|p| !p.completed);
    }
}
