#![forbid(unsafe_code)]

//! The hanging light-bulb theme toggle.
//!
//! A bulb hangs from a cord off a pivot at the top of the page. A quick press
//! pulls the cord and flips the theme; a long press grabs the bulb so it can
//! be swung sideways, and letting go throws it into a decaying pendulum swing
//! without touching the theme.
//!
//! # State Machine
//!
//! ```text
//! Idle --down on bulb--> Armed --hold timer--> Dragging --up--> Releasing
//!                          |                       |                |
//!                          +-- up: click-commit    |          swing settles
//!                          |                       |                |
//!                          +------ cancel/leave ---+                v
//!                                     |                            Idle
//!                                     v
//!                                    Idle
//! ```
//!
//! # Invariants
//!
//! 1. `Dragging` is reachable only from `Armed`, and only when the hold timer
//!    fires before the pointer comes up.
//! 2. While dragging, `|rotation| <= max_angle`.
//! 3. A drag never commits a theme change; only the short-press path does.
//! 4. While a click-commit timeline runs, further short presses are ignored.
//!    Starting a drag cancels the commit's swing and lifts that restriction.
//!
//! # Failure Modes
//!
//! - Pointer moves and ups with no active gesture are ignored.
//! - A hold timer that fires after the gesture ended is ignored.

use std::fmt;
use std::time::Duration;

use folio_core::animation::{
    Animator, AnimatorEvent, Step, Timeline, TimelineId, bounce_out, ease_in_cubic, ease_in_out,
    ease_in_out_cubic, ease_out, elastic_out, elastic_out_loose, elastic_out_ringing,
};
use folio_core::event::{PointerEvent, PointerPhase};
use folio_core::rng::SeededRng;
use folio_core::scene::{Prop, Scene, Target};
use folio_runtime::{Cmd, TimerId};

use crate::config::ToggleConfig;

/// The swinging container; rotation and drop-in act here.
pub const PIVOT: Target = Target::new("toggle.pivot");
pub const CORD: Target = Target::new("toggle.cord");
pub const BULB: Target = Target::new("toggle.bulb");

pub const HOLD: TimerId = TimerId::new("toggle.hold");

/// Marker on the click-commit timeline where the theme flips.
pub const FLIP_MARKER: &str = "theme.flip";

/// Resting cord length in CSS pixels.
pub const CORD_LENGTH: f32 = 64.0;
/// How far a click pulls the bulb down.
pub const PULL_DISTANCE: f32 = 28.0;
/// Pendulum kick after a click, in degrees.
pub const KICK_ANGLE: f32 = 6.0;

const PULL: Duration = Duration::from_millis(350);
const RECOIL: Duration = Duration::from_millis(1600);
const KICK: Duration = Duration::from_millis(500);
const SETTLE: Duration = Duration::from_millis(5000);
const GRAB: Duration = Duration::from_millis(200);
const RESET: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragPhase {
    Idle,
    Armed,
    Dragging,
    Releasing,
}

impl DragPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Armed => "armed",
            Self::Dragging => "dragging",
            Self::Releasing => "releasing",
        }
    }
}

/// One press, from pointer-down until it is released or abandoned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pub phase: DragPhase,
    pub start_x: f32,
    pub last_x: f32,
    /// Horizontal delta between the last two pointer positions.
    pub velocity: f32,
    /// Degrees, applied to [`PIVOT`].
    pub rotation: f32,
}

impl DragGesture {
    fn armed(x: f32) -> Self {
        Self {
            phase: DragPhase::Armed,
            start_x: x,
            last_x: x,
            velocity: 0.0,
            rotation: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleMsg {
    HoldElapsed,
}

/// Something the toggle needs its owner to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleSignal {
    /// The click-commit pull bottomed out; flip the theme now.
    FlipTheme,
}

pub struct DragPhysicsToggle {
    config: ToggleConfig,
    rng: SeededRng,
    gesture: Option<DragGesture>,
    /// Latest click-commit timeline; its completion lifts the lock.
    commit: Option<TimelineId>,
    /// Commit timelines whose flip marker is still ahead. Each one owes
    /// exactly one theme flip, even when a newer commit overlaps it.
    unflipped: Vec<TimelineId>,
    /// Whether short presses are currently ignored.
    commit_locked: bool,
    release: Option<TimelineId>,
    hidden: bool,
}

impl DragPhysicsToggle {
    #[must_use]
    pub fn new(config: ToggleConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SeededRng::new(seed),
            gesture: None,
            commit: None,
            unflipped: Vec::new(),
            commit_locked: false,
            release: None,
            hidden: false,
        }
    }

    /// Drop the toggle in from above. With `reduced_motion` it just appears.
    pub fn entrance(&mut self, animator: &mut Animator, reduced_motion: bool) {
        if reduced_motion {
            animator.set(PIVOT, Prop::Y, 0.0);
            animator.set(PIVOT, Prop::Opacity, 1.0);
            animator.set(CORD, Prop::Height, CORD_LENGTH);
            return;
        }
        let delay = Duration::from_secs(1);
        let duration = Duration::from_millis(1500);
        animator.set(PIVOT, Prop::Y, -100.0);
        animator.set(PIVOT, Prop::Opacity, 0.0);
        animator.set(CORD, Prop::Height, 0.0);
        animator.play(
            Timeline::new()
                .at(
                    delay,
                    Step::from_to(PIVOT, Prop::Y, -100.0, 0.0, duration).ease(elastic_out_loose),
                )
                .with(Step::from_to(PIVOT, Prop::Opacity, 0.0, 1.0, duration).ease(elastic_out_loose))
                .with(Step::from_to(CORD, Prop::Height, 0.0, CORD_LENGTH, duration).ease(bounce_out)),
        );
    }

    /// Retract (`true`) or drop back (`false`). Hiding abandons any gesture.
    pub fn set_hidden(&mut self, hidden: bool, animator: &mut Animator) -> Cmd<ToggleMsg> {
        if hidden == self.hidden {
            return Cmd::none();
        }
        self.hidden = hidden;
        tracing::debug!(hidden, "theme toggle visibility changed");
        if hidden {
            let cmd = self.abandon(animator);
            let retract = Duration::from_millis(500);
            animator.play(
                Timeline::new()
                    .then(Step::to(PIVOT, Prop::Y, -150.0, retract).ease(ease_in_cubic))
                    .with(Step::to(PIVOT, Prop::Opacity, 0.0, retract).ease(ease_in_cubic)),
            );
            cmd
        } else {
            let drop = Duration::from_millis(800);
            let delay = Duration::from_millis(200);
            animator.play(
                Timeline::new()
                    .then(Step::to(PIVOT, Prop::Y, 0.0, drop).ease(bounce_out).delay(delay))
                    .with(Step::to(PIVOT, Prop::Opacity, 1.0, drop).ease(bounce_out)),
            );
            Cmd::none()
        }
    }

    /// Feed a pointer event. Presses count only on the bulb; once a gesture
    /// is active, moves and releases anywhere belong to it.
    pub fn on_pointer(&mut self, event: &PointerEvent, animator: &mut Animator) -> Cmd<ToggleMsg> {
        match event.phase {
            PointerPhase::Down => self.press(event, animator),
            PointerPhase::Move => {
                self.drag_to(event.x(), animator);
                Cmd::none()
            }
            PointerPhase::Up => self.lift(animator),
            PointerPhase::Cancel | PointerPhase::Leave => self.abandon(animator),
        }
    }

    pub fn update(&mut self, msg: ToggleMsg, animator: &mut Animator) -> Cmd<ToggleMsg> {
        match msg {
            ToggleMsg::HoldElapsed => {
                self.grab(animator);
                Cmd::none()
            }
        }
    }

    /// Route an animator event. Returns a signal when the owner must act.
    pub fn on_animation_event(&mut self, event: AnimatorEvent) -> Option<ToggleSignal> {
        match event {
            AnimatorEvent::Marker { timeline, label } if label == FLIP_MARKER => {
                let idx = self.unflipped.iter().position(|&id| id == timeline)?;
                self.unflipped.remove(idx);
                Some(ToggleSignal::FlipTheme)
            }
            AnimatorEvent::Completed(id) if Some(id) == self.commit => {
                self.commit = None;
                self.commit_locked = false;
                None
            }
            AnimatorEvent::Completed(id) if Some(id) == self.release => {
                self.release = None;
                if self.phase() == DragPhase::Releasing {
                    self.gesture = None;
                    tracing::debug!("toggle swing settled");
                }
                None
            }
            _ => None,
        }
    }

    pub fn teardown(&mut self, animator: &mut Animator) -> Cmd<ToggleMsg> {
        self.gesture = None;
        self.commit = None;
        self.unflipped.clear();
        self.commit_locked = false;
        self.release = None;
        for target in [PIVOT, CORD, BULB] {
            animator.cancel_target(target);
        }
        Cmd::cancel(HOLD)
    }

    pub fn phase(&self) -> DragPhase {
        self.gesture.map_or(DragPhase::Idle, |g| g.phase)
    }

    pub fn gesture(&self) -> Option<&DragGesture> {
        self.gesture.as_ref()
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether a click-commit is running and blocking short presses.
    #[inline]
    pub fn is_committing(&self) -> bool {
        self.commit_locked
    }

    pub fn view(&self, animator: &Animator, scene: &mut Scene) {
        for prop in [Prop::Rotation, Prop::Y, Prop::Opacity] {
            scene.set_prop(PIVOT, prop, animator.value(PIVOT, prop));
        }
        scene.set_prop(CORD, Prop::ScaleY, animator.value(CORD, Prop::ScaleY));
        scene.set_prop(CORD, Prop::Height, animator.value(CORD, Prop::Height));
        scene.set_prop(BULB, Prop::Y, animator.value(BULB, Prop::Y));
        scene.set_prop(BULB, Prop::Scale, animator.value(BULB, Prop::Scale));
        scene.set_flag("toggle.hidden", self.hidden);
        scene.set_flag("toggle.grabbed", self.phase() == DragPhase::Dragging);
        scene.set_text("toggle.phase", self.phase().as_str());
    }

    // --- Private helpers ---

    fn press(&mut self, event: &PointerEvent, animator: &mut Animator) -> Cmd<ToggleMsg> {
        if self.hidden || !event.is_on(BULB.name()) {
            return Cmd::none();
        }
        match self.phase() {
            DragPhase::Armed | DragPhase::Dragging => return Cmd::none(),
            DragPhase::Releasing => {
                if let Some(release) = self.release.take() {
                    animator.cancel(release);
                }
            }
            DragPhase::Idle => {}
        }
        self.gesture = Some(DragGesture::armed(event.x()));
        tracing::debug!(x = event.x(), "toggle armed");
        Cmd::after(HOLD, self.config.hold, ToggleMsg::HoldElapsed)
    }

    fn grab(&mut self, animator: &mut Animator) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        if gesture.phase != DragPhase::Armed {
            return;
        }
        gesture.phase = DragPhase::Dragging;
        gesture.rotation = clamp_angle(
            -(gesture.last_x - gesture.start_x) * self.config.sensitivity,
            self.config.max_angle,
        );
        let rotation = gesture.rotation;

        animator.cancel_prop(PIVOT, Prop::Rotation);
        if self.commit_locked {
            tracing::debug!("drag released the click-commit lock");
            self.commit_locked = false;
        }
        animator.set(PIVOT, Prop::Rotation, rotation);
        animator.tween(Step::to(BULB, Prop::Scale, self.config.grab_scale, GRAB).ease(ease_out));
        tracing::debug!("toggle dragging");
    }

    fn drag_to(&mut self, x: f32, animator: &mut Animator) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        match gesture.phase {
            DragPhase::Armed => gesture.last_x = x,
            DragPhase::Dragging => {
                gesture.velocity = x - gesture.last_x;
                gesture.last_x = x;
                gesture.rotation = clamp_angle(
                    -(x - gesture.start_x) * self.config.sensitivity,
                    self.config.max_angle,
                );
                animator.set(PIVOT, Prop::Rotation, gesture.rotation);
            }
            DragPhase::Idle | DragPhase::Releasing => {}
        }
    }

    fn lift(&mut self, animator: &mut Animator) -> Cmd<ToggleMsg> {
        let Some(gesture) = self.gesture.as_mut() else {
            return Cmd::none();
        };
        match gesture.phase {
            DragPhase::Armed => {
                self.gesture = None;
                self.commit(animator);
                Cmd::cancel(HOLD)
            }
            DragPhase::Dragging => {
                let target = clamp_angle(
                    gesture.rotation - gesture.velocity * self.config.sensitivity * self.config.momentum,
                    self.config.max_angle,
                );
                gesture.phase = DragPhase::Releasing;
                tracing::debug!(target, "toggle released");
                animator.tween(Step::to(BULB, Prop::Scale, 1.0, GRAB).ease(ease_out));
                self.release = Some(animator.play(release_swing(target)));
                Cmd::none()
            }
            DragPhase::Idle | DragPhase::Releasing => Cmd::none(),
        }
    }

    fn abandon(&mut self, animator: &mut Animator) -> Cmd<ToggleMsg> {
        match self.phase() {
            DragPhase::Armed | DragPhase::Dragging => {
                self.gesture = None;
                tracing::debug!("toggle gesture cancelled");
                animator.tween(Step::to(BULB, Prop::Scale, 1.0, RESET).ease(ease_out));
                animator.tween(Step::to(PIVOT, Prop::Rotation, 0.0, RESET).ease(ease_out));
                Cmd::cancel(HOLD)
            }
            DragPhase::Idle | DragPhase::Releasing => Cmd::none(),
        }
    }

    fn commit(&mut self, animator: &mut Animator) {
        if self.commit_locked || self.hidden {
            tracing::debug!("click ignored while a commit is running");
            return;
        }
        let kick = KICK_ANGLE * self.rng.sign();
        let id = animator.play(commit_timeline(kick));
        self.commit = Some(id);
        self.unflipped.push(id);
        self.commit_locked = true;
        tracing::debug!(kick, "toggle click committed");
    }
}

impl fmt::Debug for DragPhysicsToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragPhysicsToggle")
            .field("gesture", &self.gesture)
            .field("commit", &self.commit)
            .field("unflipped", &self.unflipped)
            .field("commit_locked", &self.commit_locked)
            .field("release", &self.release)
            .field("hidden", &self.hidden)
            .finish()
    }
}

#[inline]
fn clamp_angle(angle: f32, max: f32) -> f32 {
    angle.clamp(-max, max)
}

/// Pull, flip, recoil, kick, settle.
pub fn commit_timeline(kick: f32) -> Timeline {
    let stretch = (CORD_LENGTH + PULL_DISTANCE) / CORD_LENGTH;
    Timeline::new()
        .then(Step::to(CORD, Prop::ScaleY, stretch, PULL).ease(ease_in_out_cubic))
        .with(Step::to(BULB, Prop::Y, PULL_DISTANCE, PULL).ease(ease_in_out_cubic))
        .mark(FLIP_MARKER)
        .then(Step::to(CORD, Prop::ScaleY, 1.0, RECOIL).ease(elastic_out))
        .with(Step::to(BULB, Prop::Y, 0.0, RECOIL).ease(elastic_out))
        .with(Step::to(PIVOT, Prop::Rotation, kick, KICK).ease(ease_out))
        .then(Step::to(PIVOT, Prop::Rotation, 0.0, SETTLE).ease(elastic_out_ringing))
}

/// Overshoot to `target`, swing back half as far, forward a quarter, settle.
pub fn release_swing(target: f32) -> Timeline {
    Timeline::new()
        .then(Step::to(PIVOT, Prop::Rotation, target, Duration::from_millis(300)).ease(ease_out))
        .then(
            Step::to(PIVOT, Prop::Rotation, -target * 0.5, Duration::from_millis(500))
                .ease(ease_in_out),
        )
        .then(
            Step::to(PIVOT, Prop::Rotation, target * 0.25, Duration::from_millis(400))
                .ease(ease_in_out),
        )
        .then(Step::to(PIVOT, Prop::Rotation, 0.0, Duration::from_millis(800)).ease(elastic_out))
}
