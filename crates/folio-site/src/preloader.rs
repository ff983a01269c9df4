#![forbid(unsafe_code)]

//! The boot counter that gates the site.
//!
//! A percentage climbs by a random 1–5 every 30 ms. When it reaches 100, or
//! when the 4 s safety ceiling fires first, the sequencer plays its exit
//! (text lifts and fades, then the curtain collapses upward) and reports
//! completion once the exit has finished.
//!
//! # State Machine
//!
//! ```text
//! Running --(percent hits 100 | ceiling)--> Completing --(exit done)--> Done
//! ```
//!
//! # Invariants
//!
//! 1. `percent` never decreases and never exceeds 100.
//! 2. Entering `Completing` happens once; the later of the two triggers is
//!    ignored.
//! 3. A forced completion snaps `percent` to 100 in the same update.
//! 4. The completion callback runs exactly once, after the exit timeline.
//! 5. The [`LockReason::Preloader`] scroll lock is held from `start` until
//!    `Done` or teardown.

use std::fmt;
use std::time::Duration;

use folio_core::animation::{
    Animator, AnimatorEvent, Step, Timeline, TimelineId, ease_in_cubic, expo_in_out,
};
use folio_core::effect::HostEffect;
use folio_core::rng::SeededRng;
use folio_core::scene::{Prop, Scene, Target};
use folio_runtime::{Cmd, TimerId};

use crate::config::PreloaderConfig;
use crate::scroll_lock::{LockReason, ScrollLock};

pub const TEXT: Target = Target::new("preloader.text");
pub const CONTAINER: Target = Target::new("preloader.container");

pub const TICK: TimerId = TimerId::new("preloader.tick");
pub const CEILING: TimerId = TimerId::new("preloader.ceiling");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreloadPhase {
    Running,
    Completing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloaderMsg {
    Tick,
    Ceiling,
}

/// Called once when the exit animation has finished.
pub type CompletionCallback = Box<dyn FnOnce()>;

pub struct PreloaderSequencer {
    config: PreloaderConfig,
    rng: SeededRng,
    percent: u32,
    phase: PreloadPhase,
    completed: bool,
    exit: Option<TimelineId>,
    on_complete: Option<CompletionCallback>,
}

impl PreloaderSequencer {
    #[must_use]
    pub fn new(config: PreloaderConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SeededRng::new(seed),
            percent: 0,
            phase: PreloadPhase::Running,
            completed: false,
            exit: None,
            on_complete: None,
        }
    }

    /// Register the completion callback.
    #[must_use]
    pub fn on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Lock the page and start both the counter and the safety ceiling.
    pub fn start(&mut self, lock: &mut ScrollLock) -> Cmd<PreloaderMsg> {
        tracing::debug!(ceiling_ms = self.config.ceiling.as_millis() as u64, "preloader started");
        Cmd::batch(vec![
            lock.engage(LockReason::Preloader),
            Cmd::host(HostEffect::scroll_to_origin()),
            Cmd::after(TICK, self.config.tick, PreloaderMsg::Tick),
            Cmd::after(CEILING, self.config.ceiling, PreloaderMsg::Ceiling),
        ])
    }

    pub fn update(&mut self, msg: PreloaderMsg, animator: &mut Animator) -> Cmd<PreloaderMsg> {
        if self.phase != PreloadPhase::Running {
            return Cmd::none();
        }
        match msg {
            PreloaderMsg::Tick => {
                let step = self
                    .rng
                    .next_inclusive(self.config.min_step, self.config.max_step);
                // Steps are at least 1, even from a hand-built config.
                self.percent = self.percent.saturating_add(step.max(1)).min(100);
                if self.percent >= 100 {
                    self.complete(animator, false)
                } else {
                    Cmd::after(TICK, self.config.tick, PreloaderMsg::Tick)
                }
            }
            PreloaderMsg::Ceiling => self.complete(animator, true),
        }
    }

    /// Feed an animator event. Returns `Some` exactly once: when `event` is
    /// the end of the exit timeline. The command releases the scroll lock.
    pub fn on_animation_event<M>(
        &mut self,
        event: AnimatorEvent,
        lock: &mut ScrollLock,
    ) -> Option<Cmd<M>> {
        let AnimatorEvent::Completed(id) = event else {
            return None;
        };
        if self.phase != PreloadPhase::Completing || self.exit != Some(id) {
            return None;
        }
        self.phase = PreloadPhase::Done;
        self.exit = None;
        tracing::debug!("preloader done");
        if let Some(callback) = self.on_complete.take() {
            callback();
        }
        Some(lock.release(LockReason::Preloader))
    }

    /// Stop timers and animations and give the scroll lock back. The
    /// completion callback is not invoked.
    pub fn teardown(&mut self, lock: &mut ScrollLock, animator: &mut Animator) -> Cmd<PreloaderMsg> {
        if let Some(exit) = self.exit.take() {
            animator.cancel(exit);
        }
        animator.cancel_target(TEXT);
        animator.cancel_target(CONTAINER);
        Cmd::batch(vec![
            Cmd::cancel(TICK),
            Cmd::cancel(CEILING),
            lock.release(LockReason::Preloader),
        ])
    }

    #[inline]
    pub fn percent(&self) -> u32 {
        self.percent
    }

    #[inline]
    pub fn phase(&self) -> PreloadPhase {
        self.phase
    }

    /// Whether completion has been triggered (true from `Completing` on).
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.phase == PreloadPhase::Done
    }

    pub fn view(&self, animator: &Animator, scene: &mut Scene) {
        let visible = !self.is_done();
        scene.set_flag("preloader.visible", visible);
        if !visible {
            return;
        }
        scene.set_text("preloader.percent", format!("{}%", self.percent));
        scene.set_prop(TEXT, Prop::Y, animator.value(TEXT, Prop::Y));
        scene.set_prop(TEXT, Prop::Opacity, animator.value(TEXT, Prop::Opacity));
        scene.set_prop(CONTAINER, Prop::ScaleY, animator.value(CONTAINER, Prop::ScaleY));
    }

    fn complete(&mut self, animator: &mut Animator, forced: bool) -> Cmd<PreloaderMsg> {
        tracing::debug!(percent = self.percent, forced, "preloader completing");
        self.percent = 100;
        self.phase = PreloadPhase::Completing;
        self.completed = true;
        self.exit = Some(animator.play(exit_timeline()));
        Cmd::batch(vec![Cmd::cancel(TICK), Cmd::cancel(CEILING)])
    }
}

impl fmt::Debug for PreloaderSequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreloaderSequencer")
            .field("percent", &self.percent)
            .field("phase", &self.phase)
            .field("completed", &self.completed)
            .field("exit", &self.exit)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

/// Text lifts and fades; the curtain collapses 0.3 s before that ends.
pub fn exit_timeline() -> Timeline {
    let text = Duration::from_millis(800);
    Timeline::new()
        .then(Step::to(TEXT, Prop::Y, -50.0, text).ease(ease_in_cubic))
        .with(Step::to(TEXT, Prop::Opacity, 0.0, text).ease(ease_in_cubic))
        .overlap(
            Duration::from_millis(300),
            Step::to(CONTAINER, Prop::ScaleY, 0.0, Duration::from_millis(1000)).ease(expo_in_out),
        )
}
