#![forbid(unsafe_code)]

//! Step-based program runner for the browser.
//!
//! [`StepProgram`] drives a [`folio_runtime::Model`] through init / event /
//! update / view cycles without threads or blocking. The host (JavaScript)
//! controls the event loop:
//!
//! 1. Push events via [`StepProgram::push_event`].
//! 2. Advance time via [`StepProgram::advance_time`] (once per
//!    `requestAnimationFrame`).
//! 3. Call [`StepProgram::step`] to process one batch of events and render.
//! 4. Read effects and the scene via [`StepProgram::take_outputs`].
//!
//! # Example
//!
//! ```ignore
//! use folio_web::step_program::StepProgram;
//! use core::time::Duration;
//!
//! let mut prog = StepProgram::new(site);
//! prog.init();
//!
//! // Host-driven frame loop
//! prog.push_event(Event::click("sound"));
//! prog.advance_time(Duration::from_millis(16));
//! let result = prog.step();
//!
//! if result.rendered {
//!     let outputs = prog.take_outputs();
//!     // Apply outputs.effects and outputs.last_scene to the document...
//! }
//! ```

use core::time::Duration;
use std::collections::VecDeque;

use folio_core::effect::HostEffect;
use folio_core::event::Event;
use folio_core::scene::Scene;
use folio_runtime::{Cmd, Model, TimerQueue};

/// Result of a single [`StepProgram::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the program is still running (false after shutdown).
    pub running: bool,
    /// Whether a scene was rendered during this step.
    pub rendered: bool,
    /// Number of host events processed during this step.
    pub events_processed: u32,
    /// Number of timers that fired during this step.
    pub timers_fired: u32,
    /// Current frame index (monotonically increasing).
    pub frame_idx: u64,
}

/// What the host applies after a step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebOutputs {
    /// Host effects in request order.
    pub effects: Vec<HostEffect>,
    /// The most recent scene, if one was rendered since the last take.
    pub last_scene: Option<Scene>,
}

/// Host-driven, non-blocking program runner.
///
/// No threads, no blocking, no `std::time::Instant`: all input and time are
/// pushed by the host. Tasks run synchronously when their command executes.
///
/// # Lifecycle
///
/// 1. [`StepProgram::new`] - create with a model.
/// 2. [`StepProgram::init`] - call once to initialize the model and render the first scene.
/// 3. [`StepProgram::step`] - call repeatedly from the host event loop.
/// 4. [`StepProgram::shutdown`] - tear the model down on page unload.
pub struct StepProgram<M: Model> {
    model: M,
    events: VecDeque<Event>,
    timers: TimerQueue<M::Message>,
    outputs: WebOutputs,
    running: bool,
    initialized: bool,
    dirty: bool,
    frame_idx: u64,
    now: Duration,
    last_frame: Duration,
}

impl<M: Model> StepProgram<M> {
    /// Create a new step program around `model`.
    #[must_use]
    pub fn new(model: M) -> Self {
        Self {
            model,
            events: VecDeque::new(),
            timers: TimerQueue::new(),
            outputs: WebOutputs::default(),
            running: true,
            initialized: false,
            dirty: true,
            frame_idx: 0,
            now: Duration::ZERO,
            last_frame: Duration::ZERO,
        }
    }

    /// Initialize the model and render the first scene.
    ///
    /// Must be called exactly once before [`step`](Self::step).
    pub fn init(&mut self) {
        assert!(!self.initialized, "StepProgram::init() called twice");
        self.initialized = true;
        let cmd = self.model.init();
        self.execute_cmd(cmd);
        if self.running {
            self.render();
        }
    }

    /// Process pending events, fire due timers, deliver one animation frame
    /// covering the time advanced since the last step, and render if dirty.
    pub fn step(&mut self) -> StepResult {
        assert!(self.initialized, "StepProgram::step() called before init()");

        if !self.running {
            return StepResult {
                running: false,
                rendered: false,
                events_processed: 0,
                timers_fired: 0,
                frame_idx: self.frame_idx,
            };
        }

        // 1. Process all pending events.
        let mut events_processed: u32 = 0;
        while self.running
            && let Some(event) = self.events.pop_front()
        {
            events_processed += 1;
            self.dispatch(event);
        }

        // 2. Fire due timers in order.
        let mut timers_fired: u32 = 0;
        while self.running
            && let Some(fired) = self.timers.pop_due(self.now)
        {
            timers_fired += 1;
            let cmd = self.model.update(fired.msg);
            self.dirty = true;
            self.execute_cmd(cmd);
        }

        // 3. One frame for the elapsed time.
        let dt = self.now.saturating_sub(self.last_frame);
        if self.running && !dt.is_zero() {
            self.last_frame = self.now;
            self.dispatch(Event::Frame { dt });
        }

        // 4. Render if dirty.
        let rendered = if self.running && self.dirty {
            self.render();
            true
        } else {
            false
        };

        StepResult {
            running: self.running,
            rendered,
            events_processed,
            timers_fired,
            frame_idx: self.frame_idx,
        }
    }

    /// Queue a host event. Events are processed on the next
    /// [`step`](Self::step) call.
    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Deliver a message to the model right away (async results the host
    /// resolved itself, such as a fetched feed).
    pub fn send(&mut self, msg: M::Message) {
        if !self.running {
            return;
        }
        let cmd = self.model.update(msg);
        self.dirty = true;
        self.execute_cmd(cmd);
    }

    /// Advance the deterministic clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Set the deterministic clock to an absolute time. The clock never
    /// moves backwards.
    pub fn set_time(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Tear the model down and drop pending timers and events.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        let cmd = self.model.teardown();
        self.execute_cmd(cmd);
        self.timers.clear();
        self.events.clear();
        self.running = false;
    }

    /// Take the captured outputs, leaving empty defaults.
    pub fn take_outputs(&mut self) -> WebOutputs {
        std::mem::take(&mut self.outputs)
    }

    /// Read the captured outputs without consuming them.
    pub fn outputs(&self) -> &WebOutputs {
        &self.outputs
    }

    /// Access the model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutably access the model.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Whether the program is still running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the program has been initialized.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Current frame index.
    pub fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    /// Current deterministic time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of events waiting for the next step.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    // --- Private helpers ---

    fn dispatch(&mut self, event: Event) {
        let msg = M::Message::from(event);
        let cmd = self.model.update(msg);
        self.dirty = true;
        self.execute_cmd(cmd);
    }

    fn render(&mut self) {
        let mut scene = Scene::new();
        self.model.view(&mut scene);
        self.outputs.last_scene = Some(scene);
        self.dirty = false;
        self.frame_idx += 1;
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Msg(m) => {
                let cmd = self.model.update(m);
                self.execute_cmd(cmd);
            }
            Cmd::Batch(cmds) => {
                for c in cmds {
                    self.execute_cmd(c);
                }
            }
            Cmd::After { timer, delay, msg } => {
                if self.running {
                    self.timers.schedule(timer, self.now.saturating_add(delay), msg);
                }
            }
            Cmd::Cancel(timer) => {
                self.timers.cancel(timer);
            }
            Cmd::Task(_name, f) => {
                // No threads in the browser: run tasks synchronously.
                let msg = f();
                let cmd = self.model.update(msg);
                self.execute_cmd(cmd);
            }
            Cmd::Host(effect) => {
                self.outputs.effects.push(effect);
            }
        }
    }
}
