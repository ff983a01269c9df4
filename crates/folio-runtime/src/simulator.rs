#![forbid(unsafe_code)]

//! Deterministic program simulator for testing.
//!
//! `ProgramSimulator` runs a [`Model`] against a virtual clock with no host.
//! Events are injected directly, time advances only when asked, timers fire
//! in due order, and an animation frame is synthesised every
//! [`frame_interval`](ProgramSimulator::with_frame_interval). Host effects and
//! commands are recorded for assertions.
//!
//! # Example
//!
//! ```ignore
//! use folio_runtime::simulator::ProgramSimulator;
//!
//! let mut sim = ProgramSimulator::new(site);
//! sim.init();
//! sim.advance(Duration::from_millis(4000));
//! assert!(sim.model().is_loaded());
//! ```

use std::time::Duration;

use folio_core::effect::HostEffect;
use folio_core::event::Event;
use folio_core::scene::Scene;

use crate::program::{Cmd, Model, TimerId};
use crate::timers::TimerQueue;

/// Default animation frame interval (60 Hz, rounded).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Record of a command that was executed during simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum CmdRecord {
    /// Message sent to model (not stored, just noted).
    Msg,
    /// Batch of commands.
    Batch(usize),
    /// Timer scheduled.
    Timer { timer: TimerId, delay: Duration },
    /// Timer cancelled.
    Cancel(TimerId),
    /// Task executed synchronously.
    Task(String),
    /// Host effect requested.
    Host(HostEffect),
}

/// Deterministic simulator for [`Model`] testing.
pub struct ProgramSimulator<M: Model> {
    model: M,
    timers: TimerQueue<M::Message>,
    now: Duration,
    last_frame: Duration,
    frame_interval: Duration,
    frames: u64,
    scenes: Vec<Scene>,
    command_log: Vec<CmdRecord>,
    effects: Vec<HostEffect>,
    running: bool,
}

impl<M: Model> ProgramSimulator<M> {
    /// Create a new simulator with the given model.
    ///
    /// The model is not initialized until [`init`](Self::init) is called.
    pub fn new(model: M) -> Self {
        Self {
            model,
            timers: TimerQueue::new(),
            now: Duration::ZERO,
            last_frame: Duration::ZERO,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            frames: 0,
            scenes: Vec::new(),
            command_log: Vec::new(),
            effects: Vec::new(),
            running: true,
        }
    }

    /// Override the synthesised frame interval.
    #[must_use]
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Initialize the model.
    pub fn init(&mut self) {
        let cmd = self.model.init();
        self.execute_cmd(cmd);
    }

    /// Inject a host event.
    pub fn inject_event(&mut self, event: Event) {
        if !self.running {
            return;
        }
        let msg = M::Message::from(event);
        let cmd = self.model.update(msg);
        self.execute_cmd(cmd);
    }

    /// Inject several host events in order.
    pub fn inject_events(&mut self, events: &[Event]) {
        for event in events {
            self.inject_event(event.clone());
        }
    }

    /// Send a message directly.
    pub fn send(&mut self, msg: M::Message) {
        if !self.running {
            return;
        }
        self.command_log.push(CmdRecord::Msg);
        let cmd = self.model.update(msg);
        self.execute_cmd(cmd);
    }

    /// Advance the clock by `dt`, firing due timers in order and delivering
    /// an [`Event::Frame`] at every frame boundary crossed.
    pub fn advance(&mut self, dt: Duration) {
        let end = self.now.saturating_add(dt);
        while self.running && self.now < end {
            let frame_at = self.last_frame.saturating_add(self.frame_interval);
            let stop = frame_at.min(end);
            self.fire_timers_until(stop);
            self.now = stop;
            if stop == frame_at {
                self.last_frame = frame_at;
                self.frames += 1;
                self.inject_event(Event::Frame {
                    dt: self.frame_interval,
                });
            }
        }
    }

    /// Advance in `step`-sized slices until `done` returns true or `limit`
    /// elapses. Returns whether `done` was satisfied.
    pub fn advance_until(
        &mut self,
        step: Duration,
        limit: Duration,
        mut done: impl FnMut(&M) -> bool,
    ) -> bool {
        let deadline = self.now.saturating_add(limit);
        while !done(&self.model) {
            if self.now >= deadline {
                return false;
            }
            self.advance(step.min(deadline - self.now));
        }
        true
    }

    /// Tear the model down and drop every pending timer.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        let cmd = self.model.teardown();
        self.execute_cmd(cmd);
        self.timers.clear();
        self.running = false;
    }

    /// Render the model into a new scene and keep it.
    pub fn capture_scene(&mut self) -> &Scene {
        let mut scene = Scene::new();
        self.model.view(&mut scene);
        self.scenes.push(scene);
        &self.scenes[self.scenes.len() - 1]
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Animation frames delivered so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Host effects requested so far, oldest first.
    pub fn effects(&self) -> &[HostEffect] {
        &self.effects
    }

    /// Take the recorded host effects.
    pub fn take_effects(&mut self) -> Vec<HostEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn command_log(&self) -> &[CmdRecord] {
        &self.command_log
    }

    /// Pending timer ids in firing order.
    pub fn pending_timers(&self) -> Vec<TimerId> {
        self.timers.pending()
    }

    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.timers.contains(id)
    }

    pub fn clear_command_log(&mut self) {
        self.command_log.clear();
    }

    // --- Private helpers ---

    fn fire_timers_until(&mut self, until: Duration) {
        while self.running {
            let Some(fired) = self.timers.pop_due(until) else {
                break;
            };
            self.now = self.now.max(fired.due);
            let cmd = self.model.update(fired.msg);
            self.execute_cmd(cmd);
        }
    }

    /// Execute a command without IO.
    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => {
                self.command_log.push(CmdRecord::Batch(cmds.len()));
                for c in cmds {
                    self.execute_cmd(c);
                }
            }
            Cmd::Msg(m) => {
                self.command_log.push(CmdRecord::Msg);
                let cmd = self.model.update(m);
                self.execute_cmd(cmd);
            }
            Cmd::After { timer, delay, msg } => {
                self.command_log.push(CmdRecord::Timer { timer, delay });
                if self.running {
                    self.timers.schedule(timer, self.now.saturating_add(delay), msg);
                }
            }
            Cmd::Cancel(timer) => {
                self.command_log.push(CmdRecord::Cancel(timer));
                self.timers.cancel(timer);
            }
            Cmd::Task(name, f) => {
                self.command_log.push(CmdRecord::Task(name));
                let msg = f();
                let cmd = self.model.update(msg);
                self.execute_cmd(cmd);
            }
            Cmd::Host(effect) => {
                self.command_log.push(CmdRecord::Host(effect.clone()));
                self.effects.push(effect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLINK: TimerId = TimerId::new("blink");
    const MS_100: Duration = Duration::from_millis(100);

    // ---------- Test model ----------

    #[derive(Default)]
    struct Blinker {
        on: bool,
        blinks: u32,
        frames: u32,
        frame_time: Duration,
        torn_down: bool,
    }

    #[derive(Debug)]
    enum Msg {
        Start,
        Stop,
        Blink,
        Frame(Duration),
        Scroll,
        Other,
    }

    impl From<Event> for Msg {
        fn from(event: Event) -> Self {
            match event {
                Event::Frame { dt } => Msg::Frame(dt),
                Event::Scroll(_) => Msg::Scroll,
                _ => Msg::Other,
            }
        }
    }

    impl Model for Blinker {
        type Message = Msg;

        fn update(&mut self, msg: Msg) -> Cmd<Msg> {
            match msg {
                Msg::Start => Cmd::after(BLINK, MS_100, Msg::Blink),
                Msg::Stop => Cmd::cancel(BLINK),
                Msg::Blink => {
                    self.on = !self.on;
                    self.blinks += 1;
                    Cmd::after(BLINK, MS_100, Msg::Blink)
                }
                Msg::Frame(dt) => {
                    self.frames += 1;
                    self.frame_time += dt;
                    Cmd::none()
                }
                Msg::Scroll => Cmd::batch(vec![
                    Cmd::host(HostEffect::scroll_to_origin()),
                    Cmd::host(HostEffect::SetScrollLock(false)),
                ]),
                Msg::Other => Cmd::none(),
            }
        }

        fn view(&self, scene: &mut Scene) {
            scene.set_flag("on", self.on);
        }

        fn teardown(&mut self) -> Cmd<Msg> {
            self.torn_down = true;
            Cmd::cancel(BLINK)
        }
    }

    #[test]
    fn timers_fire_on_schedule() {
        let mut sim = ProgramSimulator::new(Blinker::default());
        sim.init();
        sim.send(Msg::Start);
        sim.advance(Duration::from_millis(99));
        assert_eq!(sim.model().blinks, 0);
        sim.advance(Duration::from_millis(1));
        assert_eq!(sim.model().blinks, 1);
        sim.advance(Duration::from_millis(1000));
        assert_eq!(sim.model().blinks, 11);
    }

    #[test]
    fn timers_rescheduled_inside_one_advance_still_fire() {
        let mut sim =
            ProgramSimulator::new(Blinker::default()).with_frame_interval(Duration::from_secs(10));
        sim.send(Msg::Start);
        sim.advance(Duration::from_millis(350));
        assert_eq!(sim.model().blinks, 3);
        assert_eq!(sim.frame_count(), 0);
    }

    #[test]
    fn cancel_stops_timer() {
        let mut sim = ProgramSimulator::new(Blinker::default());
        sim.send(Msg::Start);
        assert!(sim.is_timer_pending(BLINK));
        sim.send(Msg::Stop);
        assert!(sim.pending_timers().is_empty());
        sim.advance(Duration::from_secs(1));
        assert_eq!(sim.model().blinks, 0);
    }

    #[test]
    fn frames_are_synthesised_at_interval() {
        let mut sim = ProgramSimulator::new(Blinker::default());
        sim.advance(Duration::from_millis(160));
        assert_eq!(sim.model().frames, 10);
        assert_eq!(sim.model().frame_time, Duration::from_millis(160));
        sim.advance(Duration::from_millis(8));
        assert_eq!(sim.model().frames, 10);
        sim.advance(Duration::from_millis(8));
        assert_eq!(sim.model().frames, 11);
        assert_eq!(sim.now(), Duration::from_millis(176));
    }

    #[test]
    fn effects_and_commands_are_recorded() {
        let mut sim = ProgramSimulator::new(Blinker::default());
        sim.inject_event(Event::scroll(10.0, 100.0, 1000.0));
        assert_eq!(
            sim.effects(),
            &[HostEffect::scroll_to_origin(), HostEffect::SetScrollLock(false)]
        );
        assert!(matches!(sim.command_log()[0], CmdRecord::Batch(2)));
        assert_eq!(sim.take_effects().len(), 2);
        assert!(sim.effects().is_empty());
        sim.clear_command_log();
        assert!(sim.command_log().is_empty());
    }

    #[test]
    fn shutdown_tears_down_and_stops() {
        let mut sim = ProgramSimulator::new(Blinker::default());
        sim.send(Msg::Start);
        sim.shutdown();
        assert!(sim.model().torn_down);
        assert!(!sim.is_running());
        sim.advance(Duration::from_secs(1));
        assert_eq!(sim.model().blinks, 0);
    }

    #[test]
    fn capture_scene_uses_view() {
        let mut sim = ProgramSimulator::new(Blinker::default());
        sim.send(Msg::Start);
        sim.advance(MS_100);
        assert!(sim.capture_scene().flag("on"));
        assert_eq!(sim.scenes().len(), 1);
    }

    #[test]
    fn advance_until_stops_early() {
        let mut sim = ProgramSimulator::new(Blinker::default());
        sim.send(Msg::Start);
        let hit = sim.advance_until(Duration::from_millis(10), Duration::from_secs(1), |m| {
            m.blinks >= 2
        });
        assert!(hit);
        assert_eq!(sim.now(), Duration::from_millis(200));
        let miss = sim.advance_until(Duration::from_millis(10), MS_100, |m| m.blinks >= 100);
        assert!(!miss);
    }
}
