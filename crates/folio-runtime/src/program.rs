#![forbid(unsafe_code)]

//! Elm-style program contract for host-driven pages.
//!
//! A [`Model`] owns all state. The runtime feeds it messages (converted from
//! host [`Event`]s, fired timers, or finished tasks) and executes the
//! [`Cmd`]s it returns. `view()` describes the current output as a [`Scene`].
//!
//! # Example
//!
//! ```ignore
//! use folio_runtime::program::{Cmd, Model, TimerId};
//! use folio_core::event::Event;
//! use folio_core::scene::Scene;
//! use std::time::Duration;
//!
//! const BLINK: TimerId = TimerId::new("blink");
//!
//! struct Cursor { on: bool }
//!
//! enum Msg { Blink, Event(Event) }
//!
//! impl From<Event> for Msg {
//!     fn from(e: Event) -> Self { Msg::Event(e) }
//! }
//!
//! impl Model for Cursor {
//!     type Message = Msg;
//!
//!     fn init(&mut self) -> Cmd<Msg> {
//!         Cmd::after(BLINK, Duration::from_millis(500), Msg::Blink)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Blink => {
//!                 self.on = !self.on;
//!                 Cmd::after(BLINK, Duration::from_millis(500), Msg::Blink)
//!             }
//!             Msg::Event(_) => Cmd::none(),
//!         }
//!     }
//!
//!     fn view(&self, scene: &mut Scene) {
//!         scene.set_flag("cursor.on", self.on);
//!     }
//! }
//! ```

use std::fmt;
use std::time::Duration;

use folio_core::effect::HostEffect;
use folio_core::event::Event;
use folio_core::scene::Scene;

/// Interface for page state and behaviour.
pub trait Model: Sized {
    /// Messages drive `update`. Host events must convert into them.
    type Message: From<Event> + 'static;

    /// Called once when the program starts.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// The state transition function.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Describe the current output.
    fn view(&self, scene: &mut Scene);

    /// Called once when the program is torn down (page unload, unmount).
    ///
    /// Models cancel their timers and in-flight animations here. Pending
    /// timers are dropped by the runtime after this returns regardless.
    fn teardown(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }
}

/// Identity of a one-shot timer.
///
/// Scheduling a timer whose id is already pending replaces it, so each id has
/// at most one pending firing. `slot` distinguishes instances of the same
/// component (one scramble timer per text, say).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId {
    name: &'static str,
    slot: u32,
}

impl TimerId {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name, slot: 0 }
    }

    #[must_use]
    pub const fn slot(self, slot: u32) -> Self {
        Self {
            name: self.name,
            slot,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn slot_index(&self) -> u32 {
        self.slot
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.slot == 0 {
            f.write_str(self.name)
        } else {
            write!(f, "{}#{}", self.name, self.slot)
        }
    }
}

/// Commands represent side effects to be executed by the runtime.
#[derive(Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Execute several commands in order.
    Batch(Vec<Cmd<M>>),
    /// Send a message to the model immediately.
    Msg(M),
    /// Deliver `msg` once `delay` has elapsed on the runtime clock.
    After {
        timer: TimerId,
        delay: Duration,
        msg: M,
    },
    /// Drop a pending timer. Unknown ids are ignored.
    Cancel(TimerId),
    /// Run a closure and feed its result back as a message.
    ///
    /// Hosts without threads run it inline on the next step.
    Task(String, Box<dyn FnOnce() -> M>),
    /// Ask the host to perform a document-level effect.
    Host(HostEffect),
}

impl<M: fmt::Debug> fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::After { timer, delay, msg } => f
                .debug_struct("After")
                .field("timer", timer)
                .field("delay", delay)
                .field("msg", msg)
                .finish(),
            Self::Cancel(timer) => f.debug_tuple("Cancel").field(timer).finish(),
            Self::Task(name, _) => f.debug_tuple("Task").field(name).finish(),
            Self::Host(effect) => f.debug_tuple("Host").field(effect).finish(),
        }
    }
}

impl<M> Cmd<M> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Combine commands, flattening `None`s.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    /// Schedule a one-shot timer.
    #[inline]
    pub fn after(timer: TimerId, delay: Duration, msg: M) -> Self {
        Self::After { timer, delay, msg }
    }

    /// Cancel a pending timer.
    #[inline]
    pub fn cancel(timer: TimerId) -> Self {
        Self::Cancel(timer)
    }

    /// Create a named task command.
    pub fn task<F>(name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce() -> M + 'static,
    {
        Self::Task(name.into(), Box::new(f))
    }

    /// Create a host effect command.
    #[inline]
    pub fn host(effect: HostEffect) -> Self {
        Self::Host(effect)
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Return a stable name for tracing.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Batch(_) => "Batch",
            Self::Msg(_) => "Msg",
            Self::After { .. } => "After",
            Self::Cancel(_) => "Cancel",
            Self::Task(..) => "Task",
            Self::Host(_) => "Host",
        }
    }

    /// Convert the message type, so a component's commands can be lifted
    /// into its parent's.
    pub fn map<N, F>(self, f: F) -> Cmd<N>
    where
        M: 'static,
        N: 'static,
        F: Fn(M) -> N + Clone + 'static,
    {
        match self {
            Self::None => Cmd::None,
            Self::Batch(cmds) => Cmd::Batch(cmds.into_iter().map(|c| c.map(f.clone())).collect()),
            Self::Msg(m) => Cmd::Msg(f(m)),
            Self::After { timer, delay, msg } => Cmd::After {
                timer,
                delay,
                msg: f(msg),
            },
            Self::Cancel(timer) => Cmd::Cancel(timer),
            Self::Task(name, task) => Cmd::Task(name, Box::new(move || f(task()))),
            Self::Host(effect) => Cmd::Host(effect),
        }
    }

    /// Number of leaf commands (batches counted by their contents).
    pub fn count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Batch(cmds) => cmds.iter().map(Self::count).sum(),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Inner {
        Tick,
        Loaded(u32),
    }

    #[derive(Debug, PartialEq)]
    enum Outer {
        Child(Inner),
    }

    const T: TimerId = TimerId::new("tick");

    #[test]
    fn batch_flattens_trivial_cases() {
        assert!(Cmd::<Inner>::batch(vec![]).is_none());
        assert!(Cmd::<Inner>::batch(vec![Cmd::none(), Cmd::none()]).is_none());
        assert!(matches!(
            Cmd::batch(vec![Cmd::none(), Cmd::msg(Inner::Tick)]),
            Cmd::Msg(Inner::Tick)
        ));
        let both = Cmd::batch(vec![Cmd::msg(Inner::Tick), Cmd::cancel(T)]);
        assert_eq!(both.type_name(), "Batch");
        assert_eq!(both.count(), 2);
    }

    #[test]
    fn map_lifts_messages_and_keeps_timers() {
        let cmd = Cmd::batch(vec![
            Cmd::after(T, Duration::from_millis(30), Inner::Tick),
            Cmd::cancel(T.slot(2)),
        ])
        .map(Outer::Child);
        let Cmd::Batch(cmds) = cmd else {
            panic!("expected batch");
        };
        match &cmds[0] {
            Cmd::After { timer, delay, msg } => {
                assert_eq!(*timer, T);
                assert_eq!(*delay, Duration::from_millis(30));
                assert_eq!(*msg, Outer::Child(Inner::Tick));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(cmds[1], Cmd::Cancel(t) if t == T.slot(2)));
    }

    #[test]
    fn map_wraps_task_results() {
        let cmd = Cmd::task("load", || Inner::Loaded(7)).map(Outer::Child);
        let Cmd::Task(name, f) = cmd else {
            panic!("expected task");
        };
        assert_eq!(name, "load");
        assert_eq!(f(), Outer::Child(Inner::Loaded(7)));
    }

    #[test]
    fn timer_display() {
        assert_eq!(T.to_string(), "tick");
        assert_eq!(T.slot(3).to_string(), "tick#3");
        assert_eq!(T.slot(3).slot_index(), 3);
        assert_eq!(T.name(), "tick");
    }
}
