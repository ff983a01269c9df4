#![forbid(unsafe_code)]

//! folio runtime
//!
//! Ties `folio-core` events and scenes to an application [`Model`].
//!
//! # Key Components
//!
//! - [`Model`] - Trait for page state and behaviour
//! - [`Cmd`] - Commands for side effects (timers, host effects, tasks)
//! - [`TimerQueue`] - One-shot timers keyed by [`TimerId`]
//! - [`ProgramSimulator`] - Deterministic runner for tests
//! - [`Preferences`] - Session cache over a pluggable preference backend
//!
//! # Role in folio
//! The runtime is host-agnostic. `folio-web` drives it from the browser's
//! animation frames; tests drive it through [`ProgramSimulator`] on a virtual
//! clock.

pub mod preferences;
pub mod program;
pub mod simulator;
pub mod timers;

pub use preferences::{
    MemoryPreferences, PreferenceBackend, PreferenceMap, PreferenceStats, Preferences,
    StorageError, StorageResult,
};
#[cfg(feature = "file-preferences")]
pub use preferences::FilePreferences;
pub use program::{Cmd, Model, TimerId};
pub use simulator::{CmdRecord, ProgramSimulator};
pub use timers::TimerQueue;
