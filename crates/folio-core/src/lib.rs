#![forbid(unsafe_code)]

//! Core: events, host effects, scenes, and animation for the folio runtime.
//!
//! # Role in folio
//! `folio-core` is the vocabulary shared by everything else. Hosts translate
//! DOM input into [`event::Event`]s; models answer with
//! [`effect::HostEffect`]s and describe their output as a [`scene::Scene`].
//! The [`animation`] module provides the timeline sequencer and the per-frame
//! [`animation::Animator`] that all decorative motion runs on.

pub mod animation;
pub mod effect;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod rng;
pub mod scene;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, info_span, trace, warn};
