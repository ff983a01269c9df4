#![forbid(unsafe_code)]

//! Browser host for the folio site.
//!
//! The page script owns the DOM. This crate owns everything else:
//! - [`input`] decodes DOM-derived JSON into site events and encodes host
//!   effects and scenes back out,
//! - [`step_program`] runs the site model one host-driven step at a time,
//! - [`headless`] replays JSON input traces natively (the `folio-headless`
//!   binary),
//! - on `wasm32`, `FolioWeb` exposes the whole loop through `wasm-bindgen`,
//!   with preferences as plain `localStorage` items (see [`storage`]) and
//!   tones through Web Audio.

pub mod headless;
pub mod input;
pub mod step_program;
pub mod storage;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{FolioWeb, LocalStoragePreferences, WindowStorage};

pub use step_program::{StepProgram, StepResult, WebOutputs};
pub use storage::{ItemPreferences, ItemStore};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct FolioWeb;

#[cfg(not(target_arch = "wasm32"))]
impl FolioWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
