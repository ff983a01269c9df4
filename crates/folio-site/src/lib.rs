#![forbid(unsafe_code)]

//! The portfolio site's interaction layer.
//!
//! # Role in folio
//! `folio-site` holds the page's state machines and wires them into one
//! [`Site`] model for `folio-runtime`:
//!
//! - [`theme::ThemeStore`] - light/dark mode, persisted, with a flash transition
//! - [`sound::SoundStore`] - hover and click tones, muted by default
//! - [`scroll_spy::ScrollSpy`] - which home section is under the viewport
//! - [`router::ViewRouter`] - home versus the goals and year-in-review pages
//! - [`modal::ModalCoordinator`] - the project overlay and its scroll lock
//! - [`preloader::PreloaderSequencer`] - the loading counter and exit curtain
//! - [`toggle::DragPhysicsToggle`] - the hanging-bulb theme switch
//!
//! Decorative pieces ([`dock`], [`progress`], [`cursor`], [`magnetic`],
//! [`scramble`], [`clock`]) and the [`contributions`] graph ride along.
//! Everything animates through one shared
//! [`Animator`](folio_core::animation::Animator).

pub mod app;
pub mod clock;
pub mod config;
pub mod content;
pub mod contributions;
pub mod cursor;
pub mod dock;
pub mod magnetic;
pub mod modal;
pub mod pages;
pub mod preloader;
pub mod progress;
pub mod router;
pub mod scramble;
pub mod scroll_lock;
pub mod scroll_spy;
pub mod sound;
pub mod theme;
pub mod toggle;

pub use app::{Action, Msg, Site};
pub use config::SiteConfig;
pub use content::SiteContent;
