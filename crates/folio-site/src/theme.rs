#![forbid(unsafe_code)]

//! The site-wide colour theme.
//!
//! [`ThemeStore`] is the single writer of the theme. It reads the persisted
//! preference once when created and writes it back on every change. Storage
//! problems never surface to callers: they are logged and the in-memory mode
//! stays authoritative for the session.
//!
//! Every change also flashes a full-screen overlay. Going dark inverts the
//! page through a difference blend; going light washes it out with a plain
//! white fade that lingers a little longer.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use folio_core::animation::{Animator, Step, ease_out};
use folio_core::effect::HostEffect;
use folio_core::scene::{Prop, Scene, Target};
use folio_runtime::{Cmd, Preferences};

/// Preference key holding the theme.
pub const THEME_KEY: &str = "theme";
/// Document class present while the light theme is active.
pub const LIGHT_CLASS: &str = "light";
/// The full-screen flash overlay.
pub const FLASH: Target = Target::new("theme.flash");

const DARK_FLASH: Duration = Duration::from_millis(1200);
const LIGHT_FLASH: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Only an exact `"light"` selects the light theme.
    pub fn parse(value: &str) -> Self {
        if value == "light" {
            Self::Light
        } else {
            Self::Dark
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    #[inline]
    pub const fn is_light(self) -> bool {
        matches!(self, Self::Light)
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the flash overlay composites over the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashBlend {
    Difference,
    Normal,
}

impl FlashBlend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Difference => "difference",
            Self::Normal => "normal",
        }
    }
}

/// Owner of the current [`ThemeMode`].
pub struct ThemeStore {
    mode: ThemeMode,
    prefs: Rc<Preferences>,
    flash: Option<FlashBlend>,
}

impl ThemeStore {
    /// Read the persisted theme. A missing, unreadable, or unrecognised value
    /// yields [`ThemeMode::Dark`].
    pub fn load(prefs: Rc<Preferences>) -> Self {
        if let Err(err) = prefs.load() {
            tracing::warn!(
                backend = prefs.backend_name(),
                error = %err,
                "theme preference unreadable; using default"
            );
        }
        let mode = prefs
            .get(THEME_KEY)
            .map_or(ThemeMode::Dark, |value| ThemeMode::parse(&value));
        tracing::debug!(%mode, "theme loaded");
        Self {
            mode,
            prefs,
            flash: None,
        }
    }

    #[inline]
    pub fn get(&self) -> ThemeMode {
        self.mode
    }

    /// The document class effect for the current mode, without a flash.
    /// Hosts apply it once at startup.
    pub fn apply<M>(&self) -> Cmd<M> {
        Cmd::host(HostEffect::SetDocumentClass {
            class: LIGHT_CLASS,
            enabled: self.mode.is_light(),
        })
    }

    /// Switch to `mode`: persist it, flash, and update the document class.
    pub fn set<M>(&mut self, mode: ThemeMode, animator: &mut Animator) -> Cmd<M> {
        self.mode = mode;
        self.persist();

        let (blend, duration) = match mode {
            ThemeMode::Dark => (FlashBlend::Difference, DARK_FLASH),
            ThemeMode::Light => (FlashBlend::Normal, LIGHT_FLASH),
        };
        self.flash = Some(blend);
        animator.tween(Step::from_to(FLASH, Prop::Opacity, 1.0, 0.0, duration).ease(ease_out));
        tracing::debug!(%mode, blend = blend.as_str(), "theme changed");

        self.apply()
    }

    pub fn toggle<M>(&mut self, animator: &mut Animator) -> Cmd<M> {
        let next = self.mode.toggled();
        self.set(next, animator)
    }

    /// Blend of the most recent flash, if any has fired.
    pub fn flash_blend(&self) -> Option<FlashBlend> {
        self.flash
    }

    pub fn view(&self, animator: &Animator, scene: &mut Scene) {
        scene.set_flag("theme.light", self.mode.is_light());
        let opacity = if self.flash.is_some() {
            animator.value(FLASH, Prop::Opacity)
        } else {
            0.0
        };
        scene.set_prop(FLASH, Prop::Opacity, opacity);
        if let Some(blend) = self.flash {
            scene.set_text("theme.flash.blend", blend.as_str());
        }
    }

    pub fn teardown(&mut self, animator: &mut Animator) {
        animator.cancel_target(FLASH);
    }

    fn persist(&self) {
        self.prefs.set(THEME_KEY, self.mode.as_str());
        if let Err(err) = self.prefs.flush() {
            tracing::warn!(
                backend = self.prefs.backend_name(),
                error = %err,
                "could not persist theme; keeping it for this session"
            );
        }
    }
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStore")
            .field("mode", &self.mode)
            .field("backend", &self.prefs.backend_name())
            .field("flash", &self.flash)
            .finish()
    }
}
