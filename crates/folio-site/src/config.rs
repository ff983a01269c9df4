#![forbid(unsafe_code)]

//! Site configuration.
//!
//! Every knob has a default matching the shipped site. Hosts may override a
//! few through environment variables (native hosts and tests) or by building
//! the structs directly (the browser shell).
//!
//! | Variable | Field |
//! |---|---|
//! | `FOLIO_SEED` | [`SiteConfig::seed`] |
//! | `FOLIO_PRELOADER_CEILING_MS` | [`PreloaderConfig::ceiling`] |
//! | `FOLIO_FEED_USER` | [`SiteConfig::feed_user`] |
//! | `FOLIO_REDUCED_MOTION` | [`SiteConfig::reduced_motion`] |

use std::time::Duration;

pub const SEED_ENV: &str = "FOLIO_SEED";
pub const PRELOADER_CEILING_ENV: &str = "FOLIO_PRELOADER_CEILING_MS";
pub const FEED_USER_ENV: &str = "FOLIO_FEED_USER";
pub const REDUCED_MOTION_ENV: &str = "FOLIO_REDUCED_MOTION";

/// Preloader pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloaderConfig {
    /// Interval between counter increments.
    pub tick: Duration,
    /// Smallest random increment per tick.
    pub min_step: u32,
    /// Largest random increment per tick (inclusive).
    pub max_step: u32,
    /// Completion is forced once this much time has passed.
    pub ceiling: Duration,
}

impl PreloaderConfig {
    #[must_use]
    pub const fn with_ceiling(mut self, ceiling: Duration) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// Set the increment range. Steps are at least 1 and `max_step` never
    /// drops below `min_step`.
    #[must_use]
    pub const fn with_steps(mut self, min_step: u32, max_step: u32) -> Self {
        let min_step = if min_step == 0 { 1 } else { min_step };
        self.min_step = min_step;
        self.max_step = if max_step < min_step { min_step } else { max_step };
        self
    }
}

impl Default for PreloaderConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(30),
            min_step: 1,
            max_step: 5,
            ceiling: Duration::from_millis(4000),
        }
    }
}

/// Drag physics for the theme toggle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToggleConfig {
    /// Press duration after which a press becomes a drag.
    pub hold: Duration,
    /// Rotation limit in degrees, both directions.
    pub max_angle: f32,
    /// Degrees of rotation per pixel of horizontal travel.
    pub sensitivity: f32,
    /// How far release velocity extends the swing.
    pub momentum: f32,
    /// Bulb scale while grabbed.
    pub grab_scale: f32,
}

impl ToggleConfig {
    #[must_use]
    pub const fn with_hold(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }

    #[must_use]
    pub const fn with_max_angle(mut self, max_angle: f32) -> Self {
        self.max_angle = max_angle;
        self
    }
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            hold: Duration::from_millis(300),
            max_angle: 45.0,
            sensitivity: 0.3,
            momentum: 3.0,
            grab_scale: 1.1,
        }
    }
}

/// Where the scroll spy samples the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSpyConfig {
    /// Fraction of the viewport height below the top edge.
    pub sample_ratio: f64,
}

impl Default for ScrollSpyConfig {
    fn default() -> Self {
        Self { sample_ratio: 0.4 }
    }
}

/// Top-level configuration for [`Site`](crate::app::Site).
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// Seed for every random choice (preloader steps, swing direction,
    /// scramble glyphs).
    pub seed: u64,
    /// Snap entrances to their end values instead of animating them.
    pub reduced_motion: bool,
    /// Account whose contribution feed is shown.
    pub feed_user: String,
    /// Offset of the local clock widget from UTC, in minutes.
    pub clock_offset_minutes: i16,
    /// Scroll distance after which the scroll-to-top button appears.
    pub scroll_top_threshold: f64,
    pub preloader: PreloaderConfig,
    pub toggle: ToggleConfig,
    pub scroll_spy: ScrollSpyConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            seed: 0x00F0_110F,
            reduced_motion: false,
            feed_user: "octocat".to_string(),
            clock_offset_minutes: 5 * 60 + 30,
            scroll_top_threshold: 300.0,
            preloader: PreloaderConfig::default(),
            toggle: ToggleConfig::default(),
            scroll_spy: ScrollSpyConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Defaults with overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from `lookup`. Unparseable values are ignored.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(seed) = lookup(SEED_ENV).and_then(|v| v.trim().parse().ok()) {
            config.seed = seed;
        }
        if let Some(ms) = lookup(PRELOADER_CEILING_ENV).and_then(|v| v.trim().parse().ok()) {
            config.preloader.ceiling = Duration::from_millis(ms);
        }
        if let Some(user) = lookup(FEED_USER_ENV).filter(|v| !v.trim().is_empty()) {
            config.feed_user = user.trim().to_string();
        }
        if let Some(flag) = lookup(REDUCED_MOTION_ENV) {
            config.reduced_motion = parse_flag(&flag);
        }
        config
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_reduced_motion(mut self, reduced_motion: bool) -> Self {
        self.reduced_motion = reduced_motion;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_shipped_site() {
        let config = SiteConfig::default();
        assert_eq!(config.preloader.tick, Duration::from_millis(30));
        assert_eq!(config.preloader.ceiling, Duration::from_millis(4000));
        assert_eq!((config.preloader.min_step, config.preloader.max_step), (1, 5));
        assert_eq!(config.toggle.hold, Duration::from_millis(300));
        assert_eq!(config.scroll_spy.sample_ratio, 0.4);
        assert_eq!(config.clock_offset_minutes, 330);
        assert!(!config.reduced_motion);
    }

    #[test]
    fn step_range_is_kept_positive_and_ordered() {
        let zero = PreloaderConfig::default().with_steps(0, 0);
        assert_eq!((zero.min_step, zero.max_step), (1, 1));
        let inverted = PreloaderConfig::default().with_steps(6, 2);
        assert_eq!((inverted.min_step, inverted.max_step), (6, 6));
        let kept = PreloaderConfig::default().with_steps(2, 9);
        assert_eq!((kept.min_step, kept.max_step), (2, 9));
    }

    #[test]
    fn environment_overrides_apply() {
        let config = SiteConfig::from_lookup(lookup(&[
            (SEED_ENV, "42"),
            (PRELOADER_CEILING_ENV, "1500"),
            (FEED_USER_ENV, " someone "),
            (REDUCED_MOTION_ENV, "TRUE"),
        ]));
        assert_eq!(config.seed, 42);
        assert_eq!(config.preloader.ceiling, Duration::from_millis(1500));
        assert_eq!(config.feed_user, "someone");
        assert!(config.reduced_motion);
    }

    #[test]
    fn garbage_overrides_are_ignored() {
        let config = SiteConfig::from_lookup(lookup(&[
            (SEED_ENV, "not-a-number"),
            (PRELOADER_CEILING_ENV, "-3"),
            (FEED_USER_ENV, "   "),
            (REDUCED_MOTION_ENV, "nah"),
        ]));
        assert_eq!(config, SiteConfig::default());
    }
}
