#![forbid(unsafe_code)]

use core::time::Duration;

use folio_core::effect::{Tone, Waveform};
use folio_core::event::Event;
use folio_runtime::{Preferences, StorageError, StorageResult};
use folio_site::contributions::{ContributionFeed, FeedError};
use folio_site::sound::{AudioBackend, AudioError, AudioSink};
use folio_site::theme::THEME_KEY;
use folio_site::{Msg, Site, SiteConfig, SiteContent};
use wasm_bindgen::prelude::*;
use web_sys::{AudioContext, AudioContextState, OscillatorType, Storage};

use crate::input::{StepOutputJson, event_from_json_str};
use crate::step_program::StepProgram;
use crate::storage::{ItemPreferences, ItemStore};

/// Preference keys the site owns in `localStorage`.
const OWNED_KEYS: &[&str] = &[THEME_KEY];

/// Wall-clock ticks are pushed at most this often.
const CLOCK_INTERVAL: Duration = Duration::from_secs(1);

fn js_reason(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

// ---------------------------------------------------------------------------
// Preferences over localStorage
// ---------------------------------------------------------------------------

/// `window.localStorage`, looked up on every access.
///
/// Private browsing and disabled storage surface as
/// [`StorageError::Unavailable`]; the registry keeps working from its cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowStorage;

impl WindowStorage {
    fn storage() -> StorageResult<Storage> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|err| StorageError::Unavailable(js_reason(&err)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
    }
}

impl ItemStore for WindowStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(js_reason(&err)))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::Unavailable(js_reason(&err)))
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        Self::storage()?
            .remove_item(key)
            .map_err(|err| StorageError::Unavailable(js_reason(&err)))
    }

    fn is_available(&self) -> bool {
        Self::storage().is_ok()
    }
}

/// The site's preferences, one plain `localStorage` item per key.
pub type LocalStoragePreferences = ItemPreferences<WindowStorage>;

// ---------------------------------------------------------------------------
// Web Audio
// ---------------------------------------------------------------------------

/// Opens one `AudioContext` on first use.
#[derive(Debug, Default)]
struct WebAudio;

impl AudioBackend for WebAudio {
    fn open(&mut self) -> Result<Box<dyn AudioSink>, AudioError> {
        let ctx = AudioContext::new().map_err(|err| AudioError::Blocked(js_reason(&err)))?;
        // Contexts created outside a user gesture start suspended.
        if ctx.state() == AudioContextState::Suspended
            && let Err(err) = ctx.resume()
        {
            tracing::warn!(reason = %js_reason(&err), "audio context stays suspended");
        }
        Ok(Box::new(WebAudioSink { ctx }))
    }
}

struct WebAudioSink {
    ctx: AudioContext,
}

impl WebAudioSink {
    fn oscillator_type(waveform: Waveform) -> OscillatorType {
        match waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Triangle => OscillatorType::Triangle,
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
        }
    }

    fn schedule(&self, tone: &Tone) -> Result<(), JsValue> {
        let now = self.ctx.current_time();
        let end = now + tone.duration.as_secs_f64();

        let osc = self.ctx.create_oscillator()?;
        let gain = self.ctx.create_gain()?;
        osc.set_type(Self::oscillator_type(tone.waveform));
        osc.frequency().set_value_at_time(tone.start_hz, now)?;
        if tone.is_sweep() {
            osc.frequency()
                .exponential_ramp_to_value_at_time(tone.end_hz, end)?;
        }
        gain.gain().set_value_at_time(tone.gain, now)?;
        gain.gain()
            .exponential_ramp_to_value_at_time(Tone::FADE_FLOOR, end)?;

        osc.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&self.ctx.destination())?;
        osc.start()?;
        osc.stop_with_when(end)?;
        Ok(())
    }
}

impl AudioSink for WebAudioSink {
    fn play(&mut self, tone: &Tone) {
        if let Err(err) = self.schedule(tone) {
            tracing::warn!(reason = %js_reason(&err), "tone dropped");
        }
    }
}

// ---------------------------------------------------------------------------
// JS surface
// ---------------------------------------------------------------------------

/// The portfolio site, driven by the page script.
///
/// The script forwards DOM input as JSON through `input`, calls `frame` once
/// per `requestAnimationFrame`, and applies the returned JSON (host effects
/// plus the latest scene) to the document.
#[wasm_bindgen]
pub struct FolioWeb {
    program: StepProgram<Site>,
    since_clock: Duration,
}

#[wasm_bindgen]
impl FolioWeb {
    /// Build the site. `content_json` replaces the bundled content when given.
    #[wasm_bindgen(constructor)]
    pub fn new(
        seed: u32,
        reduced_motion: bool,
        content_json: Option<String>,
    ) -> Result<FolioWeb, JsValue> {
        let content = match content_json {
            Some(json) => SiteContent::from_json(&json)
                .map_err(|err| JsValue::from_str(&err.to_string()))?,
            None => SiteContent::default(),
        };
        let config = SiteConfig::default()
            .with_seed(u64::from(seed))
            .with_reduced_motion(reduced_motion);
        let backend = LocalStoragePreferences::new(WindowStorage, OWNED_KEYS);
        let prefs = Preferences::new(Box::new(backend)).shared();
        let site = Site::new(config, content, prefs, Box::new(WebAudio));
        Ok(Self {
            program: StepProgram::new(site),
            since_clock: CLOCK_INTERVAL,
        })
    }

    /// Start the preloader and apply the stored theme.
    pub fn init(&mut self) {
        if !self.program.is_initialized() {
            self.program.init();
        }
    }

    /// Queue one DOM-derived event (see the `input` module for the schema).
    pub fn input(&mut self, json: &str) -> Result<(), JsValue> {
        let event = event_from_json_str(json).map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.program.push_event(event);
        Ok(())
    }

    /// Advance by `dt_ms`, step once, and return the effects and scene to
    /// apply as JSON.
    pub fn frame(&mut self, dt_ms: f64) -> Result<String, JsValue> {
        if !self.program.is_initialized() {
            return Err(JsValue::from_str("FolioWeb.frame() called before init()"));
        }
        let dt = Duration::from_secs_f64(dt_ms.max(0.0) / 1000.0);
        self.since_clock += dt;
        if self.since_clock >= CLOCK_INTERVAL {
            self.since_clock = Duration::ZERO;
            self.program.push_event(Event::WallClock {
                unix_ms: js_sys::Date::now() as i64,
            });
        }
        self.program.advance_time(dt);
        self.program.step();
        self.take_output()
    }

    /// Hand over the body of a completed contribution-feed request.
    pub fn feed(&mut self, body: &str) {
        self.program
            .send(Msg::FeedLoaded(ContributionFeed::from_json(body)));
    }

    /// Report that the contribution-feed request failed.
    #[wasm_bindgen(js_name = feedFailed)]
    pub fn feed_failed(&mut self, reason: &str) {
        self.program
            .send(Msg::FeedLoaded(Err(FeedError::Transport(reason.to_string()))));
    }

    /// Account whose contribution feed the page script should fetch.
    #[wasm_bindgen(js_name = feedUser)]
    pub fn feed_user(&self) -> String {
        self.program.model().config().feed_user.clone()
    }

    /// Tear the site down, releasing the scroll lock. Returns the final
    /// effects as JSON.
    pub fn destroy(&mut self) -> Result<String, JsValue> {
        self.program.shutdown();
        self.take_output()
    }

    fn take_output(&mut self) -> Result<String, JsValue> {
        let outputs = self.program.take_outputs();
        serde_json::to_string(&StepOutputJson::from(&outputs))
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }
}
