#![forbid(unsafe_code)]

//! UI sound effects.
//!
//! Sound starts muted every session. The audio output is opened lazily the
//! first time the visitor unmutes, and only once: if the host refuses (no
//! audio API, autoplay policy), the store stays muted for the rest of the
//! session and later toggles do nothing audible.
//!
//! # Invariants
//!
//! 1. `play_hover`/`play_click` never reach the sink while muted.
//! 2. [`AudioBackend::open`] is called at most once per store.
//! 3. The confirmation tone on unmute is the only tone emitted regardless of
//!    the mute flag.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use folio_core::effect::{Tone, Waveform};

/// Played once when sound is switched on.
pub const CONFIRM_TONE: Tone =
    Tone::sweep(Waveform::Sine, 600.0, 300.0, 0.1, Duration::from_millis(100));
/// High, short blip for hovers.
pub const HOVER_TONE: Tone = Tone::steady(Waveform::Sine, 800.0, 0.02, Duration::from_millis(50));
/// Low "thock" for clicks.
pub const CLICK_TONE: Tone =
    Tone::sweep(Waveform::Triangle, 300.0, 100.0, 0.05, Duration::from_millis(100));

/// Why the audio output could not be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// The host has no audio API.
    Unsupported,
    /// The host has one but refused to create an output.
    Blocked(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "audio output is not supported"),
            Self::Blocked(reason) => write!(f, "audio output blocked: {reason}"),
        }
    }
}

impl std::error::Error for AudioError {}

/// An open audio output.
pub trait AudioSink {
    fn play(&mut self, tone: &Tone);
}

/// Something that can open an audio output.
pub trait AudioBackend {
    fn open(&mut self) -> Result<Box<dyn AudioSink>, AudioError>;
}

enum Output {
    Unacquired,
    Ready(Box<dyn AudioSink>),
    Failed,
}

/// Mute flag plus the lazily opened output.
pub struct SoundStore {
    muted: bool,
    backend: Box<dyn AudioBackend>,
    output: Output,
}

impl SoundStore {
    #[must_use]
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            muted: true,
            backend,
            output: Output::Unacquired,
        }
    }

    /// Flip the mute flag. Returns the new `muted` value.
    pub fn toggle(&mut self) -> bool {
        if !self.muted {
            self.muted = true;
            tracing::debug!("sound muted");
            return true;
        }
        let Some(sink) = self.acquire() else {
            return true;
        };
        sink.play(&CONFIRM_TONE);
        self.muted = false;
        tracing::debug!("sound unmuted");
        false
    }

    pub fn play_hover(&mut self) {
        self.play_gated(&HOVER_TONE);
    }

    pub fn play_click(&mut self) {
        self.play_gated(&CLICK_TONE);
    }

    #[inline]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Whether an output was opened successfully.
    pub fn has_output(&self) -> bool {
        matches!(self.output, Output::Ready(_))
    }

    fn play_gated(&mut self, tone: &Tone) {
        if self.muted {
            return;
        }
        if let Output::Ready(sink) = &mut self.output {
            sink.play(tone);
        }
    }

    fn acquire(&mut self) -> Option<&mut Box<dyn AudioSink>> {
        if matches!(self.output, Output::Unacquired) {
            self.output = match self.backend.open() {
                Ok(sink) => Output::Ready(sink),
                Err(err) => {
                    tracing::warn!(error = %err, "audio unavailable; sound stays muted");
                    Output::Failed
                }
            };
        }
        match &mut self.output {
            Output::Ready(sink) => Some(sink),
            Output::Unacquired | Output::Failed => None,
        }
    }
}

impl fmt::Debug for SoundStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output = match self.output {
            Output::Unacquired => "unacquired",
            Output::Ready(_) => "ready",
            Output::Failed => "failed",
        };
        f.debug_struct("SoundStore")
            .field("muted", &self.muted)
            .field("output", &output)
            .finish()
    }
}

/// Backend for hosts without audio. Every open fails with
/// [`AudioError::Unsupported`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn open(&mut self) -> Result<Box<dyn AudioSink>, AudioError> {
        Err(AudioError::Unsupported)
    }
}

/// Backend that records tones instead of playing them.
///
/// Clones share the same log, so a test can keep one and hand the other to a
/// [`SoundStore`].
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    log: Rc<RefCell<Vec<Tone>>>,
    opens: Rc<Cell<u32>>,
    refuse: bool,
}

impl RecordingAudio {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder whose `open` always fails.
    #[must_use]
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    /// Tones played so far.
    pub fn played(&self) -> Vec<Tone> {
        self.log.borrow().clone()
    }

    /// How many times `open` was called.
    pub fn opens(&self) -> u32 {
        self.opens.get()
    }
}

struct RecordingSink(Rc<RefCell<Vec<Tone>>>);

impl AudioSink for RecordingSink {
    fn play(&mut self, tone: &Tone) {
        self.0.borrow_mut().push(*tone);
    }
}

impl AudioBackend for RecordingAudio {
    fn open(&mut self) -> Result<Box<dyn AudioSink>, AudioError> {
        self.opens.set(self.opens.get() + 1);
        if self.refuse {
            return Err(AudioError::Blocked("refused by test backend".into()));
        }
        Ok(Box::new(RecordingSink(Rc::clone(&self.log))))
    }
}
