#![forbid(unsafe_code)]

//! Host effects: the side effects only the embedding page can perform.
//!
//! Models never touch the document directly. They return [`HostEffect`]s
//! through the runtime, and the host applies them (or, in tests, records them).

use std::time::Duration;

/// A document-level side effect.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEffect {
    /// Scroll the viewport to an absolute offset.
    ScrollTo { y: f64, smooth: bool },
    /// Smooth-scroll a named anchor into view.
    ScrollIntoView { anchor: String },
    /// Lock (`true`) or unlock page scrolling.
    SetScrollLock(bool),
    /// Add or remove a class on the document root.
    SetDocumentClass { class: &'static str, enabled: bool },
    /// Open a URL in a new browsing context.
    OpenExternal { url: String },
}

impl HostEffect {
    /// Scroll to the top of the document without smoothing.
    pub const fn scroll_to_origin() -> Self {
        Self::ScrollTo {
            y: 0.0,
            smooth: false,
        }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ScrollTo { .. } => "scroll_to",
            Self::ScrollIntoView { .. } => "scroll_into_view",
            Self::SetScrollLock(_) => "set_scroll_lock",
            Self::SetDocumentClass { .. } => "set_document_class",
            Self::OpenExternal { .. } => "open_external",
        }
    }
}

/// Oscillator shape for a synthesized tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl Waveform {
    /// Oscillator type name as used by Web Audio.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sine => "sine",
            Self::Triangle => "triangle",
            Self::Square => "square",
            Self::Sawtooth => "sawtooth",
        }
    }
}

/// A short synthesized tone: an exponential pitch ramp from `start_hz` to
/// `end_hz` and an exponential gain decay, both over `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Initial gain in `(0, 1]`.
    pub gain: f32,
    pub duration: Duration,
}

impl Tone {
    /// Gain every tone decays to by its end. Exponential ramps cannot reach
    /// zero, and this is far enough below any start gain to be inaudible.
    pub const FADE_FLOOR: f32 = 0.001;

    /// A fixed-pitch tone.
    pub const fn steady(waveform: Waveform, hz: f32, gain: f32, duration: Duration) -> Self {
        Self {
            waveform,
            start_hz: hz,
            end_hz: hz,
            gain,
            duration,
        }
    }

    /// A pitch sweep.
    pub const fn sweep(
        waveform: Waveform,
        start_hz: f32,
        end_hz: f32,
        gain: f32,
        duration: Duration,
    ) -> Self {
        Self {
            waveform,
            start_hz,
            end_hz,
            gain,
            duration,
        }
    }

    #[inline]
    pub fn is_sweep(&self) -> bool {
        self.start_hz != self.end_hz
    }
}
