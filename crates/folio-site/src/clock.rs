#![forbid(unsafe_code)]

//! Local-time widget: the owner's wall clock in a fixed UTC offset.
//!
//! The host pushes [`Event::WallClock`](folio_core::event::Event::WallClock)
//! about once a second; the widget never reads system time itself.

use folio_core::scene::Scene;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

#[derive(Debug, Clone)]
pub struct LocalClock {
    offset: UtcOffset,
    label: String,
    display: Option<String>,
}

impl LocalClock {
    /// Clock for an offset of `offset_minutes` east of UTC. Offsets outside
    /// ±25:59 fall back to UTC.
    pub fn new(offset_minutes: i32) -> Self {
        let offset = match UtcOffset::from_whole_seconds(offset_minutes.saturating_mul(60)) {
            Ok(offset) => offset,
            Err(err) => {
                tracing::warn!(offset_minutes, error = %err, "clock offset out of range; using UTC");
                UtcOffset::UTC
            }
        };
        Self {
            offset,
            label: zone_label(offset),
            display: None,
        }
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Zone abbreviation shown next to the time.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Render `unix_ms`. Out-of-range timestamps keep the previous reading.
    pub fn on_wall_clock(&mut self, unix_ms: i64) {
        match format_at(unix_ms, self.offset) {
            Ok(text) => self.display = Some(text),
            Err(err) => tracing::warn!(unix_ms, error = %err, "unrenderable wall clock tick"),
        }
    }

    /// `HH:MM:SS`, once the first tick has arrived.
    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn view(&self, scene: &mut Scene) {
        scene.set_text("clock.time", self.display.as_deref().unwrap_or("--:--:--"));
        scene.set_text("clock.zone", self.label.as_str());
    }
}

#[derive(Debug)]
enum ClockError {
    Range(time::error::ComponentRange),
    Format(time::error::Format),
}

impl std::fmt::Display for ClockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Range(err) => write!(f, "{err}"),
            Self::Format(err) => write!(f, "{err}"),
        }
    }
}

fn format_at(unix_ms: i64, offset: UtcOffset) -> Result<String, ClockError> {
    let nanos = i128::from(unix_ms) * 1_000_000;
    let instant = OffsetDateTime::from_unix_timestamp_nanos(nanos).map_err(ClockError::Range)?;
    instant
        .to_offset(offset)
        .format(format_description!("[hour]:[minute]:[second]"))
        .map_err(ClockError::Format)
}

fn zone_label(offset: UtcOffset) -> String {
    let (h, m, _) = offset.as_hms();
    match (h, m) {
        (0, 0) => "UTC".to_owned(),
        (5, 30) => "IST".to_owned(),
        _ => {
            let sign = if offset.is_negative() { '-' } else { '+' };
            format!("UTC{sign}{:02}:{:02}", h.unsigned_abs(), m.unsigned_abs())
        }
    }
}
