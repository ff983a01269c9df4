#![forbid(unsafe_code)]

//! Contribution graph fed by a remote activity feed.
//!
//! The feed is fetched once per load. Its body is JSON of the form
//!
//! ```json
//! {"contributions": [{"date": "2025-01-05", "count": 3, "level": 1}, ...]}
//! ```
//!
//! where `level` (0..=4) is optional and derived from the busiest day when
//! missing. Days are laid out GitHub style: one column per week, Sunday at the
//! top, the first column padded down to the first day's weekday. Only the
//! trailing [`WINDOW_DAYS`] ending at the newest day are kept, so the grid
//! never grows past [`MAX_WEEKS`] columns.
//!
//! # Failure Modes
//!
//! Transport errors, malformed bodies, and empty feeds all land the graph in
//! [`FeedState::Empty`] with a `warn` log. Nothing retries.

use std::fmt;
use std::rc::Rc;

use folio_core::scene::Scene;
use folio_runtime::Cmd;
use serde::Deserialize;
use time::Date;
use time::macros::format_description;

/// Highest intensity bucket.
pub const MAX_LEVEL: u8 = 4;

/// Days kept, counting back from the newest one.
pub const WINDOW_DAYS: i64 = 371;

/// Upper bound on [`ContributionFeed::weeks`] columns, first-week padding
/// included.
pub const MAX_WEEKS: usize = 54;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The request never produced a body.
    Transport(String),
    /// The body was not a feed.
    Parse(String),
    /// The feed held no days.
    Empty,
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "feed transport error: {msg}"),
            Self::Parse(msg) => write!(f, "feed parse error: {msg}"),
            Self::Empty => write!(f, "feed is empty"),
        }
    }
}

impl std::error::Error for FeedError {}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<time::error::Parse> for FeedError {
    fn from(err: time::error::Parse) -> Self {
        Self::Parse(err.to_string())
    }
}

pub type FeedResult<T> = Result<T, FeedError>;

/// One day as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawDay {
    pub date: String,
    pub count: u32,
    #[serde(default)]
    pub level: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct FeedBody {
    contributions: Vec<RawDay>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionDay {
    pub date: Date,
    pub count: u32,
    pub level: u8,
}

/// One grid column, Sunday first. `None` cells are outside the feed.
pub type Week = [Option<ContributionDay>; 7];

/// Intensity bucket for `count` relative to the busiest day.
pub fn level_for(count: u32, max: u32) -> u8 {
    if count == 0 || max == 0 {
        return 0;
    }
    let scaled = (u64::from(count) * u64::from(MAX_LEVEL)).div_ceil(u64::from(max));
    scaled.clamp(1, u64::from(MAX_LEVEL)) as u8
}

/// Parsed feed, sorted by date with one entry per day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionFeed {
    days: Vec<ContributionDay>,
}

impl ContributionFeed {
    /// Parse a feed body.
    pub fn from_json(body: &str) -> FeedResult<Self> {
        let body: FeedBody = serde_json::from_str(body)?;
        Self::from_days(body.contributions)
    }

    /// Build from wire days. Repeated dates are merged by summing their
    /// counts, and days older than [`WINDOW_DAYS`] before the newest one are
    /// dropped.
    pub fn from_days(raw: Vec<RawDay>) -> FeedResult<Self> {
        if raw.is_empty() {
            return Err(FeedError::Empty);
        }
        let mut parsed: Vec<(Date, u32, Option<u8>)> = raw
            .into_iter()
            .map(|d| -> FeedResult<(Date, u32, Option<u8>)> {
                let date = Date::parse(&d.date, format_description!("[year]-[month]-[day]"))?;
                Ok((date, d.count, d.level))
            })
            .collect::<FeedResult<_>>()?;
        parsed.sort_by_key(|&(date, ..)| date);

        let mut merged: Vec<(Date, u32, Option<u8>)> = Vec::with_capacity(parsed.len());
        for (date, count, level) in parsed {
            match merged.last_mut() {
                Some(last) if last.0 == date => {
                    last.1 = last.1.saturating_add(count);
                    last.2 = None;
                }
                _ => merged.push((date, count, level)),
            }
        }
        if let Some(&(newest, ..)) = merged.last() {
            let before = merged.len();
            merged.retain(|&(date, ..)| (newest - date).whole_days() < WINDOW_DAYS);
            if merged.len() < before {
                tracing::debug!(dropped = before - merged.len(), "feed trimmed to trailing year");
            }
        }

        let max = merged.iter().map(|&(_, count, _)| count).max().unwrap_or(0);
        let days = merged
            .into_iter()
            .map(|(date, count, level)| ContributionDay {
                date,
                count,
                level: level.map_or_else(|| level_for(count, max), |l| l.min(MAX_LEVEL)),
            })
            .collect();
        Ok(Self { days })
    }

    pub fn days(&self) -> &[ContributionDay] {
        &self.days
    }

    pub fn total(&self) -> u64 {
        self.days.iter().map(|d| u64::from(d.count)).sum()
    }

    /// Lay the days out in week columns.
    pub fn weeks(&self) -> Vec<Week> {
        let Some(first) = self.days.first() else {
            return Vec::new();
        };
        let pad = i64::from(first.date.weekday().number_days_from_sunday());
        let mut weeks: Vec<Week> = Vec::new();
        for day in &self.days {
            let index = (day.date - first.date).whole_days() + pad;
            let (column, row) = ((index / 7) as usize, (index % 7) as usize);
            if weeks.len() <= column {
                weeks.resize(column + 1, [None; 7]);
            }
            weeks[column][row] = Some(*day);
        }
        weeks
    }
}

/// Where feed bodies come from. Hosts implement this over their HTTP stack.
pub trait ContributionSource {
    fn fetch(&self, user: &str) -> FeedResult<String>;
}

/// A source that always answers the same thing.
#[derive(Debug, Clone)]
pub struct StaticSource {
    body: FeedResult<String>,
}

impl StaticSource {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            body: Ok(body.into()),
        }
    }

    pub fn failing(err: FeedError) -> Self {
        Self { body: Err(err) }
    }
}

impl ContributionSource for StaticSource {
    fn fetch(&self, _user: &str) -> FeedResult<String> {
        self.body.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedState {
    #[default]
    Loading,
    Ready(ContributionFeed),
    /// Neutral empty graph; also where every failure ends up.
    Empty,
}

impl FeedState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContributionGraph {
    user: String,
    state: FeedState,
}

impl ContributionGraph {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            state: FeedState::Loading,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    /// Fetch and parse the feed as a task; `wrap` turns the outcome into the
    /// owner's message.
    pub fn load<M: 'static>(
        &self,
        source: Rc<dyn ContributionSource>,
        wrap: fn(FeedResult<ContributionFeed>) -> M,
    ) -> Cmd<M> {
        let user = self.user.clone();
        Cmd::task("contributions", move || {
            wrap(
                source
                    .fetch(&user)
                    .and_then(|body| ContributionFeed::from_json(&body)),
            )
        })
    }

    pub fn on_loaded(&mut self, result: FeedResult<ContributionFeed>) {
        self.state = match result {
            Ok(feed) => {
                tracing::debug!(
                    user = %self.user,
                    days = feed.days().len(),
                    total = feed.total(),
                    "contribution feed loaded"
                );
                FeedState::Ready(feed)
            }
            Err(err) => {
                tracing::warn!(
                    user = %self.user,
                    error = %err,
                    "contribution feed unavailable; showing empty graph"
                );
                FeedState::Empty
            }
        };
    }

    pub fn view(&self, scene: &mut Scene) {
        scene.set_text("feed.state", self.state.as_str());
        match &self.state {
            FeedState::Ready(feed) => {
                scene.set_text("feed.total", group_thousands(feed.total()));
                scene.set_text("feed.grid", grid_text(&feed.weeks()));
            }
            FeedState::Loading | FeedState::Empty => {
                scene.set_text("feed.total", "0");
                scene.set_text("feed.grid", "");
            }
        }
    }
}

/// `1240` -> `"1,240"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Columns separated by spaces, one character per day: the level digit, or
/// `.` outside the feed.
fn grid_text(weeks: &[Week]) -> String {
    weeks
        .iter()
        .map(|week| {
            week.iter()
                .map(|cell| match cell {
                    Some(day) => char::from(b'0' + day.level),
                    None => '.',
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}
