#![forbid(unsafe_code)]

//! The site without a browser.
//!
//! [`run`] reads input events as JSON lines, in the schema the page script
//! sends to `FolioWeb.input`, and steps the site at a fixed frame rate. Every
//! step that produced effects or a scene is written out as one JSON line, so
//! a trace recorded in the browser can be replayed and diffed natively.
//!
//! Blank lines and lines starting with `#` are skipped. One event is applied
//! per frame. Once input runs out the site keeps stepping for the settle
//! window and is then shut down.

use core::time::Duration;
use std::io::{self, BufRead, Write};

use folio_runtime::Preferences;
use folio_site::sound::NullAudio;
use folio_site::{Site, SiteConfig, SiteContent};

use crate::input::{StepOutputJson, event_from_json_str};
use crate::step_program::StepProgram;

/// Virtual time between steps.
pub const FRAME: Duration = Duration::from_millis(16);

/// How long to keep stepping after the last input line.
pub const DEFAULT_SETTLE: Duration = Duration::from_secs(5);

/// Overrides [`DEFAULT_SETTLE`], in milliseconds.
pub const SETTLE_ENV: &str = "FOLIO_SETTLE_MS";

/// Counts from one [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Input lines applied as events.
    pub events: u32,
    /// Input lines that did not decode.
    pub skipped: u32,
    /// Output lines written.
    pub written: u32,
    /// Virtual time covered.
    pub elapsed: Duration,
}

/// The settle window from [`SETTLE_ENV`], or [`DEFAULT_SETTLE`].
pub fn settle_from_env() -> Duration {
    std::env::var(SETTLE_ENV)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .map_or(DEFAULT_SETTLE, Duration::from_millis)
}

/// Replay `input` against a fresh site built from `config`, writing host
/// output to `output`.
///
/// Preferences live in memory and audio is unavailable, so the run depends
/// on nothing but its arguments.
pub fn run<R: BufRead, W: Write>(
    config: SiteConfig,
    input: R,
    mut output: W,
    settle: Duration,
) -> io::Result<ReplaySummary> {
    let site = Site::new(
        config,
        SiteContent::default(),
        Preferences::in_memory().shared(),
        Box::new(NullAudio),
    );
    let mut program = StepProgram::new(site);
    let mut summary = ReplaySummary::default();

    program.init();
    emit(&mut program, &mut output, &mut summary)?;

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match event_from_json_str(line) {
            Ok(event) => {
                program.push_event(event);
                summary.events += 1;
            }
            Err(err) => {
                tracing::warn!(line = idx + 1, error = %err, "input line skipped");
                summary.skipped += 1;
                continue;
            }
        }
        frame(&mut program, &mut output, &mut summary)?;
    }

    let settle_until = program.now().saturating_add(settle);
    while program.now() < settle_until {
        frame(&mut program, &mut output, &mut summary)?;
    }

    program.shutdown();
    emit(&mut program, &mut output, &mut summary)?;
    summary.elapsed = program.now();
    output.flush()?;

    tracing::info!(
        events = summary.events,
        skipped = summary.skipped,
        written = summary.written,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "replay finished"
    );
    Ok(summary)
}

fn frame<W: Write>(
    program: &mut StepProgram<Site>,
    output: &mut W,
    summary: &mut ReplaySummary,
) -> io::Result<()> {
    program.advance_time(FRAME);
    program.step();
    emit(program, output, summary)
}

fn emit<W: Write>(
    program: &mut StepProgram<Site>,
    output: &mut W,
    summary: &mut ReplaySummary,
) -> io::Result<()> {
    let outputs = program.take_outputs();
    if outputs.effects.is_empty() && outputs.last_scene.is_none() {
        return Ok(());
    }
    serde_json::to_writer(&mut *output, &StepOutputJson::from(&outputs))
        .map_err(io::Error::other)?;
    output.write_all(b"\n")?;
    summary.written += 1;
    Ok(())
}
