#![forbid(unsafe_code)]

//! Hover text scramble.
//!
//! On each 30 ms tick the text is redrawn with a revealed prefix and random
//! glyphs after it. The prefix grows by a third of a character per tick, so a
//! string of `n` characters settles after `3n` ticks. Restarting while a run
//! is in flight reschedules the same timer id, which replaces the pending
//! tick instead of adding a second one.
//!
//! Progress is counted in thirds so the reveal stays exact for any length.

use std::time::Duration;

use folio_core::rng::SeededRng;
use folio_core::scene::Scene;
use folio_runtime::{Cmd, TimerId};

pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+";

pub const TICK: Duration = Duration::from_millis(30);

const TIMER: TimerId = TimerId::new("scramble");

/// Timer message: the scramble in `slot` is due for another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrambleTick(pub u32);

#[derive(Debug, Clone)]
pub struct TextScramble {
    slot: u32,
    key: &'static str,
    text: Vec<char>,
    display: String,
    thirds: usize,
    revealed: usize,
    running: bool,
    rng: SeededRng,
}

impl TextScramble {
    /// A scramble for `text`, rendered under scene key `key`. `slot` must be
    /// unique among the site's scrambles.
    pub fn new(slot: u32, key: &'static str, text: &str, seed: u64) -> Self {
        Self {
            slot,
            key,
            text: text.chars().collect(),
            display: text.to_owned(),
            thirds: 0,
            revealed: 0,
            running: false,
            rng: SeededRng::new(seed ^ u64::from(slot)),
        }
    }

    #[inline]
    pub fn slot(&self) -> u32 {
        self.slot
    }

    #[inline]
    pub fn timer(&self) -> TimerId {
        TIMER.slot(self.slot)
    }

    /// Start (or restart) a run.
    pub fn start(&mut self) -> Cmd<ScrambleTick> {
        self.thirds = 0;
        self.revealed = 0;
        self.running = true;
        Cmd::after(self.timer(), TICK, ScrambleTick(self.slot))
    }

    /// Draw one frame and schedule the next one, if any.
    pub fn tick(&mut self) -> Cmd<ScrambleTick> {
        if !self.running {
            return Cmd::none();
        }
        let thirds = self.thirds;
        let rng = &mut self.rng;
        self.display = self
            .text
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                if 3 * i < thirds {
                    c
                } else {
                    char::from(ALPHABET[rng.next_index(ALPHABET.len())])
                }
            })
            .collect();
        self.revealed = thirds.div_ceil(3).min(self.text.len());

        if thirds >= 3 * self.text.len() {
            self.running = false;
            return Cmd::none();
        }
        self.thirds += 1;
        Cmd::after(self.timer(), TICK, ScrambleTick(self.slot))
    }

    /// Leading characters the last frame showed unscrambled.
    #[inline]
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn view(&self, scene: &mut Scene) {
        scene.set_text(self.key, self.display.as_str());
    }

    /// Stop and show the plain text.
    pub fn teardown(&mut self) -> Cmd<ScrambleTick> {
        self.running = false;
        self.revealed = self.text.len();
        self.display = self.text.iter().collect();
        Cmd::cancel(self.timer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(scramble: &mut TextScramble) -> usize {
        let mut ticks = 0;
        while matches!(scramble.tick(), Cmd::After { .. }) {
            ticks += 1;
            assert!(ticks < 10_000);
        }
        ticks + 1
    }

    #[test]
    fn settles_on_the_text() {
        let mut s = TextScramble::new(0, "logo", "Satish", 7);
        assert_eq!(s.display(), "Satish");
        assert!(matches!(s.start(), Cmd::After { delay, .. } if delay == TICK));
        let ticks = run_to_end(&mut s);
        // 3n increments plus the final settling frame.
        assert_eq!(ticks, 3 * 6 + 1);
        assert_eq!(s.display(), "Satish");
        assert!(!s.is_running());
    }

    #[test]
    fn prefix_only_grows() {
        let mut s = TextScramble::new(1, "email", "hello@example.com", 3);
        let _ = s.start();
        let mut last = 0;
        for _ in 0..20 {
            let _ = s.tick();
            let revealed = s.revealed();
            assert!(revealed >= last);
            let shown: String = s.display().chars().take(revealed).collect();
            let expected: String = "hello@example.com".chars().take(revealed).collect();
            assert_eq!(shown, expected);
            last = revealed;
        }
    }

    #[test]
    fn scrambled_glyphs_come_from_the_alphabet() {
        let mut s = TextScramble::new(0, "logo", "abc", 11);
        let _ = s.start();
        let _ = s.tick();
        // Nothing is revealed on the first frame.
        assert!(s.display().bytes().all(|b| ALPHABET.contains(&b)));
        assert_eq!(s.display().chars().count(), 3);
    }

    #[test]
    fn restart_rewinds_progress() {
        let mut s = TextScramble::new(2, "logo", "folio", 5);
        let _ = s.start();
        for _ in 0..9 {
            let _ = s.tick();
        }
        assert_eq!(s.revealed(), 3);
        let cmd = s.start();
        assert_eq!(s.revealed(), 0);
        assert!(matches!(cmd, Cmd::After { timer, .. } if timer == TIMER.slot(2)));
    }

    #[test]
    fn idle_tick_is_ignored() {
        let mut s = TextScramble::new(0, "logo", "x", 1);
        assert!(s.tick().is_none());
        assert_eq!(s.display(), "x");
    }

    #[test]
    fn teardown_restores_text_and_cancels() {
        let mut s = TextScramble::new(4, "logo", "folio", 5);
        let _ = s.start();
        let _ = s.tick();
        assert!(matches!(s.teardown(), Cmd::Cancel(t) if t == TIMER.slot(4)));
        assert_eq!(s.display(), "folio");
        assert!(s.tick().is_none());
    }
}
