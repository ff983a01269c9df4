#![forbid(unsafe_code)]

//! One-shot timer queue on a host-driven clock.
//!
//! # Invariants
//!
//! 1. At most one pending entry per [`TimerId`]; scheduling an id again
//!    replaces the earlier entry (its message is dropped).
//! 2. Entries fire in `(due, scheduling order)` order, so two timers due at the
//!    same instant fire in the order they were scheduled.
//! 3. `pop_due(now)` never returns an entry with `due > now`.

use std::time::Duration;

use crate::program::TimerId;

struct Entry<M> {
    id: TimerId,
    due: Duration,
    seq: u64,
    msg: M,
}

/// A fired timer.
#[derive(Debug)]
pub struct Fired<M> {
    pub id: TimerId,
    pub due: Duration,
    pub msg: M,
}

/// Pending one-shot timers keyed by id.
pub struct TimerQueue<M> {
    entries: Vec<Entry<M>>,
    seq: u64,
}

impl<M> Default for TimerQueue<M> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            seq: 0,
        }
    }
}

impl<M> std::fmt::Debug for TimerQueue<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.entries.len())
            .field("next_due", &self.next_due())
            .finish()
    }
}

impl<M> TimerQueue<M> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `msg` at absolute time `due`. Returns `true` if an entry with
    /// the same id was replaced.
    pub fn schedule(&mut self, id: TimerId, due: Duration, msg: M) -> bool {
        let replaced = self.cancel(id);
        self.seq += 1;
        self.entries.push(Entry {
            id,
            due,
            seq: self.seq,
            msg,
        });
        replaced
    }

    /// Remove the pending entry for `id`. Returns whether one existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    /// Remove and return the earliest entry due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<Fired<M>> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(i, _)| i)?;
        let entry = self.entries.swap_remove(idx);
        Some(Fired {
            id: entry.id,
            due: entry.due,
            msg: entry.msg,
        })
    }

    /// Earliest pending due time.
    pub fn next_due(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.due).min()
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Due time of the pending entry for `id`.
    pub fn due_of(&self, id: TimerId) -> Option<Duration> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.due)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pending ids in firing order.
    pub fn pending(&self) -> Vec<TimerId> {
        let mut ids: Vec<_> = self.entries.iter().map(|e| (e.due, e.seq, e.id)).collect();
        ids.sort_by_key(|&(due, seq, _)| (due, seq));
        ids.into_iter().map(|(_, _, id)| id).collect()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
