//! Property tests for timer ordering.
//!
//! # Invariants
//!
//! 1. Fired entries come out sorted by due time.
//! 2. Each id fires at most once, with the message of its latest scheduling.
//! 3. Nothing fires before its due time.

use std::collections::HashMap;
use std::time::Duration;

use folio_runtime::{TimerId, TimerQueue};
use proptest::prelude::*;

const NAMES: [&str; 4] = ["hold", "tick", "ceiling", "scramble"];

fn schedule_ops() -> impl Strategy<Value = Vec<(usize, u32, u64)>> {
    prop::collection::vec((0usize..4, 0u32..3, 0u64..500), 1..60)
}

proptest! {
    #[test]
    fn fires_sorted_unique_latest(ops in schedule_ops(), horizon in 0u64..600) {
        let mut q = TimerQueue::new();
        let mut latest: HashMap<TimerId, (u64, usize)> = HashMap::new();
        for (i, (name, slot, due)) in ops.iter().enumerate() {
            let id = TimerId::new(NAMES[*name]).slot(*slot);
            q.schedule(id, Duration::from_millis(*due), i);
            latest.insert(id, (*due, i));
        }
        prop_assert_eq!(q.len(), latest.len());

        let now = Duration::from_millis(horizon);
        let mut last_due = Duration::ZERO;
        let mut seen = Vec::new();
        while let Some(fired) = q.pop_due(now) {
            prop_assert!(fired.due <= now);
            prop_assert!(fired.due >= last_due);
            last_due = fired.due;
            let (due, idx) = latest[&fired.id];
            prop_assert_eq!(fired.due, Duration::from_millis(due));
            prop_assert_eq!(fired.msg, idx);
            prop_assert!(!seen.contains(&fired.id));
            seen.push(fired.id);
        }
        let expected = latest.values().filter(|(due, _)| *due <= horizon).count();
        prop_assert_eq!(seen.len(), expected);
    }
}
