#![forbid(unsafe_code)]

//! Stagger offsets for cascading list entrances.
//!
//! [`stagger_offsets`] computes when each of `count` items should start: the
//! first immediately, each later one `each` after its predecessor.

use std::time::Duration;

/// Start offsets for `count` items spaced `each` apart, first item first.
///
/// `count == 0` yields an empty vec and the first offset is always `ZERO`.
#[must_use]
pub fn stagger_offsets(count: usize, each: Duration) -> Vec<Duration> {
    (0..count)
        .map(|i| each.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn empty_and_single() {
        assert!(stagger_offsets(0, MS_100).is_empty());
        assert_eq!(stagger_offsets(1, MS_100), vec![Duration::ZERO]);
    }

    #[test]
    fn offsets_are_multiples_of_the_gap() {
        assert_eq!(
            stagger_offsets(4, MS_100),
            vec![
                Duration::ZERO,
                MS_100,
                Duration::from_millis(200),
                Duration::from_millis(300)
            ]
        );
    }

    #[test]
    fn huge_counts_saturate() {
        let offsets = stagger_offsets(3, Duration::MAX);
        assert_eq!(offsets[0], Duration::ZERO);
        assert_eq!(offsets[2], Duration::MAX);
    }
}
