//! Bounded match counting
//!
//! `rescan` drains a lazy match cursor into a [`MatchIndexBuffer`], stopping
//! once the buffer is full. The cost is at most `capacity + 1` cursor
//! advances no matter how large the document is; when matches remain past
//! that point the counter reports `exceed` and the display gains a `+`.

use super::buffer::{MatchIndexBuffer, MatchRange};
use log::debug;
use std::fmt;

/// The "current / total" counter shown next to the search field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterState {
    /// 1-based index of the current match, 0 when none is determined
    pub current: usize,
    /// Matches found, at most the buffer capacity
    pub total: usize,
    /// Whether matches remained when counting stopped at capacity
    pub exceed: bool,
}

impl CounterState {
    /// The empty counter, `0 / 0`.
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Whether there is nothing counted.
    pub fn is_zeroed(&self) -> bool {
        self.total == 0
    }
}

impl fmt::Display for CounterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {}{}",
            self.current,
            self.total,
            if self.exceed { "+" } else { "" }
        )
    }
}

/// Repopulate `buffer` from `cursor` and return the new counter.
///
/// With an empty or invalid query the counter is zeroed and the buffer is
/// left untouched. Otherwise slots `[0, total)` are overwritten in
/// production order; slots at or past `total` keep whatever they held.
/// `current` is always 0 in the result; the caller relocates it.
pub fn rescan<I>(
    query_is_empty_or_invalid: bool,
    cursor: I,
    buffer: &mut MatchIndexBuffer,
) -> CounterState
where
    I: IntoIterator<Item = MatchRange>,
{
    let mut state = CounterState::zeroed();
    if query_is_empty_or_invalid {
        return state;
    }

    let capacity = buffer.capacity();
    for range in cursor {
        if state.total == capacity {
            state.exceed = true;
            break;
        }
        buffer.set(state.total, range);
        state.total += 1;
    }

    debug!(
        "Rescan counted {} match(es){}",
        state.total,
        if state.exceed { ", capacity reached" } else { "" }
    );
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(pairs: &[(usize, usize)]) -> Vec<MatchRange> {
        pairs.iter().map(|&(f, t)| MatchRange::new(f, t)).collect()
    }

    #[test]
    fn test_rescan_stops_at_capacity() {
        let mut buffer = MatchIndexBuffer::new(3);
        let produced = ranges(&[(0, 2), (5, 7), (9, 10), (12, 14)]);

        let state = rescan(false, produced.clone(), &mut buffer);

        assert_eq!(state.total, 3);
        assert!(state.exceed);
        assert_eq!(state.current, 0);
        for (i, range) in produced.iter().take(3).enumerate() {
            assert_eq!(buffer.get(i), Some(*range));
        }
    }

    #[test]
    fn test_rescan_exactly_capacity_is_not_exceed() {
        let mut buffer = MatchIndexBuffer::new(2);
        let state = rescan(false, ranges(&[(0, 1), (2, 3)]), &mut buffer);
        assert_eq!(state.total, 2);
        assert!(!state.exceed);
    }

    #[test]
    fn test_rescan_total_is_min_of_produced_and_capacity() {
        for capacity in 0..5 {
            for produced in 0..7 {
                let mut buffer = MatchIndexBuffer::new(capacity);
                let cursor = (0..produced).map(|i| MatchRange::new(i * 3, i * 3 + 1));
                let state = rescan(false, cursor, &mut buffer);
                assert_eq!(state.total, produced.min(capacity));
                assert_eq!(state.exceed, produced > capacity);
            }
        }
    }

    #[test]
    fn test_rescan_no_matches() {
        let mut buffer = MatchIndexBuffer::new(9999);
        let state = rescan(false, std::iter::empty(), &mut buffer);
        assert_eq!(state, CounterState::zeroed());
    }

    #[test]
    fn test_rescan_invalid_query_leaves_buffer_untouched() {
        let mut buffer = MatchIndexBuffer::new(2);
        buffer.set(0, MatchRange::new(4, 6));

        let state = rescan(true, ranges(&[(0, 1)]), &mut buffer);

        assert_eq!(state, CounterState::zeroed());
        assert_eq!(buffer.get(0), Some(MatchRange::new(4, 6)));
    }

    #[test]
    fn test_rescan_does_not_drain_infinite_cursor() {
        let mut buffer = MatchIndexBuffer::new(10);
        let cursor = (0..).map(|i| MatchRange::new(i, i + 1));
        let state = rescan(false, cursor, &mut buffer);
        assert_eq!(state.total, 10);
        assert!(state.exceed);
    }

    #[test]
    fn test_rescan_advances_cursor_at_most_capacity_plus_one() {
        let mut buffer = MatchIndexBuffer::new(4);
        let mut advanced = 0;
        let cursor = (0..100).map(|i| {
            advanced += 1;
            MatchRange::new(i, i + 1)
        });
        rescan(false, cursor, &mut buffer);
        assert_eq!(advanced, 5);
    }

    #[test]
    fn test_rescan_is_idempotent() {
        let produced = ranges(&[(1, 2), (4, 6), (8, 9)]);
        let mut buffer = MatchIndexBuffer::new(5);

        let first = rescan(false, produced.clone(), &mut buffer);
        let first_slots: Vec<_> = (0..first.total).map(|i| buffer.get(i)).collect();
        let second = rescan(false, produced, &mut buffer);
        let second_slots: Vec<_> = (0..second.total).map(|i| buffer.get(i)).collect();

        assert_eq!(first, second);
        assert_eq!(first_slots, second_slots);
    }

    #[test]
    fn test_counter_display() {
        let state = CounterState {
            current: 3,
            total: 9999,
            exceed: true,
        };
        assert_eq!(state.to_string(), "3 / 9999+");

        let state = CounterState {
            current: 1,
            total: 2,
            exceed: false,
        };
        assert_eq!(state.to_string(), "1 / 2");
        assert_eq!(CounterState::zeroed().to_string(), "0 / 0");
    }
}
