//! Current-match relocation after navigation
//!
//! Find next/previous moves the selection by about one match at a time, so
//! the previous current index is almost right. Relocation walks from it
//! instead of searching the whole buffer, costing O(drift) per call.

use super::buffer::{MatchIndexBuffer, MatchRange};
use super::counter::CounterState;

/// Move `counter.current` to the match the selection sits at or nearest after.
///
/// Walks forward past matches that end at or before `selection.from`. If that
/// makes no progress, walks backward over matches that start at or after
/// `selection.to`. Returns the new 1-based index, which is within
/// `1..=total` whenever `total > 0`.
pub fn relocate(
    buffer: &MatchIndexBuffer,
    counter: &mut CounterState,
    selection: MatchRange,
) -> usize {
    let total = counter.total;
    if total == 0 {
        counter.current = 0;
        return 0;
    }

    let start = counter.current.min(total);
    let mut position = start;

    // Position 0 has no slot, so it always advances
    while position < total && slot(buffer, position).map_or(true, |m| m.to <= selection.from) {
        position += 1;
    }

    if position == start {
        while position > 1 && slot(buffer, position).is_some_and(|m| m.from >= selection.to) {
            position -= 1;
        }
    }

    counter.current = position;
    position
}

/// The range behind a 1-based position.
fn slot(buffer: &MatchIndexBuffer, position: usize) -> Option<MatchRange> {
    position.checked_sub(1).and_then(|index| buffer.get(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::counter::rescan;

    /// Buffer holding matches at (0,2), (5,7), (10,12), (15,17), (20,22).
    fn populated() -> (MatchIndexBuffer, CounterState) {
        let mut buffer = MatchIndexBuffer::new(16);
        let cursor = (0..5).map(|i| MatchRange::new(i * 5, i * 5 + 2));
        let counter = rescan(false, cursor, &mut buffer);
        (buffer, counter)
    }

    #[test]
    fn test_relocate_zero_total_stays_zero() {
        let buffer = MatchIndexBuffer::new(4);
        let mut counter = CounterState::zeroed();
        assert_eq!(relocate(&buffer, &mut counter, MatchRange::new(3, 4)), 0);
        assert_eq!(counter.current, 0);
    }

    #[test]
    fn test_relocate_from_undetermined_selects_match_under_selection() {
        let (buffer, mut counter) = populated();
        assert_eq!(relocate(&buffer, &mut counter, MatchRange::new(10, 12)), 3);
    }

    #[test]
    fn test_relocate_forward_one_step() {
        let (buffer, mut counter) = populated();
        counter.current = 2;
        // Selection moved onto the third match, past the second one's end
        assert_eq!(relocate(&buffer, &mut counter, MatchRange::new(10, 12)), 3);
        assert_eq!(counter.current, 3);
    }

    #[test]
    fn test_relocate_forward_several_steps() {
        let (buffer, mut counter) = populated();
        counter.current = 1;
        assert_eq!(relocate(&buffer, &mut counter, MatchRange::new(20, 22)), 5);
    }

    #[test]
    fn test_relocate_forward_stops_at_total() {
        let (buffer, mut counter) = populated();
        counter.current = 4;
        assert_eq!(relocate(&buffer, &mut counter, MatchRange::caret(100)), 5);
    }

    #[test]
    fn test_relocate_backward() {
        let (buffer, mut counter) = populated();
        counter.current = 4;
        assert_eq!(relocate(&buffer, &mut counter, MatchRange::new(5, 7)), 2);
    }

    #[test]
    fn test_relocate_backward_stops_at_first() {
        let (buffer, mut counter) = populated();
        counter.current = 3;
        assert_eq!(relocate(&buffer, &mut counter, MatchRange::caret(0)), 1);
    }

    #[test]
    fn test_relocate_unchanged_when_on_current() {
        let (buffer, mut counter) = populated();
        counter.current = 3;
        assert_eq!(relocate(&buffer, &mut counter, MatchRange::new(10, 12)), 3);
    }

    #[test]
    fn test_relocate_caret_between_matches_picks_next() {
        let (buffer, mut counter) = populated();
        counter.current = 1;
        assert_eq!(relocate(&buffer, &mut counter, MatchRange::caret(8)), 3);
    }

    #[test]
    fn test_relocate_wraparound_to_first() {
        let (buffer, mut counter) = populated();
        counter.current = 5;
        assert_eq!(relocate(&buffer, &mut counter, MatchRange::new(0, 2)), 1);
    }

    #[test]
    fn test_relocate_stays_in_range_for_any_selection() {
        let (buffer, counter) = populated();
        for current in 0..=counter.total {
            for from in 0..25 {
                for to in from..25 {
                    let mut state = CounterState { current, ..counter };
                    let position = relocate(&buffer, &mut state, MatchRange::new(from, to));
                    assert!((1..=state.total).contains(&position));
                }
            }
        }
    }
}
