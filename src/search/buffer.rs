//! Fixed-capacity storage for match positions
//!
//! The buffer is sized once per session and never grows: a rescan that finds
//! more matches than fit simply stops, and out-of-range reads and writes
//! degrade to "no value" and no-ops instead of panicking.

/// A match location as document-absolute character offsets, `from <= to`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MatchRange {
    pub from: usize,
    pub to: usize,
}

impl MatchRange {
    /// Create a new range.
    pub fn new(from: usize, to: usize) -> Self {
        debug_assert!(from <= to, "match range must not be reversed");
        Self { from, to }
    }

    /// A zero-width range at `offset`, e.g. a caret.
    pub fn caret(offset: usize) -> Self {
        Self {
            from: offset,
            to: offset,
        }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    /// Whether the range is zero-width.
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

/// Flat store of `capacity` match ranges.
///
/// Slot `i` occupies `slots[2 * i]` (from) and `slots[2 * i + 1]` (to). Only
/// slots below the last rescan's total are meaningful; the rest hold zeroes
/// or data from an earlier rescan.
#[derive(Debug, Clone)]
pub struct MatchIndexBuffer {
    slots: Box<[usize]>,
    capacity: usize,
}

impl MatchIndexBuffer {
    /// Allocate a zeroed buffer for `capacity` ranges.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![0; capacity * 2].into_boxed_slice(),
            capacity,
        }
    }

    /// Maximum number of ranges the buffer holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The range at `index`, or `None` outside `[0, capacity)`.
    pub fn get(&self, index: usize) -> Option<MatchRange> {
        if index >= self.capacity {
            return None;
        }
        let offset = index * 2;
        Some(MatchRange {
            from: self.slots[offset],
            to: self.slots[offset + 1],
        })
    }

    /// Store `range` at `index`; ignored outside `[0, capacity)`.
    pub fn set(&mut self, index: usize, range: MatchRange) {
        if index >= self.capacity {
            return;
        }
        let offset = index * 2;
        self.slots[offset] = range.from;
        self.slots[offset + 1] = range.to;
    }

    /// Discard every stored range, keeping the capacity.
    pub fn flush(&mut self) {
        self.slots.fill(0);
    }
}
