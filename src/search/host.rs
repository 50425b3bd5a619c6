//! The editor-facing capability a find session consumes.

use super::buffer::MatchRange;
use super::query::CompiledQuery;

/// What a find session needs from the editor it is attached to.
///
/// The host produces matches for a query and reports where the selection is.
/// Document edits are reported the other way, by calling
/// [`SearchSession::document_changed`](super::SearchSession::document_changed).
pub trait SearchHost {
    /// Lazily produce matches in ascending, non-overlapping order.
    ///
    /// The session pulls at most `capacity + 1` items, so the iterator may be
    /// arbitrarily long.
    fn matches<'a>(&'a self, query: &'a CompiledQuery)
        -> Box<dyn Iterator<Item = MatchRange> + 'a>;

    /// The active selection, used as the anchor when relocating the current
    /// match; with several selections, the last one.
    fn selection(&self) -> Option<MatchRange>;
}
