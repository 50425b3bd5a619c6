//! In-memory text document host
//!
//! A string-backed [`SearchHost`] with a single selection. It implements the
//! editor-side commands (select next/previous match, replace next, replace
//! all, replace in selection) on top of [`CompiledQuery`], and is what the
//! command-line driver and the session tests run against.
//!
//! Offsets exchanged with the session are character offsets; the regex
//! engine works in bytes, so ranges are converted on the way out.

use super::buffer::MatchRange;
use super::host::SearchHost;
use super::query::{ByteMatches, CompiledQuery, SearchQuery};
use crate::string_utils::{byte_index_to_char_index, char_index_to_byte_index};
use std::cmp::Reverse;

/// A plain-text document with one selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDocument {
    text: String,
    selection: Option<MatchRange>,
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selection: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the whole text, clamping the selection into it.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        if let Some(selection) = self.selection {
            self.set_selection(selection);
        }
    }

    /// Set the selection, clamped to the document.
    pub fn set_selection(&mut self, range: MatchRange) {
        let len = self.len();
        let to = range.to.min(len);
        let from = range.from.min(to);
        self.selection = Some(MatchRange::new(from, to));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Select the first match starting at or after the selection end,
    /// wrapping to the first match in the document.
    ///
    /// Returns `false` when the document has no match.
    pub fn select_next(&mut self, query: &CompiledQuery) -> bool {
        let anchor = self.selection.map_or(0, |s| s.to);
        let target = self
            .matches(query)
            .find(|m| m.from >= anchor)
            .or_else(|| self.matches(query).next());
        self.select_target(target)
    }

    /// Select the last match ending at or before the selection start,
    /// wrapping to the last match in the document.
    pub fn select_prev(&mut self, query: &CompiledQuery) -> bool {
        let anchor = self.selection.map_or(0, |s| s.from);
        let mut before = None;
        let mut last = None;
        for m in self.matches(query) {
            if m.to <= anchor {
                before = Some(m);
            }
            last = Some(m);
        }
        self.select_target(before.or(last))
    }

    /// Every match in the document.
    pub fn all_matches(&self, query: &CompiledQuery) -> Vec<MatchRange> {
        self.matches(query).collect()
    }

    /// Every occurrence of the selected text, matched literally and with
    /// case, regardless of the active query. Empty without a non-empty
    /// selection.
    pub fn selection_matches(&self) -> Vec<MatchRange> {
        let Some(selection) = self.selection.filter(|s| !s.is_empty()) else {
            return Vec::new();
        };
        let (start, end) = self.byte_range(selection);
        let query = SearchQuery {
            search: self.text[start..end].to_string(),
            case_sensitive: true,
            literal: true,
            ..SearchQuery::default()
        };
        query
            .compile()
            .map(|compiled| self.all_matches(&compiled))
            .unwrap_or_default()
    }

    fn select_target(&mut self, target: Option<MatchRange>) -> bool {
        match target {
            Some(range) => {
                self.selection = Some(range);
                true
            }
            None => false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Replacement
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the selected match, if the selection is exactly one, then
    /// select the following match.
    ///
    /// Returns whether the text changed.
    pub fn replace_next(&mut self, query: &CompiledQuery) -> bool {
        let mut replaced = false;
        if let Some(selection) = self.selection.filter(|s| !s.is_empty()) {
            let (start, end) = self.byte_range(selection);
            if query.is_match_at(&self.text, start, end) {
                let replacement = query.replacement_for(&self.text, start, end);
                let inserted = replacement.chars().count();
                self.text.replace_range(start..end, &replacement);
                self.selection = Some(MatchRange::new(selection.from, selection.from + inserted));
                replaced = true;
            }
        }
        self.select_next(query);
        replaced
    }

    /// Replace every match; returns how many were replaced.
    pub fn replace_all(&mut self, query: &CompiledQuery) -> usize {
        let (text, count) = self.rebuild(query, 0, self.text.len());
        if count > 0 {
            self.set_text(text);
        }
        count
    }

    /// Replace the matches lying entirely inside the selection.
    ///
    /// The document has a single selection; hosts with several call
    /// [`TextDocument::replace_in_ranges`] with all of them.
    ///
    /// Returns `false` without touching the text when there is no selection,
    /// the replacement text is empty, or nothing inside the selection matches.
    pub fn replace_in_selection(&mut self, query: &CompiledQuery) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        if query.replace_text().is_empty() {
            return false;
        }

        let (start, end) = self.byte_range(selection);
        let (text, count) = self.rebuild(query, start, end);
        if count == 0 {
            return false;
        }

        let tail = self.text.len() - end;
        let new_end = byte_index_to_char_index(&text, text.len() - tail);
        self.text = text;
        self.selection = Some(MatchRange::new(selection.from, new_end));
        true
    }

    /// Replace the matches lying entirely inside any of `ranges`.
    ///
    /// Ranges are character offsets into the current text and must not
    /// overlap; they are applied back to front so earlier ones stay valid.
    /// The selection is left as is. Returns how many matches were replaced,
    /// 0 when the replacement text is empty.
    pub fn replace_in_ranges(&mut self, query: &CompiledQuery, ranges: &[MatchRange]) -> usize {
        if query.replace_text().is_empty() {
            return 0;
        }

        let mut ordered = ranges.to_vec();
        ordered.sort_by_key(|r| Reverse(r.from));

        let mut replaced = 0;
        for range in ordered {
            let (start, end) = self.byte_range(range);
            let (text, count) = self.rebuild(query, start, end);
            if count > 0 {
                self.text = text;
                replaced += count;
            }
        }
        if replaced > 0 {
            if let Some(selection) = self.selection {
                self.set_selection(selection);
            }
        }
        replaced
    }

    /// Copy of the text with matches inside `start..end` (bytes) replaced.
    fn rebuild(&self, query: &CompiledQuery, start: usize, end: usize) -> (String, usize) {
        let mut out = String::with_capacity(self.text.len());
        let mut last_end = 0;
        let mut count = 0;

        for (m_start, m_end) in query.find_iter(&self.text) {
            if m_start < start {
                continue;
            }
            if m_end > end {
                break;
            }
            out.push_str(&self.text[last_end..m_start]);
            out.push_str(&query.replacement_for(&self.text, m_start, m_end));
            last_end = m_end;
            count += 1;
        }

        out.push_str(&self.text[last_end..]);
        (out, count)
    }

    fn byte_range(&self, range: MatchRange) -> (usize, usize) {
        (
            char_index_to_byte_index(&self.text, range.from),
            char_index_to_byte_index(&self.text, range.to),
        )
    }
}

impl SearchHost for TextDocument {
    fn matches<'a>(
        &'a self,
        query: &'a CompiledQuery,
    ) -> Box<dyn Iterator<Item = MatchRange> + 'a> {
        Box::new(CharMatches {
            inner: query.find_iter(&self.text),
            text: &self.text,
            byte: 0,
            chars: 0,
        })
    }

    fn selection(&self) -> Option<MatchRange> {
        self.selection
    }
}

/// Converts byte ranges to character ranges while walking forward once.
struct CharMatches<'q, 't> {
    inner: ByteMatches<'q, 't>,
    text: &'t str,
    byte: usize,
    chars: usize,
}

impl Iterator for CharMatches<'_, '_> {
    type Item = MatchRange;

    fn next(&mut self) -> Option<MatchRange> {
        let (start, end) = self.inner.next()?;
        let from = self.chars + self.text[self.byte..start].chars().count();
        let to = from + self.text[start..end].chars().count();
        self.byte = end;
        self.chars = to;
        Some(MatchRange::new(from, to))
    }
}
