//! Search query model
//!
//! A `SearchQuery` is the user-facing description of what to find: the search
//! and replace text plus the case, whole-word, regexp and literal toggles.
//! Compiling it yields a `CompiledQuery`, which produces byte ranges lazily
//! over a text and expands replacements.

use crate::error::{Error, Result};
use crate::string_utils::char_len_at;
use log::debug;
use regex::{Captures, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Search Query
// ─────────────────────────────────────────────────────────────────────────────

/// Search options and text, as edited in the find panel.
///
/// Equality compares every field, `literal` included, so toggling literal
/// mode alone is a query change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    /// Text to search for
    pub search: String,
    /// Replacement text
    pub replace: String,
    /// Whether matching is case-sensitive
    pub case_sensitive: bool,
    /// Whether matches must be bounded by non-word characters
    pub whole_word: bool,
    /// Whether `search` is a regular expression
    pub regexp: bool,
    /// Whether `\n`, `\r`, `\t` and `\\` are taken verbatim instead of unescaped
    pub literal: bool,
}

/// A partial update to a `SearchQuery`; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPatch {
    pub search: Option<String>,
    pub replace: Option<String>,
    pub case_sensitive: Option<bool>,
    pub whole_word: Option<bool>,
    pub regexp: Option<bool>,
    pub literal: Option<bool>,
}

impl QueryPatch {
    /// Patch that only changes the search text.
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Self::default()
        }
    }

    /// Patch that only changes the replacement text.
    pub fn replace(text: impl Into<String>) -> Self {
        Self {
            replace: Some(text.into()),
            ..Self::default()
        }
    }
}

impl SearchQuery {
    /// Create a plain, case-insensitive query for `search`.
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..Self::default()
        }
    }

    /// Whether the search text is empty.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
    }

    /// Whether the query is non-empty and compiles.
    pub fn is_valid(&self) -> bool {
        self.compile().is_ok()
    }

    /// Return a copy with the patch applied.
    pub fn with(&self, patch: &QueryPatch) -> Self {
        Self {
            search: patch.search.clone().unwrap_or_else(|| self.search.clone()),
            replace: patch.replace.clone().unwrap_or_else(|| self.replace.clone()),
            case_sensitive: patch.case_sensitive.unwrap_or(self.case_sensitive),
            whole_word: patch.whole_word.unwrap_or(self.whole_word),
            regexp: patch.regexp.unwrap_or(self.regexp),
            literal: patch.literal.unwrap_or(self.literal),
        }
    }

    /// Compile into a matcher.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` when the search text is empty or,
    /// in regexp mode, is not a valid regular expression.
    pub fn compile(&self) -> Result<CompiledQuery> {
        if self.search.is_empty() {
            return Err(Error::InvalidPattern {
                pattern: String::new(),
                source: None,
            });
        }

        let pattern = if self.regexp {
            self.search.clone()
        } else {
            regex::escape(&self.unquote(&self.search))
        };

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!self.case_sensitive)
            .multi_line(self.regexp)
            .build()
            .map_err(|e| {
                debug!("Invalid search pattern '{}': {}", self.search, e);
                Error::invalid_pattern(self.search.clone(), e)
            })?;

        Ok(CompiledQuery {
            regex,
            whole_word: self.whole_word,
            regexp: self.regexp,
            replace: self.unquote(&self.replace),
        })
    }

    fn unquote(&self, text: &str) -> String {
        if self.literal {
            text.to_string()
        } else {
            unescape(text)
        }
    }
}

/// Interpret `\n`, `\r`, `\t` and `\\`; any other backslash is kept as is.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            _ => {
                out.push('\\');
                continue;
            }
        }
        chars.next();
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Compiled Query
// ─────────────────────────────────────────────────────────────────────────────

/// A compiled, ready-to-run query.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    regex: Regex,
    whole_word: bool,
    regexp: bool,
    replace: String,
}

impl CompiledQuery {
    /// Lazily iterate `(start, end)` byte ranges of matches in `text`.
    ///
    /// Ranges are ascending and non-overlapping; zero-width matches are skipped.
    pub fn find_iter<'q, 't>(&'q self, text: &'t str) -> ByteMatches<'q, 't> {
        ByteMatches {
            query: self,
            text,
            pos: 0,
        }
    }

    /// Whether `start..end` of `text` is exactly one match of this query.
    pub fn is_match_at(&self, text: &str, start: usize, end: usize) -> bool {
        let mut iter = ByteMatches {
            query: self,
            text,
            pos: start,
        };
        iter.next() == Some((start, end))
    }

    /// Replacement text for the match at `start..end`.
    ///
    /// In regexp mode `$$`, `$&` and single-digit `$1`..`$9` references are
    /// expanded; see [`expand_replacement`].
    pub fn replacement_for(&self, text: &str, start: usize, end: usize) -> String {
        if !self.regexp {
            return self.replace.clone();
        }
        match self.regex.captures_at(text, start) {
            Some(caps) if caps.get(0).map(|m| (m.start(), m.end())) == Some((start, end)) => {
                expand_replacement(&self.replace, &caps)
            }
            _ => self.replace.clone(),
        }
    }

    /// The unescaped replacement text.
    pub fn replace_text(&self) -> &str {
        &self.replace
    }
}

/// Iterator over match byte ranges; see [`CompiledQuery::find_iter`].
pub struct ByteMatches<'q, 't> {
    query: &'q CompiledQuery,
    text: &'t str,
    pos: usize,
}

impl Iterator for ByteMatches<'_, '_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos <= self.text.len() {
            let found = self.query.regex.find_at(self.text, self.pos)?;
            let (start, end) = (found.start(), found.end());

            if start == end {
                self.pos = end + char_len_at(self.text, end).max(1);
                continue;
            }
            if self.query.whole_word && !is_word_bounded(self.text, start, end) {
                self.pos = start + char_len_at(self.text, start).max(1);
                continue;
            }

            self.pos = end;
            return Some((start, end));
        }
        None
    }
}

/// Expand a replacement template against one match.
///
/// `$$` is a dollar sign, `$&` the whole match and `$N` (one digit, 1-9)
/// capture group N. A digit always ends the reference, so `$1a` is group 1
/// followed by `a`. `$0`, groups past the last one and any other `$` are
/// kept as written; a group that did not participate expands to nothing.
fn expand_replacement(template: &str, caps: &Captures<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('$') => out.push('$'),
            Some('&') => out.push_str(caps.get(0).map_or("", |m| m.as_str())),
            Some(d @ '1'..='9') => {
                let group = d as usize - '0' as usize;
                if group < caps.len() {
                    out.push_str(caps.get(group).map_or("", |m| m.as_str()));
                } else {
                    out.push('$');
                    out.push(d);
                }
            }
            _ => {
                out.push('$');
                continue;
            }
        }
        chars.next();
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back().is_some_and(is_word_char);
    let after = text[end..].chars().next().is_some_and(is_word_char);
    !before && !after
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
