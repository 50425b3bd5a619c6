//! Find session: one per open search panel
//!
//! The session owns the match buffer, the counter and the recount scheduler,
//! and keeps them in step with the host document and the (possibly shared)
//! query:
//!
//! - document or query change → buffer flushed, counter zeroed, rescan
//!   requested;
//! - `tick()` on the host's event loop → the rescan runs once the edits have
//!   quiesced;
//! - navigation → the current match is relocated from its previous position.

use super::buffer::{MatchIndexBuffer, MatchRange};
use super::counter::{self, CounterState};
use super::document::TextDocument;
use super::host::SearchHost;
use super::query::{CompiledQuery, QueryPatch, SearchQuery};
use super::scheduler::{Clock, RecomputeScheduler, SystemClock};
use super::shared::SharedQuery;
use super::tracker;
use crate::config::FindSettings;
use log::{debug, info};
use std::iter;

/// State of one find panel attached to one host editor.
pub struct SearchSession<H: SearchHost, C: Clock = SystemClock> {
    host: H,
    shared: SharedQuery,
    /// Local copy of the shared query as of `seen_revision`
    query: SearchQuery,
    seen_revision: u64,
    settings: FindSettings,
    buffer: MatchIndexBuffer,
    counter: CounterState,
    scheduler: RecomputeScheduler<C>,
}

impl<H: SearchHost, C: Clock> SearchSession<H, C> {
    /// Open a session and request the first count.
    pub fn new(host: H, shared: SharedQuery, settings: FindSettings, clock: C) -> Self {
        let query = shared.get();
        let seen_revision = shared.revision();
        let buffer = MatchIndexBuffer::new(settings.capacity);
        let scheduler = RecomputeScheduler::new(settings.debounce(), clock);

        debug!(
            "Opening find session (capacity {}, debounce {:?})",
            settings.capacity,
            settings.debounce()
        );

        let mut session = Self {
            host,
            shared,
            query,
            seen_revision,
            settings,
            buffer,
            counter: CounterState::zeroed(),
            scheduler,
        };
        session.invalidate();
        session
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn counter(&self) -> CounterState {
        self.counter
    }

    /// The counter as displayed, e.g. `3 / 9999+`.
    pub fn counter_text(&self) -> String {
        self.counter.to_string()
    }

    /// The counter is only shown while there is search text.
    pub fn counter_visible(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn settings(&self) -> &FindSettings {
        &self.settings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host; report edits with `document_changed`.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The buffered match at a 1-based counter position.
    pub fn match_at(&self, position: usize) -> Option<MatchRange> {
        if position == 0 || position > self.counter.total {
            return None;
        }
        self.buffer.get(position - 1)
    }

    /// Whether a recount is waiting for the edits to quiesce.
    pub fn is_rescan_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn scheduler(&self) -> &RecomputeScheduler<C> {
        &self.scheduler
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a query edit from this panel.
    ///
    /// Returns `false` if the patch leaves the query unchanged.
    pub fn commit(&mut self, patch: &QueryPatch) -> bool {
        // Patch the latest shared query, not a copy another session has since replaced
        let revision = self.shared.revision();
        if revision != self.seen_revision {
            self.query = self.shared.get();
            self.seen_revision = revision;
            self.invalidate();
        }

        let query = self.query.with(patch);
        if query == self.query {
            return false;
        }

        self.shared.set(query.clone());
        self.seen_revision = self.shared.revision();
        if self.settings.remember_last_query {
            self.settings.last_query = query.clone();
        }
        self.query = query;
        self.invalidate();
        true
    }

    /// The host document changed.
    pub fn document_changed(&mut self) {
        self.invalidate();
    }

    /// Advance the session on the host's event loop.
    ///
    /// Picks up query changes committed through the shared handle, then runs
    /// the pending rescan if its window has elapsed. Returns whether a
    /// rescan ran.
    pub fn tick(&mut self) -> bool {
        let revision = self.shared.revision();
        if revision != self.seen_revision {
            debug!("Shared query changed (revision {})", revision);
            self.query = self.shared.get();
            self.seen_revision = revision;
            self.invalidate();
        }

        if self.scheduler.poll() {
            self.rescan_now();
            true
        } else {
            false
        }
    }

    /// Recount immediately, then relocate against the host selection.
    pub fn rescan_now(&mut self) -> CounterState {
        self.counter = match self.query.compile() {
            Ok(compiled) => counter::rescan(false, self.host.matches(&compiled), &mut self.buffer),
            Err(err) => {
                debug!("Not counting: {}", err);
                counter::rescan(true, iter::empty(), &mut self.buffer)
            }
        };

        if self.counter.total > 0 {
            match self.host.selection() {
                Some(selection) => {
                    tracker::relocate(&self.buffer, &mut self.counter, selection);
                }
                None => self.counter.current = 1,
            }
        }
        self.counter
    }

    /// The host moved its selection by a navigation command.
    ///
    /// Returns the new 1-based current position.
    pub fn navigated(&mut self) -> usize {
        match self.host.selection() {
            Some(selection) => tracker::relocate(&self.buffer, &mut self.counter, selection),
            None => self.counter.current,
        }
    }

    /// Drop any pending recount; the panel is going away.
    pub fn close(&mut self) {
        self.scheduler.cancel();
        info!("Find session closed at {}", self.counter);
    }

    fn invalidate(&mut self) {
        self.buffer.flush();
        self.counter = CounterState::zeroed();
        self.scheduler.invalidate();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands against the in-memory document
// ─────────────────────────────────────────────────────────────────────────────

impl<C: Clock> SearchSession<TextDocument, C> {
    fn compiled(&self) -> Option<CompiledQuery> {
        self.query.compile().ok()
    }

    /// Select the next match and update the counter.
    pub fn find_next(&mut self) -> bool {
        let Some(query) = self.compiled() else {
            return false;
        };
        let moved = self.host.select_next(&query);
        self.navigated();
        moved
    }

    /// Select the previous match and update the counter.
    pub fn find_prev(&mut self) -> bool {
        let Some(query) = self.compiled() else {
            return false;
        };
        let moved = self.host.select_prev(&query);
        self.navigated();
        moved
    }

    /// Every match in the document, uncapped.
    pub fn find_all(&self) -> Vec<MatchRange> {
        self.compiled()
            .map(|query| self.host.all_matches(&query))
            .unwrap_or_default()
    }

    /// Replace the selected match and move to the next one.
    pub fn replace_next(&mut self) -> bool {
        let Some(query) = self.compiled() else {
            return false;
        };
        let replaced = self.host.replace_next(&query);
        if replaced {
            self.document_changed();
        } else {
            self.navigated();
        }
        replaced
    }

    /// Replace every match; returns the number replaced.
    pub fn replace_all(&mut self) -> usize {
        let Some(query) = self.compiled() else {
            return 0;
        };
        let count = self.host.replace_all(&query);
        if count > 0 {
            info!("Replaced {} match(es)", count);
            self.document_changed();
        }
        count
    }

    /// Replace the matches inside the selection.
    pub fn replace_in_selection(&mut self) -> bool {
        let Some(query) = self.compiled() else {
            return false;
        };
        let replaced = self.host.replace_in_selection(&query);
        if replaced {
            self.document_changed();
        }
        replaced
    }

    /// Replace the matches inside each of several ranges; returns the number
    /// replaced.
    pub fn replace_in_ranges(&mut self, ranges: &[MatchRange]) -> usize {
        let Some(query) = self.compiled() else {
            return 0;
        };
        let count = self.host.replace_in_ranges(&query, ranges);
        if count > 0 {
            self.document_changed();
        }
        count
    }

    /// Every occurrence of the selected text, independent of the query.
    pub fn find_selected(&self) -> Vec<MatchRange> {
        self.host.selection_matches()
    }
}
