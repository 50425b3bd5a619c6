//! Query handle shared between find sessions
//!
//! When "shared query" is on, every open editor follows the same search. The
//! host keeps one active `SharedQuery` and [`SharedQuery::for_session`] hands
//! a clone of it to each new session; a commit in one session bumps the
//! revision and the others pick the new query up on their next tick. With the
//! option off, each session gets a private handle seeded from the remembered
//! query, and its commits reach no one else.

use super::query::SearchQuery;
use crate::config::FindSettings;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Reference-counted, single-threaded query cell with a change revision.
#[derive(Debug, Clone, Default)]
pub struct SharedQuery {
    query: Rc<RefCell<SearchQuery>>,
    revision: Rc<Cell<u64>>,
}

impl SharedQuery {
    pub fn new(query: SearchQuery) -> Self {
        Self {
            query: Rc::new(RefCell::new(query)),
            revision: Rc::new(Cell::new(0)),
        }
    }

    /// Seed from settings: the remembered query, or an empty one.
    pub fn from_settings(settings: &FindSettings) -> Self {
        if settings.remember_last_query {
            Self::new(settings.last_query.clone())
        } else {
            Self::default()
        }
    }

    /// The handle a newly opened session should use.
    ///
    /// With `shared_query` on this is `active` itself, so the session follows
    /// and broadcasts to every other session holding it. Otherwise it is a
    /// fresh handle, as from [`SharedQuery::from_settings`].
    pub fn for_session(settings: &FindSettings, active: &SharedQuery) -> Self {
        if settings.shared_query {
            active.clone()
        } else {
            Self::from_settings(settings)
        }
    }

    /// A snapshot of the current query.
    pub fn get(&self) -> SearchQuery {
        self.query.borrow().clone()
    }

    /// Replace the query; returns `false` and keeps the revision if unchanged.
    pub fn set(&self, query: SearchQuery) -> bool {
        if *self.query.borrow() == query {
            return false;
        }
        *self.query.borrow_mut() = query;
        self.revision.set(self.revision.get() + 1);
        true
    }

    /// Increases by one on every effective `set`.
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Whether both handles point at the same query.
    pub fn ptr_eq(&self, other: &SharedQuery) -> bool {
        Rc::ptr_eq(&self.query, &other.query)
    }
}
