//! In-document find with a bounded "current / total" match counter
//!
//! This module provides the match-tracking core behind the find panel:
//! - A fixed-capacity buffer of match positions
//! - A bounded rescan that fills it and reports whether matches were cut off
//! - A debounced scheduler coalescing edit bursts into one rescan
//! - Incremental relocation of the current match after find next/previous
//!
//! The editor is consumed through [`SearchHost`]; [`TextDocument`] is an
//! in-memory implementation of it.

mod buffer;
mod counter;
mod document;
mod host;
mod query;
mod scheduler;
mod session;
mod shared;
mod tracker;

pub use buffer::{MatchIndexBuffer, MatchRange};
pub use counter::{rescan, CounterState};
pub use document::TextDocument;
pub use host::SearchHost;
pub use query::{ByteMatches, CompiledQuery, QueryPatch, SearchQuery};
pub use scheduler::{Clock, ManualClock, RecomputeScheduler, SystemClock};
pub use session::SearchSession;
pub use shared::SharedQuery;
pub use tracker::relocate;
