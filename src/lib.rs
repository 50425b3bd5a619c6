//! Extended Find
//!
//! In-document find/replace match tracking: a bounded "current / total"
//! counter kept in step with a changing document and query, with debounced
//! recounts and incremental current-match relocation.

pub mod config;
pub mod error;
pub mod search;
pub mod string_utils;

pub use config::FindSettings;
pub use error::{Error, Result};
pub use search::{
    CounterState, MatchRange, QueryPatch, SearchHost, SearchQuery, SearchSession, SharedQuery,
    TextDocument,
};
