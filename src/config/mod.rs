//! Configuration module for Extended Find
//!
//! This module handles the find panel's settings, including
//! serialization/deserialization to/from JSON and persistent storage
//! to platform-specific directories.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
