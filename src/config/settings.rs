//! User settings for the find panel
//!
//! This module defines the `FindSettings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::search::SearchQuery;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of matches buffered and counted before reporting "exceed".
pub const DEFAULT_CAPACITY: usize = 9999;

/// Default quiescence window before a rescan, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 50;

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Find panel settings and preferences.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindSettings {
    // ─────────────────────────────────────────────────────────────────────────
    // Counting
    // ─────────────────────────────────────────────────────────────────────────
    /// Maximum matches buffered and counted before the counter shows `+`
    pub capacity: usize,

    /// Quiet period after the last edit before matches are recounted
    pub debounce_ms: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // Query Behavior
    // ─────────────────────────────────────────────────────────────────────────
    /// Whether every open session follows the same query
    pub shared_query: bool,

    /// Whether the last committed query is restored on the next session
    pub remember_last_query: bool,

    /// The last committed query
    pub last_query: SearchQuery,
}

impl Default for FindSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            shared_query: false,
            remember_last_query: true,
            last_query: SearchQuery::default(),
        }
    }
}

impl FindSettings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum allowed capacity.
    pub const MIN_CAPACITY: usize = 1;
    /// Maximum allowed capacity.
    pub const MAX_CAPACITY: usize = 1_000_000;
    /// Maximum allowed debounce window in milliseconds.
    pub const MAX_DEBOUNCE_MS: u64 = 2000;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.capacity = self.capacity.clamp(Self::MIN_CAPACITY, Self::MAX_CAPACITY);
        self.debounce_ms = self.debounce_ms.min(Self::MAX_DEBOUNCE_MS);
    }

    /// Load settings and sanitize them to ensure validity.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// The debounce window as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = FindSettings::default();
        assert_eq!(settings.capacity, 9999);
        assert_eq!(settings.debounce_ms, 50);
        assert!(!settings.shared_query);
        assert!(settings.remember_last_query);
        assert!(settings.last_query.search.is_empty());
    }

    #[test]
    fn test_debounce_duration() {
        let settings = FindSettings {
            debounce_ms: 120,
            ..FindSettings::default()
        };
        assert_eq!(settings.debounce(), Duration::from_millis(120));
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let json = r#"{"capacity": 500}"#;
        let settings: FindSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.capacity, 500);
        assert_eq!(settings.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert!(settings.remember_last_query);
    }

    #[test]
    fn test_settings_deserialize_empty_json() {
        let settings: FindSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, FindSettings::default());
    }

    #[test]
    fn test_last_query_deserialize_partial() {
        let json = r#"{"last_query": {"search": "foo", "regexp": true}}"#;
        let settings: FindSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.last_query.search, "foo");
        assert!(settings.last_query.regexp);
        assert!(!settings.last_query.case_sensitive);
    }

    #[test]
    fn test_sanitize_capacity() {
        let mut settings = FindSettings {
            capacity: 0,
            ..FindSettings::default()
        };
        settings.sanitize();
        assert_eq!(settings.capacity, FindSettings::MIN_CAPACITY);

        settings.capacity = 50_000_000;
        settings.sanitize();
        assert_eq!(settings.capacity, FindSettings::MAX_CAPACITY);
    }

    #[test]
    fn test_sanitize_debounce() {
        let mut settings = FindSettings {
            debounce_ms: 60_000,
            ..FindSettings::default()
        };
        settings.sanitize();
        assert_eq!(settings.debounce_ms, FindSettings::MAX_DEBOUNCE_MS);
    }

    #[test]
    fn test_from_json_sanitized() {
        let json = r#"{"capacity": 0, "debounce_ms": 10}"#;
        let settings = FindSettings::from_json_sanitized(json).unwrap();
        assert_eq!(settings.capacity, 1);
        assert_eq!(settings.debounce_ms, 10);
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let settings = FindSettings {
            capacity: 42,
            shared_query: true,
            ..FindSettings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: FindSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, loaded);
    }
}
