//! Centralized error handling for Extended Find
//!
//! The match-tracking core never fails: out-of-range buffer access, empty or
//! invalid queries and capacity overflow are all represented as data. This
//! error type covers the fallible edges around it: reading the input file,
//! settings I/O and pattern compilation.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// A specialized `Result` type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong outside the match-tracking core.
#[derive(Debug)]
pub enum Error {
    /// Reading an input file failed
    Io(io::Error),

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────
    /// The settings file exists but could not be read
    ConfigRead { path: PathBuf, source: io::Error },

    /// The settings file or its directory could not be written
    ConfigWrite { path: PathBuf, source: io::Error },

    /// The settings are not valid JSON for `FindSettings`
    ConfigFormat {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },

    /// No platform config directory could be determined
    ConfigDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────
    /// The search text is empty or not a valid regular expression
    InvalidPattern {
        pattern: String,
        source: Option<regex::Error>,
    },
}

impl Error {
    /// Wrap a regex compilation failure for the given search text.
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Error::InvalidPattern {
            pattern: pattern.into(),
            source: Some(source),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigFormat {
            path: None,
            source: err,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::ConfigRead { path, source } => {
                write!(f, "Cannot read settings '{}': {}", path.display(), source)
            }
            Error::ConfigWrite { path, source } => {
                write!(f, "Cannot write settings '{}': {}", path.display(), source)
            }
            Error::ConfigFormat {
                path: Some(path),
                source,
            } => write!(f, "Malformed settings '{}': {}", path.display(), source),
            Error::ConfigFormat { path: None, source } => {
                write!(f, "Malformed settings: {}", source)
            }
            Error::ConfigDirNotFound => write!(f, "Configuration directory not found"),
            Error::InvalidPattern {
                pattern,
                source: Some(err),
            } => write!(f, "Invalid search pattern '{}': {}", pattern, err),
            Error::InvalidPattern {
                pattern,
                source: None,
            } => write!(f, "Invalid search pattern '{}'", pattern),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::ConfigRead { source, .. } | Error::ConfigWrite { source, .. } => Some(source),
            Error::ConfigFormat { source, .. } => Some(source),
            Error::InvalidPattern { source, .. } => {
                source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
            }
            Error::ConfigDirNotFound => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation
// ─────────────────────────────────────────────────────────────────────────────

/// Fall back to a default value instead of failing, leaving a warning behind.
pub trait ResultExt<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        self.unwrap_or_else(|err| {
            warn!("{}: {}. Using default.", context, err);
            default
        })
    }
}
