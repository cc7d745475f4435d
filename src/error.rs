//! Error types for pubcal-dl
//!
//! A failure for one series must never abort evaluation of the remaining
//! series, so most conditions in the original taxonomy (unparseable dates or
//! period tokens, missing calendar files, missing download directories,
//! series without a calendar lookup name) are modelled as `Option`/outcome
//! values rather than errors. The variants here cover collaborator failures
//! that have no in-band representation: broken config files, network
//! failures, and I/O errors.

use thiserror::Error;

/// Result type alias for pubcal-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pubcal-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "kalender_naam")
        key: Option<String>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error (calendar fetch or artifact download)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Calendar snapshot (de)serialization error
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Series configuration (de)serialization error
    #[error("configuration parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The calendar page was fetched but yielded zero entries
    ///
    /// Usually means the page's HTML structure changed. Distinguished from a
    /// network failure so callers can keep a stale snapshot instead of
    /// overwriting it with an empty one.
    #[error("no calendar entries found at {0}")]
    EmptyCalendar(String),
}

impl Error {
    /// Create a configuration error for a specific key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}
