//! # pubcal-dl
//!
//! Publication-calendar driven download manager for statistical series.
//!
//! A statistics office publishes a yearly calendar announcing when each
//! statistic will be released. This crate scrapes that calendar once,
//! stores it as a snapshot, and then decides per configured series whether a
//! newer release has become available than what is already held on disk —
//! fetching it when so.
//!
//! ## Design Philosophy
//!
//! - **Pure decision core** - matching, availability, and freshness are
//!   plain functions over in-memory data, trivially testable
//! - **Nothing is fatal per series** - one broken series never stops the rest
//! - **Idempotent runs** - re-running never re-downloads what is on disk
//! - **Library-first** - no CLI or UI, purely a Rust crate for embedding
//!
//! ## Quick Start
//!
//! ```no_run
//! use pubcal_dl::{CalendarFetcher, Config, FreshnessChecker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(std::path::Path::new("direct-links.yaml"))?;
//!     let today = chrono::Utc::now().date_naive();
//!
//!     // Refresh the yearly calendar snapshot (typically a separate, rare run).
//!     let fetcher = CalendarFetcher::new(config.calendar_url.clone())?;
//!     fetcher
//!         .fetch_and_store(chrono::Datelike::year(&today), &config.calendar_dir)
//!         .await?;
//!
//!     // Check every configured series and download stale ones.
//!     let checker = FreshnessChecker::new(config)?;
//!     for report in checker.run(today).await? {
//!         println!("{}: {}", report.series, report.outcome.label());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Selecting the newest available release among matches
pub mod availability;
/// Calendar snapshot persistence and queries
pub mod calendar;
/// Per-series evaluation and run orchestration
pub mod checker;
/// Configuration types
pub mod config;
/// The freshness decision
pub mod decider;
/// URL construction and artifact download
pub mod download;
/// Error types
pub mod error;
/// Calendar page fetching and table scraping
pub mod fetcher;
/// Series name matching against calendar records
pub mod matcher;
/// Period token and localized date parsing
pub mod period;
/// Local artifact version scanning
pub mod scanner;
/// Core types
pub mod types;

// Re-export commonly used types
pub use availability::{AvailableRelease, resolve_latest_available};
pub use calendar::{CalendarSnapshot, UpcomingPublication, find_upcoming, load_for_year};
pub use checker::{FreshnessChecker, SeriesReport, evaluate_series};
pub use config::{Config, SeriesConfig};
pub use decider::decide;
pub use download::{artifact_filename, build_url, download_if_missing};
pub use error::{Error, Result};
pub use fetcher::{CalendarFetcher, parse_calendar_tables};
pub use matcher::{CalendarMatch, find_all_matches, find_best_match};
pub use period::{Granularity, PeriodKey, parse_localized_date, parse_period_token};
pub use scanner::{LocalVersion, scan_latest};
pub use types::{CalendarRecord, Decision, SeriesOutcome, year_month};
