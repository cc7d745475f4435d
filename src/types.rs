//! Core types shared across the crate

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the publication calendar
///
/// Produced by the calendar fetcher (or loaded from a stored snapshot) and
/// immutable once loaded. There is no uniqueness constraint on `name`: a
/// statistic that publishes monthly recurs once per period.
///
/// The serialized field names (`datum_text`, `naam`, `periode`) are the wire
/// format of existing `calendar_<year>.json` snapshot files and must not
/// change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRecord {
    /// Free-text publication date as scraped from the page, e.g. "1 december 2025"
    #[serde(rename = "datum_text")]
    pub date_text: String,

    /// Name of the statistic as published on the calendar page
    #[serde(rename = "naam")]
    pub name: String,

    /// Period token, e.g. "m-2025-08", "t-2025-03" or "y-2024" (may be empty)
    #[serde(rename = "periode")]
    pub period: String,
}

/// Freshness decision for a single series
///
/// Output of [`crate::decider::decide`]. `NeedsFetch` carries the calendar
/// record and its parsed publication date forward so the download collaborator
/// can substitute `{periode}` and `{datum}` into a URL pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision<'a> {
    /// The locally held version is at least as new as the latest available one
    UpToDate,

    /// A newer release is available and should be fetched
    NeedsFetch {
        /// The calendar record describing the release to fetch
        record: &'a CalendarRecord,
        /// Publication date parsed from the record's date text
        date: NaiveDate,
    },
}

/// Per-series result of one freshness evaluation
///
/// Exactly one of these is produced per configured series on every run. The
/// skip variants are informational: none of them aborts evaluation of the
/// remaining series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeriesOutcome {
    /// The series has no calendar lookup name configured (per-series config error)
    SkippedNoLookupName,

    /// No calendar entry matched the lookup name (exact or substring)
    NoCalendarMatch,

    /// All matching entries are future-dated or lack a valid period token
    NotYetAvailable,

    /// The newest available release is already held locally
    UpToDate,

    /// A newer release exists than what is held locally
    NeedsFetch {
        /// The calendar record describing the release to fetch
        record: CalendarRecord,
        /// Publication date parsed from the record's date text
        date: NaiveDate,
    },
}

impl SeriesOutcome {
    /// Short machine-readable label, used in logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            SeriesOutcome::SkippedNoLookupName => "skip-no-lookup-name",
            SeriesOutcome::NoCalendarMatch => "skip-no-calendar-match",
            SeriesOutcome::NotYetAvailable => "skip-not-yet-available",
            SeriesOutcome::UpToDate => "up-to-date",
            SeriesOutcome::NeedsFetch { .. } => "needs-fetch",
        }
    }
}

/// Year-month comparison value (YYYY*100 + MM) for a calendar date
///
/// This is the coarsest freshness unit recoverable from artifact filenames,
/// and deliberately also the granularity the decider compares at. Two
/// releases within the same calendar month map to the same value.
pub fn year_month(date: NaiveDate) -> u32 {
    use chrono::Datelike;
    date.year() as u32 * 100 + date.month()
}
