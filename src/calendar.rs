//! Calendar snapshot persistence and queries
//!
//! The publication calendar is fetched once per year and stored as
//! `calendar_<year>.json`. This module owns that snapshot format and the
//! simple queries over it that do not involve a series lookup. A missing
//! snapshot file is data absence, not an error: [`load_for_year`] returns
//! `Ok(None)` for it, and reserves `Err` for files that exist but cannot be
//! read or parsed. A snapshot with zero entries is a third, distinct state.

use crate::error::Result;
use crate::period::parse_localized_date;
use crate::types::CalendarRecord;
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// A stored snapshot of the publication calendar for one year
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalendarSnapshot {
    /// URL the calendar was fetched from
    pub source_url: String,

    /// When the snapshot was taken
    pub fetched_at: DateTime<Utc>,

    /// Calendar year the snapshot covers
    pub year: i32,

    /// The calendar entries, in page order
    pub entries: Vec<CalendarRecord>,

    /// Entry count at fetch time (kept for the wire format; equals `entries.len()`)
    pub total_entries: usize,
}

/// A calendar entry publishing within the upcoming window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpcomingPublication<'a> {
    /// The calendar record
    pub record: &'a CalendarRecord,
    /// Its parsed publication date
    pub date: NaiveDate,
}

/// Path of the snapshot file for a year inside a calendar directory
pub fn snapshot_path(calendar_dir: &Path, year: i32) -> PathBuf {
    calendar_dir.join(format!("calendar_{year}.json"))
}

/// Load the calendar snapshot for a year
///
/// `Ok(None)` when no snapshot file exists for that year; `Err` when the
/// file exists but cannot be read or parsed.
pub fn load_for_year(calendar_dir: &Path, year: i32) -> Result<Option<CalendarSnapshot>> {
    let path = snapshot_path(calendar_dir, year);
    if !path.exists() {
        warn!(path = %path.display(), year, "calendar snapshot not found");
        return Ok(None);
    }

    let text = std::fs::read_to_string(&path)?;
    let snapshot: CalendarSnapshot = serde_json::from_str(&text)?;
    Ok(Some(snapshot))
}

/// Store a calendar snapshot in a calendar directory
///
/// Creates the directory if needed and returns the written path.
pub fn store(snapshot: &CalendarSnapshot, calendar_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(calendar_dir)?;
    let path = snapshot_path(calendar_dir, snapshot.year);
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

/// List entries publishing within the next `days_ahead` days, soonest first
///
/// Entries without a parseable date are skipped. The window is inclusive on
/// both ends: `today <= date <= today + days_ahead`.
pub fn find_upcoming<'a>(
    records: &'a [CalendarRecord],
    today: NaiveDate,
    days_ahead: u64,
) -> Vec<UpcomingPublication<'a>> {
    let cutoff = today
        .checked_add_days(Days::new(days_ahead))
        .unwrap_or(NaiveDate::MAX);

    let mut upcoming: Vec<UpcomingPublication<'a>> = records
        .iter()
        .filter_map(|record| {
            let date = parse_localized_date(&record.date_text)?;
            (today <= date && date <= cutoff).then_some(UpcomingPublication { record, date })
        })
        .collect();

    upcoming.sort_by_key(|p| p.date);
    upcoming
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(date_text: &str, name: &str, period: &str) -> CalendarRecord {
        CalendarRecord {
            date_text: date_text.to_string(),
            name: name.to_string(),
            period: period.to_string(),
        }
    }

    fn snapshot(year: i32, entries: Vec<CalendarRecord>) -> CalendarSnapshot {
        CalendarSnapshot {
            source_url: "https://example.com/calendar".to_string(),
            fetched_at: Utc::now(),
            year,
            total_entries: entries.len(),
            entries,
        }
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let original = snapshot(
            2025,
            vec![record("1 september 2025", "Bouwvergunningen", "m-2025-07")],
        );

        let path = store(&original, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("calendar_2025.json"));

        let loaded = load_for_year(dir.path(), 2025).unwrap().unwrap();
        assert_eq!(loaded.year, 2025);
        assert_eq!(loaded.entries, original.entries);
        assert_eq!(loaded.total_entries, 1);
    }

    #[test]
    fn missing_snapshot_is_ok_none() {
        let dir = TempDir::new().unwrap();
        assert!(load_for_year(dir.path(), 2025).unwrap().is_none());
    }

    #[test]
    fn corrupt_snapshot_is_an_error_not_none() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("calendar_2025.json"), "{not json").unwrap();

        assert!(load_for_year(dir.path(), 2025).is_err());
    }

    #[test]
    fn empty_snapshot_loads_as_zero_entries() {
        // "No entries found" must stay distinguishable from "load failed".
        let dir = TempDir::new().unwrap();
        store(&snapshot(2025, vec![]), dir.path()).unwrap();

        let loaded = load_for_year(dir.path(), 2025).unwrap().unwrap();
        assert!(loaded.entries.is_empty());
    }

    #[test]
    fn upcoming_window_is_inclusive_and_sorted_ascending() {
        let records = vec![
            record("22 oktober 2025", "B", "m-2025-08"),
            record("15 oktober 2025", "A", "m-2025-08"),
            record("23 oktober 2025", "C", "m-2025-08"),
            record("14 oktober 2025", "D", "m-2025-07"),
        ];
        let today = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();

        let upcoming = find_upcoming(&records, today, 7);

        let names: Vec<&str> = upcoming.iter().map(|p| p.record.name.as_str()).collect();
        // D is in the past, C is beyond the 7-day window.
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn upcoming_skips_unparseable_dates() {
        let records = vec![record("nader te bepalen", "A", "")];
        let today = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();

        assert!(find_upcoming(&records, today, 7).is_empty());
    }
}
