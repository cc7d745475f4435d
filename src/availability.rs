//! Selecting the newest release that has actually become available
//!
//! A calendar entry is "available" when its publication date is today or in
//! the past. Among the available matches for a series, the one with the
//! highest period key is the latest release. An entry whose period token does
//! not parse can never be "latest", regardless of how recent its date is, so
//! it is excluded from the selection pool.

use crate::matcher::CalendarMatch;
use crate::period::{PeriodKey, parse_period_token};
use crate::types::CalendarRecord;
use chrono::NaiveDate;
use tracing::debug;

/// The newest available release for a series
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AvailableRelease<'a> {
    /// The calendar record describing the release
    pub record: &'a CalendarRecord,
    /// Publication date parsed from the record's date text
    pub date: NaiveDate,
    /// Ordering key parsed from the record's period token
    pub period: PeriodKey,
}

/// Pick the newest matched release whose publication date is not in the future
///
/// Filters `matches` to entries dated `today` or earlier with a parseable
/// period token, then selects the maximum period key. Returns `None` when no
/// entry has both a valid date and a valid period. The returned date is
/// guaranteed to be `<= today`.
///
/// Period key ties are broken arbitrarily (last maximum encountered); the
/// calendar is not expected to publish two entries for the same series and
/// period.
pub fn resolve_latest_available<'a>(
    matches: &[CalendarMatch<'a>],
    today: NaiveDate,
) -> Option<AvailableRelease<'a>> {
    matches
        .iter()
        .filter(|m| m.date <= today)
        .filter_map(|m| match parse_period_token(&m.record.period) {
            Some(period) => Some(AvailableRelease {
                record: m.record,
                date: m.date,
                period,
            }),
            None => {
                debug!(
                    name = %m.record.name,
                    period = %m.record.period,
                    "excluding available record with unparseable period token"
                );
                None
            }
        })
        .max_by_key(|release| release.period)
}
