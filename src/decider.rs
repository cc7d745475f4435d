//! The freshness decision: up-to-date or fetch
//!
//! Both sides of the comparison are reduced to a year-month value
//! (`YYYY * 100 + MM`). The available side could carry its full period key,
//! but the local side only has filename dates to go on, so the available
//! side is deliberately downgraded to the same coarse unit to keep the two
//! commensurable. Known limitation: two distinct releases published within
//! the same calendar month compare equal and the second one is never fetched.

use crate::availability::AvailableRelease;
use crate::scanner::LocalVersion;
use crate::types::{Decision, year_month};
use tracing::debug;

/// Decide whether the newest available release must be fetched
///
/// The available comparison value is the year-month of its publication date;
/// the downloaded comparison value is the scanner's year-month key, or 0 when
/// nothing is held locally. `downloaded >= available` means up-to-date. Pure:
/// identical inputs always yield the identical decision.
pub fn decide<'a>(
    available: &AvailableRelease<'a>,
    downloaded: Option<&LocalVersion>,
) -> Decision<'a> {
    let available_key = year_month(available.date);
    let downloaded_key = downloaded.map(|held| held.year_month).unwrap_or(0);

    debug!(
        available = available_key,
        downloaded = downloaded_key,
        period = %available.record.period,
        "comparing freshness keys"
    );

    if downloaded_key >= available_key {
        Decision::UpToDate
    } else {
        Decision::NeedsFetch {
            record: available.record,
            date: available.date,
        }
    }
}
