//! Matching configured series names against calendar records
//!
//! The calendar publishes statistic names that do not always equal the names
//! a series is configured with, so matching is exact-first with a substring
//! fallback in both directions. Two lookup flavours exist with deliberately
//! different contracts:
//!
//! - [`find_all_matches`] keeps every match with a parseable publication date
//!   and sorts them newest-first. This feeds the availability resolver.
//! - [`find_best_match`] returns the first hit in record iteration order
//!   (exact hits scanned before substring hits). It is a simpler lookup used
//!   for one-off queries; its result depends on calendar load order, which is
//!   preserved behavior, not an oversight.

use crate::period::parse_localized_date;
use crate::types::CalendarRecord;
use chrono::NaiveDate;
use tracing::debug;

/// A calendar record that matched a series lookup name, with its parsed date
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarMatch<'a> {
    /// The matched calendar record
    pub record: &'a CalendarRecord,
    /// Publication date parsed from the record's date text
    pub date: NaiveDate,
}

/// Case-insensitive, trimmed name match: equality or substring either way
fn names_match(lookup: &str, record_name: &str) -> bool {
    let lookup = lookup.trim().to_lowercase();
    let name = record_name.trim().to_lowercase();
    name == lookup || name.contains(&lookup) || lookup.contains(&name)
}

/// Find all calendar records matching a lookup name, newest first
///
/// Records whose date text does not parse are excluded entirely, even when
/// the name matches: an entry that cannot be dated cannot participate in
/// availability decisions. The result is sorted by parsed date descending.
pub fn find_all_matches<'a>(
    lookup_name: &str,
    records: &'a [CalendarRecord],
) -> Vec<CalendarMatch<'a>> {
    let mut matches: Vec<CalendarMatch<'a>> = records
        .iter()
        .filter(|record| names_match(lookup_name, &record.name))
        .filter_map(|record| {
            match parse_localized_date(&record.date_text) {
                Some(date) => Some(CalendarMatch { record, date }),
                None => {
                    debug!(
                        name = %record.name,
                        date_text = %record.date_text,
                        "excluding matched record with unparseable date"
                    );
                    None
                }
            }
        })
        .collect();

    matches.sort_by(|a, b| b.date.cmp(&a.date));
    matches
}

/// Find a single calendar record for a lookup name, first-found
///
/// Scans all records for an exact (case-insensitive, trimmed) name equality
/// first; if none exists, scans again for the first substring hit in record
/// iteration order. Unlike [`find_all_matches`] this does not require the
/// record's date text to parse, and "first" means calendar load order.
pub fn find_best_match<'a>(
    lookup_name: &str,
    records: &'a [CalendarRecord],
) -> Option<&'a CalendarRecord> {
    let lookup = lookup_name.trim().to_lowercase();

    if let Some(record) = records
        .iter()
        .find(|record| record.name.trim().to_lowercase() == lookup)
    {
        return Some(record);
    }

    let fuzzy = records.iter().find(|record| {
        let name = record.name.trim().to_lowercase();
        name.contains(&lookup) || lookup.contains(&name)
    });

    if let Some(record) = fuzzy {
        debug!(lookup = %lookup_name, matched = %record.name, "fuzzy calendar match");
    }
    fuzzy
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn record(date_text: &str, name: &str, period: &str) -> CalendarRecord {
        CalendarRecord {
            date_text: date_text.to_string(),
            name: name.to_string(),
            period: period.to_string(),
        }
    }

    #[test]
    fn all_matches_are_sorted_newest_first() {
        let records = vec![
            record("1 september 2025", "Bouwvergunningen", "m-2025-07"),
            record("1 december 2025", "Bouwvergunningen", "m-2025-08"),
            record("1 oktober 2025", "Bouwvergunningen", "m-2025-06"),
        ];

        let matches = find_all_matches("Bouwvergunningen", &records);

        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].record.period, "m-2025-08");
        assert_eq!(matches[1].record.period, "m-2025-06");
        assert_eq!(matches[2].record.period, "m-2025-07");
    }

    #[test]
    fn unparseable_date_excludes_record_even_when_name_matches() {
        let records = vec![
            record("nader te bepalen", "Bouwvergunningen", "m-2025-09"),
            record("1 september 2025", "Bouwvergunningen", "m-2025-07"),
        ];

        let matches = find_all_matches("Bouwvergunningen", &records);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].record.period, "m-2025-07");
    }

    #[test]
    fn matching_is_case_insensitive_and_trimmed() {
        let records = vec![record("1 september 2025", "  Bouwvergunningen ", "m-2025-07")];
        let matches = find_all_matches("bouwvergunningen", &records);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn substring_matches_in_both_directions() {
        let records = vec![
            record("1 september 2025", "Bouwvergunningen per gemeente", "m-2025-07"),
            record("1 oktober 2025", "Vergunningen", "m-2025-08"),
        ];

        // Lookup is a substring of the record name.
        assert_eq!(find_all_matches("Bouwvergunningen", &records).len(), 1);
        // Record name is a substring of the lookup.
        assert_eq!(
            find_all_matches("Vergunningen en aanvragen", &records).len(),
            1
        );
    }

    #[test]
    fn unrelated_names_do_not_match() {
        let records = vec![record("1 september 2025", "Consumptieprijsindex", "m-2025-08")];
        assert!(find_all_matches("Bouwvergunningen", &records).is_empty());
    }

    #[test]
    fn best_match_prefers_exact_over_earlier_substring() {
        let records = vec![
            record("1 september 2025", "Bouwvergunningen per gemeente", "m-2025-07"),
            record("1 december 2025", "Bouwvergunningen", "m-2025-08"),
        ];

        let best = find_best_match("Bouwvergunningen", &records).unwrap();
        assert_eq!(best.name, "Bouwvergunningen");
    }

    #[test]
    fn best_match_falls_back_to_first_substring_in_iteration_order() {
        let records = vec![
            record("1 september 2025", "Bouwvergunningen per gemeente", "m-2025-07"),
            record("1 december 2025", "Bouwvergunningen per gewest", "m-2025-08"),
        ];

        // No exact hit; the first substring hit in load order wins, not the
        // newest-dated one.
        let best = find_best_match("Bouwvergunningen", &records).unwrap();
        assert_eq!(best.name, "Bouwvergunningen per gemeente");
    }

    #[test]
    fn best_match_does_not_require_parseable_date() {
        let records = vec![record("nader te bepalen", "Bouwvergunningen", "m-2025-09")];
        assert!(find_best_match("Bouwvergunningen", &records).is_some());
    }

    #[test]
    fn best_match_none_when_nothing_matches() {
        let records = vec![record("1 september 2025", "Consumptieprijsindex", "m-2025-08")];
        assert!(find_best_match("Bouwvergunningen", &records).is_none());
    }
}
