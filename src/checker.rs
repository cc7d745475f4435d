//! Per-series freshness evaluation and run orchestration
//!
//! [`evaluate_series`] is the pure decision pipeline: match the lookup name
//! against the calendar, resolve the newest available release, scan the local
//! directory, decide. One invocation per series, no shared mutable state
//! between series, so a run is a plain sequential loop and every outcome is
//! independent of the others.
//!
//! [`FreshnessChecker`] wraps that loop with the collaborators: calendar
//! snapshot loading, URL construction, and the actual download. A failure for
//! one series is logged and reported, never propagated into the remaining
//! series.

use crate::availability::resolve_latest_available;
use crate::calendar::{find_upcoming, load_for_year};
use crate::config::{Config, SeriesConfig};
use crate::decider::decide;
use crate::download::{artifact_filename, build_url, download_if_missing};
use crate::error::Result;
use crate::matcher::find_all_matches;
use crate::scanner::scan_latest;
use crate::types::{CalendarRecord, Decision, SeriesOutcome};
use chrono::{Datelike, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Result of one run for one configured series
#[derive(Clone, Debug)]
pub struct SeriesReport {
    /// The series' configured name
    pub series: String,

    /// Freshness outcome of the evaluation
    pub outcome: SeriesOutcome,

    /// Path of a newly downloaded artifact, when the run fetched one
    ///
    /// `None` for every non-fetch outcome, and also when the fetch was
    /// skipped (target already on disk, no URL configured) or failed.
    pub downloaded: Option<PathBuf>,
}

/// Evaluate the freshness of one series against a calendar snapshot
///
/// Pure function of (calendar snapshot, local directory snapshot, today):
/// re-evaluated fresh on every invocation, no state carried between runs.
/// `download_dir` is the directory scanned for previously held artifacts.
pub fn evaluate_series(
    series: &SeriesConfig,
    records: &[CalendarRecord],
    download_dir: &Path,
    today: NaiveDate,
) -> SeriesOutcome {
    let Some(lookup) = series.calendar_lookup_name.as_deref() else {
        warn!(series = %series.name, "no calendar lookup name configured, skipping");
        return SeriesOutcome::SkippedNoLookupName;
    };

    let matches = find_all_matches(lookup, records);
    if matches.is_empty() {
        debug!(series = %series.name, lookup = %lookup, "no calendar entry matched");
        return SeriesOutcome::NoCalendarMatch;
    }

    let Some(available) = resolve_latest_available(&matches, today) else {
        info!(
            series = %series.name,
            lookup = %lookup,
            matches = matches.len(),
            "no matched release is available yet"
        );
        return SeriesOutcome::NotYetAvailable;
    };

    info!(
        series = %series.name,
        date = %available.date,
        period = %available.record.period,
        "latest available release resolved"
    );

    let held = scan_latest(&series.name, download_dir);
    match decide(&available, held.as_ref()) {
        Decision::UpToDate => SeriesOutcome::UpToDate,
        Decision::NeedsFetch { record, date } => SeriesOutcome::NeedsFetch {
            record: record.clone(),
            date,
        },
    }
}

/// Runs freshness checks for every configured series and fetches stale ones
pub struct FreshnessChecker {
    /// HTTP client for artifact downloads
    http: reqwest::Client,

    /// The loaded configuration
    config: Config,
}

impl FreshnessChecker {
    /// Create a checker from a loaded configuration
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .user_agent("pubcal-dl downloader")
            .build()?;

        Ok(Self { http, config })
    }

    /// The configuration this checker runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluate every configured series against the calendar for `today`'s year
    ///
    /// Loads the stored calendar snapshot (a missing snapshot degrades to an
    /// empty calendar: every series reports no match), evaluates each series
    /// independently, and downloads the target of every `NeedsFetch` outcome.
    /// Per-series download failures are logged and leave `downloaded` unset;
    /// they never abort the remaining series. Only run-level failures (an
    /// unreadable calendar snapshot) surface as `Err`.
    pub async fn run(&self, today: NaiveDate) -> Result<Vec<SeriesReport>> {
        let records = match load_for_year(&self.config.calendar_dir, today.year())? {
            Some(snapshot) => snapshot.entries,
            None => Vec::new(),
        };

        let upcoming = find_upcoming(&records, today, 7);
        info!(
            entries = records.len(),
            upcoming = upcoming.len(),
            "calendar loaded, starting series evaluation"
        );

        let mut reports = Vec::with_capacity(self.config.series.len());
        for series in &self.config.series {
            let download_dir = series.effective_download_dir(&self.config.download_base_dir);
            let outcome = evaluate_series(series, &records, &download_dir, today);
            info!(series = %series.name, outcome = outcome.label(), "series evaluated");

            let downloaded = match &outcome {
                SeriesOutcome::NeedsFetch { record, date } => {
                    self.fetch_release(series, record, *date, &download_dir).await
                }
                _ => None,
            };

            reports.push(SeriesReport {
                series: series.name.clone(),
                outcome,
                downloaded,
            });
        }

        Ok(reports)
    }

    /// Download one release for a series; failures are logged, not propagated
    async fn fetch_release(
        &self,
        series: &SeriesConfig,
        record: &CalendarRecord,
        date: NaiveDate,
        download_dir: &Path,
    ) -> Option<PathBuf> {
        let url = match (&series.url_pattern, &series.url) {
            (Some(pattern), _) => build_url(pattern, record, date),
            (None, Some(url)) => url.clone(),
            (None, None) => {
                warn!(series = %series.name, "needs fetch but no url or url_pattern configured");
                return None;
            }
        };

        let target = download_dir.join(artifact_filename(&series.name, date, &url));
        match download_if_missing(&self.http, &url, &target).await {
            Ok(Some(path)) => Some(path),
            Ok(None) => {
                info!(series = %series.name, path = %target.display(), "artifact already on disk");
                None
            }
            Err(e) => {
                error!(series = %series.name, url = %url, error = %e, "download failed");
                None
            }
        }
    }
}
