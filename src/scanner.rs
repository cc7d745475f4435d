//! Scanning a download directory for the newest locally held version
//!
//! Downloaded artifacts are named `<series>_<YYYYMMDD>.<ext>` with the series
//! name lower-cased and spaces replaced by underscores (see
//! [`crate::download::artifact_filename`]). The scanner recovers freshness
//! from those filenames alone. Only year and month survive the round trip:
//! the stored date token is the publication date, which is the finest
//! filename-recoverable unit that both sides of the freshness comparison can
//! agree on.

use chrono::{Datelike, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extensions recognized as downloaded artifacts
const ARTIFACT_EXTENSIONS: [&str; 6] = ["zip", "csv", "xlsx", "xls", "json", "txt"];

/// The newest locally held artifact for a series
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalVersion {
    /// Path to the artifact file
    pub path: PathBuf,
    /// Freshness key `YYYY * 100 + MM` extracted from the filename date token
    pub year_month: u32,
}

/// Normalize a series name to its filename prefix form
///
/// Lower-cased, spaces replaced by underscores. `"Bouwvergunningen per
/// gemeente"` becomes `"bouwvergunningen_per_gemeente"`.
pub fn sanitize_series_name(name: &str) -> String {
    name.replace(' ', "_").to_lowercase()
}

/// Extract the strict-YYYYMMDD date token trailing a candidate file stem
///
/// The token must be exactly the last 8 characters of the stem, all ASCII
/// digits, and form a valid calendar date. Invalid dates (e.g. 20251301) are
/// rejected, not clamped.
fn trailing_date_token(stem: &str) -> Option<NaiveDate> {
    if stem.len() < 8 || !stem.is_char_boundary(stem.len() - 8) {
        return None;
    }
    let token = &stem[stem.len() - 8..];
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = token[0..4].parse().ok()?;
    let month: u32 = token[4..6].parse().ok()?;
    let day: u32 = token[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Scan a directory for the newest held artifact of a series
///
/// Non-recursive. A file is a candidate when its (lower-cased) name starts
/// with the sanitized series name followed by an underscore, its extension is
/// in the recognized set, and its stem ends in a valid YYYYMMDD token. The
/// candidate with the maximum year-month key wins; ties are broken by
/// filesystem enumeration order. A missing directory or zero candidates is
/// `None`, not an error.
pub fn scan_latest(series_name: &str, directory: &Path) -> Option<LocalVersion> {
    let prefix = format!("{}_", sanitize_series_name(series_name));

    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(
                directory = %directory.display(),
                error = %e,
                "download directory not readable, treating as no local version"
            );
            return None;
        }
    };

    let mut newest: Option<LocalVersion> = None;
    for entry in entries.flatten() {
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !file_name.to_lowercase().starts_with(&prefix) {
            continue;
        }

        let has_known_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                ARTIFACT_EXTENSIONS.iter().any(|known| *known == ext)
            })
            .unwrap_or(false);
        if !has_known_extension {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(date) = trailing_date_token(stem) else {
            debug!(file = %file_name, "skipping artifact without a valid date token");
            continue;
        };

        let year_month = date.year() as u32 * 100 + date.month();
        if newest.as_ref().is_none_or(|held| year_month > held.year_month) {
            newest = Some(LocalVersion { path, year_month });
        }
    }

    newest
}
