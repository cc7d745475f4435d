//! URL construction and idempotent artifact download
//!
//! Once the decider asks for a fetch, the URL is either configured statically
//! or built from a pattern by substituting `{periode}` (the calendar entry's
//! period token) and `{datum}` (the publication date as YYYYMMDD). The target
//! filename embeds the same date token the scanner later reads back, and a
//! download is skipped outright when the target file already exists.

use crate::error::Result;
use crate::scanner::sanitize_series_name;
use crate::types::CalendarRecord;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Build a download URL from a pattern and a calendar entry
///
/// Replaces every `{periode}` with the entry's period token and every
/// `{datum}` with the publication date formatted `YYYYMMDD`. Placeholders
/// the pattern does not contain are simply not substituted; a pattern with
/// no placeholders passes through unchanged.
pub fn build_url(pattern: &str, record: &CalendarRecord, date: NaiveDate) -> String {
    pattern
        .replace("{periode}", &record.period)
        .replace("{datum}", &date.format("%Y%m%d").to_string())
}

/// File extension for an artifact, taken from the URL path
///
/// Falls back to `.zip` when the URL has no path extension or does not parse.
pub fn extension_from_url(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            Path::new(parsed.path())
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{e}"))
        })
        .unwrap_or_else(|| ".zip".to_string())
}

/// Target filename for a downloaded artifact
///
/// `<series name sanitized>_<YYYYMMDD><ext>`, where the extension comes from
/// the URL. This is the exact format [`crate::scanner::scan_latest`] reads
/// freshness back out of.
pub fn artifact_filename(series_name: &str, date: NaiveDate, url: &str) -> String {
    format!(
        "{}_{}{}",
        sanitize_series_name(series_name),
        date.format("%Y%m%d"),
        extension_from_url(url)
    )
}

/// Download a URL to a file, skipping when the target already exists
///
/// Returns `Ok(None)` when the file was already present (idempotent re-run),
/// `Ok(Some(path))` after a successful transfer. Parent directories are
/// created as needed. HTTP error statuses are errors.
pub async fn download_if_missing(
    client: &reqwest::Client,
    url: &str,
    target: &Path,
) -> Result<Option<PathBuf>> {
    if target.exists() {
        debug!(path = %target.display(), "target file already exists, skipping download");
        return Ok(None);
    }

    info!(url = %url, path = %target.display(), "downloading artifact");
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.bytes().await?;

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(target, &body).await?;

    info!(path = %target.display(), bytes = body.len(), "download complete");
    Ok(Some(target.to_path_buf()))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(period: &str) -> CalendarRecord {
        CalendarRecord {
            date_text: "1 september 2025".to_string(),
            name: "Bouwvergunningen".to_string(),
            period: period.to_string(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn build_url_substitutes_both_placeholders() {
        let url = build_url(
            "https://example.com/bouw/{periode}/export?d={datum}",
            &record("m-2025-07"),
            day(2025, 9, 1),
        );
        assert_eq!(url, "https://example.com/bouw/m-2025-07/export?d=20250901");
    }

    #[test]
    fn build_url_without_placeholders_passes_through() {
        let url = build_url(
            "https://example.com/static.zip",
            &record("m-2025-07"),
            day(2025, 9, 1),
        );
        assert_eq!(url, "https://example.com/static.zip");
    }

    #[test]
    fn extension_comes_from_url_path() {
        assert_eq!(extension_from_url("https://example.com/data/export.csv"), ".csv");
        assert_eq!(
            extension_from_url("https://example.com/data/export.xlsx?lang=nl"),
            ".xlsx"
        );
    }

    #[test]
    fn extension_defaults_to_zip() {
        assert_eq!(extension_from_url("https://example.com/download"), ".zip");
        assert_eq!(extension_from_url("not a url"), ".zip");
    }

    #[test]
    fn artifact_filename_matches_scanner_format() {
        let name = artifact_filename(
            "Bouwvergunningen",
            day(2025, 9, 1),
            "https://example.com/export.zip",
        );
        assert_eq!(name, "bouwvergunningen_20250901.zip");

        // Round trip: the scanner must recognize what the downloader writes.
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(&name), b"data").unwrap();
        let version = crate::scanner::scan_latest("Bouwvergunningen", dir.path()).unwrap();
        assert_eq!(version.year_month, 202509);
    }

    #[tokio::test]
    async fn download_writes_body_to_target() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/export.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"zipbytes".to_vec()))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("bouw").join("bouwvergunningen_20250901.zip");
        let client = reqwest::Client::new();

        let written = download_if_missing(&client, &format!("{}/export.zip", server.uri()), &target)
            .await
            .unwrap();

        assert_eq!(written, Some(target.clone()));
        assert_eq!(std::fs::read(&target).unwrap(), b"zipbytes");
    }

    #[tokio::test]
    async fn download_is_skipped_when_target_exists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/export.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
            .expect(0)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("bouwvergunningen_20250901.zip");
        std::fs::write(&target, b"old").unwrap();
        let client = reqwest::Client::new();

        let written = download_if_missing(&client, &format!("{}/export.zip", server.uri()), &target)
            .await
            .unwrap();

        assert_eq!(written, None);
        assert_eq!(std::fs::read(&target).unwrap(), b"old", "existing file untouched");
    }

    #[tokio::test]
    async fn http_error_status_is_an_error_and_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/export.zip"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("bouwvergunningen_20250901.zip");
        let client = reqwest::Client::new();

        let result = download_if_missing(&client, &format!("{}/export.zip", server.uri()), &target).await;

        assert!(result.is_err());
        assert!(!target.exists());
    }
}
