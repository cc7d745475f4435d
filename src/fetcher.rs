//! Fetching and scraping the publication calendar page
//!
//! The calendar is published as plain HTML tables with one release per row:
//! date text, statistic name, and optionally a period token. Extraction here
//! is deliberately flat and structure-blind: tag-position scanning with no
//! HTML parser, no attribute handling, no nesting awareness. Rows whose first
//! cell does not contain a date pattern are treated as header rows and
//! skipped. If the page structure changes in a way this cannot follow, the
//! fetch yields zero entries and an [`Error::EmptyCalendar`] instead of a
//! silently empty snapshot.

use crate::calendar::CalendarSnapshot;
use crate::error::{Error, Result};
use crate::period::contains_date_pattern;
use crate::types::CalendarRecord;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Fetches the publication calendar page and turns it into snapshots
pub struct CalendarFetcher {
    /// HTTP client for fetching the calendar page
    http: reqwest::Client,

    /// URL of the calendar page
    url: String,
}

impl CalendarFetcher {
    /// Create a fetcher for a calendar page URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("pubcal-dl calendar fetcher")
            .build()?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Fetch the calendar page and scrape it into a snapshot for `year`
    ///
    /// A page that scrapes to zero entries is an [`Error::EmptyCalendar`],
    /// so callers never overwrite a usable stored snapshot with an empty one.
    pub async fn fetch(&self, year: i32) -> Result<CalendarSnapshot> {
        info!(url = %self.url, "fetching publication calendar");

        let response = self.http.get(&self.url).send().await?.error_for_status()?;
        let html = response.text().await?;

        let entries = parse_calendar_tables(&html);
        if entries.is_empty() {
            return Err(Error::EmptyCalendar(self.url.clone()));
        }
        info!(count = entries.len(), "scraped calendar entries");

        Ok(CalendarSnapshot {
            source_url: self.url.clone(),
            fetched_at: Utc::now(),
            year,
            total_entries: entries.len(),
            entries,
        })
    }

    /// Fetch the calendar and store the snapshot as `calendar_<year>.json`
    pub async fn fetch_and_store(
        &self,
        year: i32,
        calendar_dir: &Path,
    ) -> Result<(CalendarSnapshot, PathBuf)> {
        let snapshot = self.fetch(year).await?;
        let path = crate::calendar::store(&snapshot, calendar_dir)?;
        info!(path = %path.display(), entries = snapshot.total_entries, "stored calendar snapshot");
        Ok((snapshot, path))
    }
}

/// Scrape all `<table>` rows on a page into calendar records
///
/// A row becomes a record when it has at least two cells and its first cell
/// contains a `<day> <word> <year>` pattern. The third cell, when present, is
/// the period token; otherwise the period is empty. Cell text is tag-stripped
/// and whitespace-normalized.
pub fn parse_calendar_tables(html: &str) -> Vec<CalendarRecord> {
    let lower = ascii_lowercase(html);
    let mut records = Vec::new();

    let mut table_from = 0;
    while let Some((table_start, table_end)) = tag_block(html, &lower, "table", table_from) {
        let table = &html[table_start..table_end];
        let table_lower = &lower[table_start..table_end];

        let mut row_from = 0;
        while let Some((row_start, row_end)) = tag_block(table, table_lower, "tr", row_from) {
            let row = &table[row_start..row_end];
            let row_lower = &table_lower[row_start..row_end];

            let cells = collect_cells(row, row_lower);
            if let Some(record) = row_to_record(&cells) {
                records.push(record);
            } else {
                debug!(cell_count = cells.len(), "skipping non-entry table row");
            }

            row_from = row_end;
        }

        table_from = table_end;
    }

    records
}

fn row_to_record(cells: &[String]) -> Option<CalendarRecord> {
    if cells.len() < 2 {
        return None;
    }
    let date_text = cells[0].trim();
    let name = cells[1].trim();
    if date_text.is_empty() || name.is_empty() || !contains_date_pattern(date_text) {
        return None;
    }

    Some(CalendarRecord {
        date_text: date_text.to_string(),
        name: name.to_string(),
        period: cells.get(2).map(|c| c.trim().to_string()).unwrap_or_default(),
    })
}

/// ASCII-only lowercase, preserving byte offsets for slicing
///
/// Unicode lowercasing can change byte lengths; the scanner relies on the
/// lowered string being index-aligned with the original.
fn ascii_lowercase(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Whether position `at` in `lower` opens the given tag (`<tag>` / `<tag …>`)
fn opens_tag(lower: &str, tag: &str, at: usize) -> bool {
    let name_end = at + 1 + tag.len();
    matches!(
        lower.as_bytes().get(name_end).copied(),
        Some(b'>' | b' ' | b'\t' | b'\n' | b'\r' | b'/')
    )
}

/// Find the next `<tag …> … </tag>` block, returning the content span
///
/// `original` and `lower` must be byte-aligned. Returns the half-open range
/// of the content between the opening tag's `>` and the closing tag.
fn tag_block(original: &str, lower: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let open_pat = format!("<{tag}");
    let close_pat = format!("</{tag}");

    let mut search = from;
    let start = loop {
        let hit = lower.get(search..)?.find(&open_pat)? + search;
        if opens_tag(lower, tag, hit) {
            break hit;
        }
        search = hit + open_pat.len();
    };

    let open_end = original.get(start..)?.find('>')? + start + 1;
    let close = lower.get(open_end..)?.find(&close_pat)? + open_end;
    Some((open_end, close))
}

/// Collect the tag-stripped text of each `<td>`/`<th>` cell in a row
fn collect_cells(row: &str, row_lower: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut pos = 0;

    loop {
        let td = tag_block(row, row_lower, "td", pos);
        let th = tag_block(row, row_lower, "th", pos);

        // Take whichever cell kind opens first.
        let (content_start, content_end) = match (td, th) {
            (Some(a), Some(b)) => {
                if a.0 <= b.0 {
                    a
                } else {
                    b
                }
            }
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => break,
        };

        cells.push(strip_tags(&row[content_start..content_end]));
        pos = content_end;
    }

    cells
}

/// Remove all tags and collapse whitespace runs into single spaces
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
