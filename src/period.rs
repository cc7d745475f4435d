//! Period token and localized publication date parsing
//!
//! The calendar page describes releases with two pieces of free text: a
//! period token such as `m-2025-08` or `y-2024`, and a Dutch-language
//! publication date such as `1 december 2025`. Both are parsed here into
//! totally ordered values so the rest of the crate can compare releases
//! without touching strings again. Parsing never fails hard: anything that
//! does not match the recognized shapes yields `None`.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Granularity of a period token, ordered by rank
///
/// The rank is the low component of a [`PeriodKey`] and acts as a tie-break:
/// for an equal year and sub-period number, a yearly entry sorts above a
/// trimester entry, which sorts above a quarterly entry, which sorts above a
/// monthly one. This is an explicit policy, not an accident of encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Granularity {
    /// No recognized granularity prefix (rank 0)
    Unknown,
    /// Monthly, prefix `m` (rank 1)
    Month,
    /// Quarterly, prefix `q` (rank 2)
    Quarter,
    /// Trimester, prefix `t` (rank 3)
    Trimester,
    /// Yearly, prefix `y` (rank 4)
    Year,
}

impl Granularity {
    /// Numeric rank used in the period key
    pub fn rank(self) -> u32 {
        match self {
            Granularity::Unknown => 0,
            Granularity::Month => 1,
            Granularity::Quarter => 2,
            Granularity::Trimester => 3,
            Granularity::Year => 4,
        }
    }

    fn from_prefix(prefix: &str) -> Self {
        match prefix {
            "y" => Granularity::Year,
            "t" => Granularity::Trimester,
            "q" => Granularity::Quarter,
            "m" => Granularity::Month,
            _ => Granularity::Unknown,
        }
    }
}

/// Integer ordering key for a period token
///
/// Encodes `year * 10000 + sub_period * 100 + granularity_rank`, comparable
/// via plain numeric ordering. Absence of a sub-period number contributes 0.
///
/// # Example
///
/// ```
/// use pubcal_dl::period::parse_period_token;
///
/// let august = parse_period_token("m-2025-08").unwrap();
/// assert_eq!(august.value(), 20250801);
///
/// let yearly = parse_period_token("y-2024").unwrap();
/// assert_eq!(yearly.value(), 20240004);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey(u32);

impl PeriodKey {
    fn new(year: u32, sub_period: u32, granularity: Granularity) -> Self {
        PeriodKey(year * 10_000 + sub_period * 100 + granularity.rank())
    }

    /// The raw numeric key value
    pub fn value(self) -> u32 {
        self.0
    }
}

// The regex patterns are compile-time constants; a failure to build them is a
// programming error, not a runtime condition.
#[allow(clippy::expect_used)]
fn period_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:([ytqm])-)?(\d{4})(?:-(\d{1,2}))?$").expect("valid period token pattern")
    })
}

#[allow(clippy::expect_used)]
fn date_text_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,2})\s+(\w+)\s+(\d{4})").expect("valid date text pattern"))
}

/// Dutch month names in calendar order
///
/// Resolution of an abbreviated month word is by prefix match in this order,
/// first match wins. The order therefore decides ambiguous abbreviations:
/// "ju" resolves to juni, never juli.
const MONTHS: [&str; 12] = [
    "januari",
    "februari",
    "maart",
    "april",
    "mei",
    "juni",
    "juli",
    "augustus",
    "september",
    "oktober",
    "november",
    "december",
];

/// Whether the text contains a `<day> <word> <year>` date pattern at all
///
/// Cheaper pre-filter than [`parse_localized_date`]: used by the calendar
/// scraper to drop header rows without resolving month names.
pub(crate) fn contains_date_pattern(text: &str) -> bool {
    date_text_re().is_match(text)
}

/// Parse a period token like `m-2025-08`, `t-2025-03` or `y-2024` into a key
///
/// Recognized shape: an optional single-letter granularity prefix in
/// `{y, t, q, m}`, a 4-digit year, and optionally a 1–2 digit sub-period
/// number (month or quarter index). Tokens without a prefix (e.g. `2025`)
/// get granularity rank 0. Anything else returns `None`.
pub fn parse_period_token(token: &str) -> Option<PeriodKey> {
    let token = token.trim().to_lowercase();
    let caps = period_token_re().captures(&token)?;

    let granularity = caps
        .get(1)
        .map(|m| Granularity::from_prefix(m.as_str()))
        .unwrap_or(Granularity::Unknown);
    let year: u32 = caps.get(2)?.as_str().parse().ok()?;
    let sub_period: u32 = match caps.get(3) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };

    Some(PeriodKey::new(year, sub_period, granularity))
}

/// Parse a Dutch free-text date like `1 december 2025` into a calendar date
///
/// Searches for the first `<1-2 digit day> <word> <4 digit year>` pattern in
/// the text, case-insensitively, and resolves the word to a month number by
/// prefix match against [`MONTHS`]. Returns `None` when no pattern is found,
/// the word is not a prefix of any month name, or the resulting day is not a
/// valid calendar date (e.g. `31 februari 2025`).
pub fn parse_localized_date(text: &str) -> Option<NaiveDate> {
    let text = text.to_lowercase();
    let caps = date_text_re().captures(&text)?;

    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month_word = caps.get(2)?.as_str();
    let year: i32 = caps.get(3)?.as_str().parse().ok()?;

    let month = MONTHS
        .iter()
        .position(|name| name.starts_with(month_word))
        .map(|idx| idx as u32 + 1)?;

    NaiveDate::from_ymd_opt(year, month, day)
}
