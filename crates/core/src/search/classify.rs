//! Query classification: raw text to exactly one search type.
//!
//! An ordered rule table is evaluated short-circuit; deterministic
//! interpretations (episode id, date range, guest name) win over semantic,
//! and the first matching rule decides. All matching is case-insensitive.

use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The search strategy a query resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    EpisodeId,
    DateRange,
    GuestName,
    Semantic,
}

impl QueryType {
    /// Wire name used in envelopes and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::EpisodeId => "episode_id",
            QueryType::DateRange => "date_range",
            QueryType::GuestName => "guest_name",
            QueryType::Semantic => "semantic",
        }
    }

    /// Map a caller-supplied hint to a type, bypassing classification.
    ///
    /// Unrecognized hints fall back to semantic search.
    pub fn from_hint(hint: &str) -> Self {
        match hint.to_lowercase().as_str() {
            "id" => QueryType::EpisodeId,
            "date" => QueryType::DateRange,
            "guest" => QueryType::GuestName,
            _ => QueryType::Semantic,
        }
    }
}

/// Ordered classification rules; the first match wins.
///
/// Episode id patterns come before date patterns so "episode 341 from 2024"
/// classifies as an id lookup despite containing a year.
static RULES: LazyLock<Vec<(Regex, QueryType)>> = LazyLock::new(|| {
    vec![
        // Episode id: "episode 341", "ep 341", "EP#341", "#341"
        (Regex::new(r"(?i)\bepisode\s*#?\s*\d+").unwrap(), QueryType::EpisodeId),
        (Regex::new(r"(?i)\bep\s*#?\s*\d+").unwrap(), QueryType::EpisodeId),
        (Regex::new(r"#\d+").unwrap(), QueryType::EpisodeId),
        // Date range: explicit range, month + year, "in 2024", bare date
        (
            Regex::new(r"\d{4}-\d{2}-\d{2}\s+to\s+\d{4}-\d{2}-\d{2}").unwrap(),
            QueryType::DateRange,
        ),
        (
            Regex::new(
                r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{4}",
            )
            .unwrap(),
            QueryType::DateRange,
        ),
        (Regex::new(r"(?i)\bin\s+\d{4}\b").unwrap(), QueryType::DateRange),
        (Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap(), QueryType::DateRange),
        // Guest indicators followed by at least one token
        (
            Regex::new(r"(?i)\b(with|featuring|guest|by)\s+\S+").unwrap(),
            QueryType::GuestName,
        ),
    ]
});

/// Classify free text into a search type. Defaults to semantic when no
/// deterministic pattern matches, including empty text.
pub fn classify(query: &str) -> QueryType {
    RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(query))
        .map(|(_, query_type)| *query_type)
        .unwrap_or(QueryType::Semantic)
}

static ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\bepisode\s*#?\s*(\d+)").unwrap(),
        Regex::new(r"(?i)\bep\s*#?\s*(\d+)").unwrap(),
        Regex::new(r"#(\d+)").unwrap(),
    ]
});

/// Extract the episode number from an id-classified query.
pub fn extract_episode_id(query: &str) -> Option<u32> {
    ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(query))
        .and_then(|caps| caps[1].parse().ok())
}

static EXPLICIT_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2})\s+to\s+(\d{4}-\d{2}-\d{2})").unwrap());

static MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{4})",
    )
    .unwrap()
});

static BARE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bin\s+(\d{4})\b").unwrap());

static SINGLE_DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap());

/// Extract an inclusive date range from a date-classified query.
///
/// Recognized forms, in order: explicit `YYYY-MM-DD to YYYY-MM-DD`, month
/// name + year (expanded to the whole calendar month), `in <year>`
/// (expanded to the whole calendar year), and a bare date (a one-day
/// range).
///
/// # Errors
///
/// Returns `Error::Validation` when a matched token is not a real calendar
/// date or no date form is present at all.
pub fn extract_date_range(query: &str) -> Result<(NaiveDate, NaiveDate), Error> {
    if let Some(caps) = EXPLICIT_RANGE.captures(query) {
        let start = parse_iso_date(&caps[1])?;
        let end = parse_iso_date(&caps[2])?;
        return Ok((start, end));
    }

    if let Some(caps) = MONTH_YEAR.captures(query) {
        let month = month_number(&caps[1].to_lowercase());
        let year: i32 = caps[2]
            .parse()
            .map_err(|_| Error::Validation(format!("invalid year: {}", &caps[2])))?;
        return month_range(year, month);
    }

    if let Some(caps) = BARE_YEAR.captures(query) {
        let year: i32 = caps[1]
            .parse()
            .map_err(|_| Error::Validation(format!("invalid year: {}", &caps[1])))?;
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| Error::Validation(format!("year out of range: {year}")))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| Error::Validation(format!("year out of range: {year}")))?;
        return Ok((start, end));
    }

    if let Some(m) = SINGLE_DATE.find(query) {
        let date = parse_iso_date(m.as_str())?;
        return Ok((date, date));
    }

    Err(Error::Validation("could not extract a date range from the query".to_string()))
}

fn parse_iso_date(text: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| Error::Validation(format!("invalid date '{text}': {e}")))
}

fn month_number(name: &str) -> u32 {
    match name {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        // The regex only admits the twelve month names.
        _ => 12,
    }
}

/// First and last calendar day of the given month, leap years included.
fn month_range(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), Error> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::Validation(format!("invalid month: {year}-{month:02}")))?;

    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| Error::Validation(format!("invalid month: {year}-{month:02}")))?;

    let end = next_month
        .checked_sub_days(Days::new(1))
        .ok_or_else(|| Error::Validation(format!("invalid month: {year}-{month:02}")))?;

    Ok((start, end))
}

static GUEST_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:with|featuring|guest|by)\s+(.+?)(?:\s+on\b|\s+in\b|\s+about\b|\s*$)").unwrap()
});

/// Extract the guest name following an indicator word, stopping at a stop
/// word ("on", "in", "about") or end of text.
///
/// Returns `None` when no indicator is present; the router then uses the
/// entire query as the name if guest mode was forced via a hint.
pub fn extract_guest_name(query: &str) -> Option<String> {
    GUEST_NAME
        .captures(query)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_episode_id_variants() {
        for query in ["#341", "episode 341", "EP341", "episode #341", "ep #12"] {
            assert_eq!(classify(query), QueryType::EpisodeId, "query: {query}");
        }
    }

    #[test]
    fn test_classify_episode_id_beats_date() {
        // Contains a year, but the id pattern is higher priority.
        assert_eq!(classify("episode 341 from 2024"), QueryType::EpisodeId);
        assert_eq!(extract_episode_id("episode 341 from 2024"), Some(341));
    }

    #[test]
    fn test_classify_date_variants() {
        for query in [
            "2024-01-01 to 2024-12-31",
            "from 2024-01-01 to 2024-12-31",
            "January 2024",
            "episodes in 2024",
            "2024-06-15",
        ] {
            assert_eq!(classify(query), QueryType::DateRange, "query: {query}");
        }
    }

    #[test]
    fn test_classify_guest_variants() {
        for query in ["with Jane Doe", "featuring Marc", "guest Laura", "by Antoine"] {
            assert_eq!(classify(query), QueryType::GuestName, "query: {query}");
        }
    }

    #[test]
    fn test_classify_defaults_to_semantic() {
        assert_eq!(classify("serverless architectures"), QueryType::Semantic);
        assert_eq!(classify(""), QueryType::Semantic);
        assert_eq!(classify("   "), QueryType::Semantic);
    }

    #[test]
    fn test_from_hint() {
        assert_eq!(QueryType::from_hint("id"), QueryType::EpisodeId);
        assert_eq!(QueryType::from_hint("DATE"), QueryType::DateRange);
        assert_eq!(QueryType::from_hint("guest"), QueryType::GuestName);
        assert_eq!(QueryType::from_hint("semantic"), QueryType::Semantic);
        assert_eq!(QueryType::from_hint("unknown"), QueryType::Semantic);
    }

    #[test]
    fn test_extract_episode_id_variants() {
        assert_eq!(extract_episode_id("#341"), Some(341));
        assert_eq!(extract_episode_id("episode 341"), Some(341));
        assert_eq!(extract_episode_id("EP341"), Some(341));
        assert_eq!(extract_episode_id("tell me about kafka"), None);
    }

    #[test]
    fn test_extract_explicit_range() {
        let (start, end) = extract_date_range("from 2024-01-01 to 2024-12-31").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_extract_single_date_is_one_day_range() {
        let (start, end) = extract_date_range("2024-06-15").unwrap();
        assert_eq!(start, end);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    }

    #[test]
    fn test_extract_month_year_expands_whole_month() {
        let (start, end) = extract_date_range("April 2024").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());

        let (_, end) = extract_date_range("December 2023").unwrap();
        assert_eq!(end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_extract_february_leap_year() {
        let (_, end) = extract_date_range("February 2024").unwrap();
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (_, end) = extract_date_range("February 2023").unwrap();
        assert_eq!(end, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
    }

    #[test]
    fn test_extract_bare_year_expands_whole_year() {
        let (start, end) = extract_date_range("episodes in 2024").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_extract_malformed_date_is_validation_error() {
        let result = extract_date_range("2024-13-45");
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_extract_no_date_is_validation_error() {
        let result = extract_date_range("no dates here");
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_extract_guest_name_stops_at_stop_word() {
        assert_eq!(extract_guest_name("with Jane Doe"), Some("Jane Doe".to_string()));
        assert_eq!(extract_guest_name("episodes featuring Marc on serverless"), Some("Marc".to_string()));
        assert_eq!(extract_guest_name("by Antoine about containers"), Some("Antoine".to_string()));
    }

    #[test]
    fn test_extract_guest_name_without_indicator() {
        assert_eq!(extract_guest_name("Jane Doe"), None);
    }
}
