//! search_by_date_range tool implementation.

use chrono::NaiveDate;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use podsearch_core::Error;
use podsearch_core::feed::FeedCache;
use podsearch_core::search::{Envelope, QueryType};

use crate::tools::envelope_result;

/// Input parameters for search_by_date_range tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchByDateRangeParams {
    /// Start date in ISO format (YYYY-MM-DD).
    pub start_date: String,

    /// End date in ISO format (YYYY-MM-DD).
    pub end_date: String,
}

fn parse_iso_date(raw: &str) -> Result<NaiveDate, Envelope> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
        Envelope::failure(
            &Error::Validation(format!("Invalid date format: {e}")),
            "Provide dates in ISO 8601 format (YYYY-MM-DD). Example: 2024-01-15",
        )
    })
}

/// Implementation of the search_by_date_range tool.
pub async fn search_by_date_range_impl(
    feed: &FeedCache, params: SearchByDateRangeParams,
) -> Result<CallToolResult, McpError> {
    tracing::info!(start_date = %params.start_date, end_date = %params.end_date, "search_by_date_range tool invoked");

    let start = match parse_iso_date(&params.start_date) {
        Ok(date) => date,
        Err(envelope) => return Ok(envelope_result(&envelope)),
    };
    let end = match parse_iso_date(&params.end_date) {
        Ok(date) => date,
        Err(envelope) => return Ok(envelope_result(&envelope)),
    };

    if start > end {
        let envelope = Envelope::failure(
            &Error::Validation("Start date must be before or equal to end date".to_string()),
            "Swap the dates or provide a valid range",
        );
        return Ok(envelope_result(&envelope));
    }

    let envelope = match feed.find_by_date_range(start, end).await {
        Ok(episodes) => {
            let message =
                format!("Found {} episode(s) between {} and {}", episodes.len(), params.start_date, params.end_date);
            Envelope::episodes(episodes, QueryType::DateRange, Some(message))
        }
        Err(err) => Envelope::from(&err),
    };

    Ok(envelope_result(&envelope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{envelope_json, episode, feed_cache};

    fn params(start: &str, end: &str) -> SearchByDateRangeParams {
        SearchByDateRangeParams { start_date: start.to_string(), end_date: end.to_string() }
    }

    #[tokio::test]
    async fn test_range_match_newest_first() {
        let feed = feed_cache(vec![
            episode(1, "2024-01-05", vec![]),
            episode(2, "2024-06-10", vec![]),
            episode(3, "2024-06-20", vec![]),
        ]);

        let result = search_by_date_range_impl(&feed, params("2024-06-01", "2024-06-30")).await.unwrap();
        let json = envelope_json(&result);

        assert_eq!(json["status"], "success");
        assert_eq!(json["count"], 2);
        assert_eq!(json["results"][0]["episode_id"], 3);
        assert_eq!(json["results"][1]["episode_id"], 2);
        assert_eq!(json["message"], "Found 2 episode(s) between 2024-06-01 and 2024-06-30");
    }

    #[tokio::test]
    async fn test_boundary_dates_inclusive() {
        let feed = feed_cache(vec![episode(4, "2024-06-01", vec![]), episode(5, "2024-06-30", vec![])]);

        let result = search_by_date_range_impl(&feed, params("2024-06-01", "2024-06-30")).await.unwrap();
        let json = envelope_json(&result);
        assert_eq!(json["count"], 2);
    }

    #[tokio::test]
    async fn test_invalid_format_is_validation_error() {
        let feed = feed_cache(vec![]);

        let result = search_by_date_range_impl(&feed, params("June 1st 2024", "2024-06-30")).await.unwrap();
        let json = envelope_json(&result);

        assert_eq!(json["status"], "error");
        assert_eq!(json["error_type"], "ValidationError");
        assert!(json["suggested_action"].as_str().unwrap().contains("ISO 8601"));
    }

    #[tokio::test]
    async fn test_inverted_range_is_validation_error() {
        let feed = feed_cache(vec![episode(1, "2024-06-10", vec![])]);

        let result = search_by_date_range_impl(&feed, params("2024-07-01", "2024-06-01")).await.unwrap();
        let json = envelope_json(&result);

        assert_eq!(json["error_type"], "ValidationError");
        assert_eq!(json["message"], "Start date must be before or equal to end date");
    }

    #[tokio::test]
    async fn test_empty_range_is_success_with_zero_count() {
        let feed = feed_cache(vec![episode(1, "2023-01-01", vec![])]);

        let result = search_by_date_range_impl(&feed, params("2024-01-01", "2024-01-31")).await.unwrap();
        let json = envelope_json(&result);

        assert_eq!(json["status"], "success");
        assert_eq!(json["count"], 0);
    }
}
