//! Domain entities for the podcast catalog.
//!
//! Episodes come from the syndication feed; semantic matches come from the
//! retrieval backend. Both serialize into the flat records returned by the
//! search tools.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A guest appearing on an episode.
///
/// The name is mandatory. Title and profile URL are genuinely optional and
/// are represented as `None` when the feed omits them, never as empty
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Guest {
    pub name: String,
    pub title: Option<String>,
    pub profile_url: Option<String>,
}

/// A related link attached to an episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Link {
    pub text: String,
    pub url: String,
}

/// A podcast episode with complete metadata.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Episode {
    /// Episode number, unique within one snapshot.
    #[serde(rename = "episode_id")]
    pub id: u32,
    pub title: String,
    pub description: String,
    pub publication_date: DateTime<Utc>,
    /// Duration as "HH:MM:SS" text, taken verbatim from the feed.
    pub duration: String,
    /// Primary media URL (enclosure href, or entry link as fallback).
    pub url: String,
    /// Media size in bytes, 0 when the feed does not report one.
    pub file_size: u64,
    pub guests: Vec<Guest>,
    pub links: Vec<Link>,
}

/// A single result from the semantic retrieval backend.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SemanticMatch {
    pub episode_id: u32,
    pub title: String,
    /// Relevant text snippet, truncated to the configured budget.
    pub excerpt: String,
    /// Relevance score in [0.0, 1.0].
    pub relevance_score: f64,
    /// Opaque backend metadata, passed through untouched.
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// An immutable, ordered view of the episode catalog captured at one point
/// in time.
///
/// Snapshots are replaced wholesale on refresh and never mutated in place;
/// readers holding an `Arc<Snapshot>` observe one consistent version for
/// the duration of their query.
#[derive(Debug, Clone)]
pub struct Snapshot {
    episodes: Vec<Episode>,
    captured_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(episodes: Vec<Episode>, captured_at: DateTime<Utc>) -> Self {
        Self { episodes, captured_at }
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Look up an episode by id.
    ///
    /// Absence is never an error: any id not present in the snapshot,
    /// including non-positive ids, yields `None`. Duplicate ids within one
    /// feed resolve to the first entry in document order.
    pub fn by_id(&self, id: i64) -> Option<&Episode> {
        self.episodes.iter().find(|ep| i64::from(ep.id) == id)
    }

    /// Episodes whose publication date (date portion) falls within
    /// `start..=end`, newest first.
    ///
    /// An inverted range (`start > end`) yields an empty list; range
    /// validation belongs to the caller.
    pub fn by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<Episode> {
        let mut matches: Vec<Episode> = self
            .episodes
            .iter()
            .filter(|ep| {
                let date = ep.publication_date.date_naive();
                start <= date && date <= end
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| b.publication_date.cmp(&a.publication_date));
        matches
    }

    /// Episodes featuring a guest whose name contains `partial`
    /// (case-insensitive), newest first.
    ///
    /// An episode appears at most once even when several of its guests
    /// match.
    pub fn by_guest(&self, partial: &str) -> Vec<Episode> {
        let needle = partial.to_lowercase();

        let mut matches: Vec<Episode> = self
            .episodes
            .iter()
            .filter(|ep| ep.guests.iter().any(|g| g.name.to_lowercase().contains(&needle)))
            .cloned()
            .collect();

        matches.sort_by(|a, b| b.publication_date.cmp(&a.publication_date));
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(id: u32, date: &str, guests: Vec<Guest>) -> Episode {
        Episode {
            id,
            title: format!("Episode {id}"),
            description: String::new(),
            publication_date: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
                .and_utc(),
            duration: "00:30:00".to_string(),
            url: format!("https://cdn.example.com/ep{id}.mp3"),
            file_size: 1_000,
            guests,
            links: vec![],
        }
    }

    fn guest(name: &str) -> Guest {
        Guest { name: name.to_string(), title: None, profile_url: None }
    }

    fn snapshot(episodes: Vec<Episode>) -> Snapshot {
        Snapshot::new(episodes, Utc::now())
    }

    #[test]
    fn test_by_id_found_and_missing() {
        let snap = snapshot(vec![episode(1, "2024-01-05", vec![]), episode(2, "2024-06-10", vec![])]);

        assert_eq!(snap.by_id(2).map(|e| e.id), Some(2));
        assert!(snap.by_id(99).is_none());
        assert!(snap.by_id(0).is_none());
        assert!(snap.by_id(-5).is_none());
    }

    #[test]
    fn test_by_id_duplicate_first_in_document_order_wins() {
        let mut first = episode(7, "2024-01-01", vec![]);
        first.title = "first".to_string();
        let mut second = episode(7, "2024-03-01", vec![]);
        second.title = "second".to_string();

        let snap = snapshot(vec![first, second]);
        assert_eq!(snap.by_id(7).map(|e| e.title.as_str()), Some("first"));
    }

    #[test]
    fn test_by_date_range_inclusive_and_sorted_descending() {
        let snap = snapshot(vec![
            episode(1, "2024-01-05", vec![]),
            episode(2, "2024-06-10", vec![]),
            episode(3, "2024-06-20", vec![]),
        ]);

        let results = snap.by_date_range(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        );

        let ids: Vec<u32> = results.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_by_date_range_boundary_days_included() {
        let snap = snapshot(vec![episode(1, "2024-06-01", vec![]), episode(2, "2024-06-30", vec![])]);

        let results = snap.by_date_range(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        );
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_by_date_range_inverted_is_empty() {
        let snap = snapshot(vec![episode(1, "2024-06-10", vec![])]);

        let results = snap.by_date_range(
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        assert!(results.is_empty());
    }

    #[test]
    fn test_by_guest_partial_case_insensitive() {
        let snap = snapshot(vec![episode(5, "2024-02-01", vec![guest("Jean-Pierre Dubois")])]);

        let results = snap.by_guest("pierre");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 5);
    }

    #[test]
    fn test_by_guest_deduplicates_multi_guest_episode() {
        let snap = snapshot(vec![episode(
            9,
            "2024-03-01",
            vec![guest("Anna Martin"), guest("Marta Martinez")],
        )]);

        let results = snap.by_guest("mart");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_by_guest_sorted_descending() {
        let snap = snapshot(vec![
            episode(1, "2024-01-01", vec![guest("Sam Lee")]),
            episode(2, "2024-05-01", vec![guest("Sam Chen")]),
        ]);

        let ids: Vec<u32> = snap.by_guest("sam").iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_episode_serializes_with_episode_id_field() {
        let ep = episode(341, "2024-04-01", vec![]);
        let json = serde_json::to_value(&ep).unwrap();
        assert_eq!(json["episode_id"], 341);
        assert!(json.get("id").is_none());
    }
}
