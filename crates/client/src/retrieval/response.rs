//! Retrieval API response types.

use serde::Deserialize;
use serde_json::{Map, Value};

use podsearch_core::search::RetrievedPassage;

/// Raw response from the retrieval API.
#[derive(Debug, Deserialize)]
pub struct RetrievalApiResponse {
    #[serde(default, alias = "retrievalResults")]
    pub results: Vec<RetrievalResult>,
}

/// One raw passage from the retrieval API.
#[derive(Debug, Deserialize)]
pub struct RetrievalResult {
    #[serde(default)]
    pub content: Option<PassageContent>,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct PassageContent {
    #[serde(default)]
    pub text: String,
}

impl From<RetrievalResult> for RetrievedPassage {
    fn from(raw: RetrievalResult) -> Self {
        RetrievedPassage {
            text: raw.content.map(|c| c.text).unwrap_or_default(),
            score: raw.score,
            metadata: raw.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_JSON: &str = r#"{
        "retrievalResults": [
            {
                "content": { "text": "In this episode we cover container networking." },
                "score": 0.91,
                "metadata": { "episode_id": 204, "title": "Container Networking" }
            },
            {
                "content": { "text": "A passage with no metadata." },
                "score": 0.42
            }
        ]
    }"#;

    #[test]
    fn test_deserialize_response() {
        let response: RetrievalApiResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].score, 0.91);
        assert!(response.results[1].metadata.is_empty());
    }

    #[test]
    fn test_convert_to_passage() {
        let response: RetrievalApiResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        let passages: Vec<RetrievedPassage> = response.results.into_iter().map(Into::into).collect();

        assert_eq!(passages[0].text, "In this episode we cover container networking.");
        assert_eq!(passages[0].metadata["episode_id"], 204);
        assert_eq!(passages[1].text, "A passage with no metadata.");
    }

    #[test]
    fn test_results_alias() {
        let json = r#"{"results": [{"content": {"text": "x"}, "score": 0.5}]}"#;
        let response: RetrievalApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);
    }

    #[test]
    fn test_empty_response() {
        let response: RetrievalApiResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results.is_empty());
    }
}
