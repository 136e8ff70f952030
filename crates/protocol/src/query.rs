//! Wire types for the answering service.
//!
//! - Request: `POST <base>/api/v1/query` with `{ "query": "..." }`
//! - Response: `{ "data": [feature, ...], "action_triggered": "..." }`
//!
//! Feature elements are decoded one by one (see [`crate::decode_features`]);
//! only a malformed top-level body fails the whole response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::feature::{DecodedFeatures, DroppedFeature, GeoFeature, decode_features};

/// Path of the query endpoint, relative to the service base URL.
pub const QUERY_PATH: &str = "/api/v1/query";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Where the service says the answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Local database or cache.
    Local,
    /// Live secondary lookup (web scrape).
    LiveLookup,
}

impl SourceKind {
    pub fn from_action(action_triggered: &str) -> Self {
        if action_triggered.contains("scrape") {
            SourceKind::LiveLookup
        } else {
            SourceKind::Local
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Local => "Local Database",
            SourceKind::LiveLookup => "Live Web Search",
        }
    }
}

/// Top-level body shape. Elements stay as raw JSON until decoded individually.
#[derive(Debug, Deserialize)]
struct RawQueryResponse {
    data: Vec<Value>,
    action_triggered: String,
}

/// A decoded answer.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub features: Vec<GeoFeature>,
    pub dropped: Vec<DroppedFeature>,
    pub action_triggered: String,
}

impl QueryResponse {
    pub fn new(features: Vec<GeoFeature>, action_triggered: impl Into<String>) -> Self {
        Self {
            features,
            dropped: Vec::new(),
            action_triggered: action_triggered.into(),
        }
    }

    pub fn source(&self) -> SourceKind {
        SourceKind::from_action(&self.action_triggered)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseError {
    /// Body was not JSON, or lacked `data` / `action_triggered`.
    Malformed(String),
}

impl std::fmt::Display for ResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseError::Malformed(msg) => write!(f, "malformed query response: {msg}"),
        }
    }
}

impl std::error::Error for ResponseError {}

pub fn decode_response(payload: &str) -> Result<QueryResponse, ResponseError> {
    let raw: RawQueryResponse =
        serde_json::from_str(payload).map_err(|e| ResponseError::Malformed(e.to_string()))?;
    let DecodedFeatures { features, dropped } = decode_features(&raw.data);
    Ok(QueryResponse {
        features,
        dropped,
        action_triggered: raw.action_triggered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_serializes_as_query_object() {
        let body = serde_json::to_string(&QueryRequest::new("Most funded startups")).unwrap();
        assert_eq!(body, r#"{"query":"Most funded startups"}"#);
    }

    #[test]
    fn source_classification_uses_scrape_substring() {
        assert_eq!(SourceKind::from_action("db_lookup"), SourceKind::Local);
        assert_eq!(SourceKind::from_action("scrape"), SourceKind::LiveLookup);
        assert_eq!(
            SourceKind::from_action("live_scrape_fallback"),
            SourceKind::LiveLookup
        );
        assert_eq!(
            SourceKind::from_action("web_search_success(topic='x')"),
            SourceKind::Local
        );
    }

    #[test]
    fn decodes_response_and_counts_dropped() {
        let payload = r#"{
            "action_triggered": "scrape",
            "data": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [77.2, 28.6] },
                    "properties": { "place_name": "A", "city": "Delhi", "entity_type": "Startup" }
                },
                { "geometry": { "coordinates": [77.2] }, "properties": {} }
            ]
        }"#;
        let resp = decode_response(payload).unwrap();
        assert_eq!(resp.features.len(), 1);
        assert_eq!(resp.dropped.len(), 1);
        assert_eq!(resp.dropped[0].index, 1);
        assert_eq!(resp.source(), SourceKind::LiveLookup);
    }

    #[test]
    fn malformed_top_level_is_an_error() {
        assert!(decode_response("not json").is_err());
        assert!(decode_response(r#"{"data": []}"#).is_err());
        assert!(decode_response(r#"{"action_triggered": "x"}"#).is_err());
        assert!(decode_response(r#"{"data": {}, "action_triggered": "x"}"#).is_err());
    }

    #[test]
    fn empty_data_is_valid() {
        let resp = decode_response(r#"{"data": [], "action_triggered": "no_results_found"}"#)
            .unwrap();
        assert!(resp.features.is_empty());
        assert!(resp.dropped.is_empty());
        assert_eq!(resp.source(), SourceKind::Local);
    }
}
