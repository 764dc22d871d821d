//! Core domain types shared by the client and the recommendation service.
//!
//! Everything here mirrors the JSON wire contract of the service:
//! - `Answer` / `AnswerValue` for serialized survey input
//! - `Cursor` for the opaque pagination token
//! - `RecommendationRequest` / `RecommendationResponse` for `POST /api/recommend`
//! - `Charity` for a single recommended organization

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed page size used for every recommendation request
pub const PAGE_SIZE: u32 = 3;

/// Default number of daily picks requested on page load
pub const DEFAULT_PICKS_LIMIT: u32 = 3;

// =============================================================================
// Answer Types
// =============================================================================

/// Value of a single answer.
///
/// Single-choice and free-text questions carry one string; the multi-select
/// question carries every selected value in form order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Multiple(Vec<String>),
}

impl AnswerValue {
    /// Borrow the value as a list of strings, whatever its shape
    pub fn as_list(&self) -> Vec<&str> {
        match self {
            AnswerValue::Single(value) => vec![value.as_str()],
            AnswerValue::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Single(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Single(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(values: Vec<String>) -> Self {
        AnswerValue::Multiple(values)
    }
}

/// One answered question.
///
/// Built fresh from form state on every submission and never mutated after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub value: AnswerValue,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        Self {
            question_id: question_id.into(),
            value: value.into(),
        }
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Opaque pagination token issued by the service.
///
/// The client never looks inside; it only stores the token and replays it
/// verbatim on the next page request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Cursor(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /api/recommend`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub answers: Vec<Answer>,
    /// `None` on a fresh submission, the previous page's cursor otherwise
    pub cursor: Option<Cursor>,
    pub limit: u32,
}

impl RecommendationRequest {
    /// First page for a new answer set
    pub fn first_page(answers: Vec<Answer>) -> Self {
        Self {
            answers,
            cursor: None,
            limit: PAGE_SIZE,
        }
    }

    /// Follow-up page for the same answer set
    pub fn next_page(answers: Vec<Answer>, cursor: Cursor) -> Self {
        Self {
            answers,
            cursor: Some(cursor),
            limit: PAGE_SIZE,
        }
    }
}

/// Why the service picked this page of results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explain {
    #[serde(default)]
    pub ntee: Option<String>,
    #[serde(default)]
    pub rationale: Vec<String>,
}

impl Explain {
    /// The service flags an expired cursor through the rationale text
    pub fn cursor_expired(&self) -> bool {
        self.rationale
            .iter()
            .any(|line| line.to_ascii_lowercase().contains("cursor expired"))
    }
}

/// Response of `POST /api/recommend`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    #[serde(default)]
    pub charities: Vec<Charity>,
    /// `None` means there are no further pages
    #[serde(default)]
    pub cursor: Option<Cursor>,
    #[serde(default)]
    pub explain: Explain,
}

/// Response of `GET /api/daily-picks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPicksResponse {
    #[serde(default)]
    pub charities: Vec<Charity>,
}

/// Response of `GET /api/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub ok: bool,
    pub version: String,
    pub env: String,
}

// =============================================================================
// Charity
// =============================================================================

/// Where an organization operates: one place or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    One(String),
    Many(Vec<String>),
}

impl Location {
    /// Non-empty place names in order
    pub fn places(&self) -> Vec<&str> {
        let places: Vec<&str> = match self {
            Location::One(place) => vec![place.as_str()],
            Location::Many(places) => places.iter().map(String::as_str).collect(),
        };
        places
            .into_iter()
            .map(str::trim)
            .filter(|place| !place.is_empty())
            .collect()
    }
}

/// A recommended organization, immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charity {
    pub name: String,
    #[serde(default)]
    pub ein: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ntee: Option<String>,
}

impl Charity {
    /// Bare charity with only a name, mostly useful in tests
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ein: None,
            summary: None,
            location: None,
            url: None,
            ntee: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request = RecommendationRequest::next_page(
            vec![
                Answer::new("q_issue_family", "health"),
                Answer::new("q_topics", vec!["a".to_string(), "b".to_string()]),
            ],
            Cursor::new("tok1"),
        );

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "answers": [
                    {"question_id": "q_issue_family", "value": "health"},
                    {"question_id": "q_topics", "value": ["a", "b"]}
                ],
                "cursor": "tok1",
                "limit": 3
            })
        );
    }

    #[test]
    fn test_first_page_sends_null_cursor() {
        let request = RecommendationRequest::first_page(vec![Answer::new("q_geography", "global")]);
        let value = serde_json::to_value(&request).unwrap();
        assert!(value["cursor"].is_null());
        assert_eq!(value["limit"], 3);
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let response: RecommendationResponse =
            serde_json::from_value(json!({"charities": [{"name": "Org A"}]})).unwrap();

        assert_eq!(response.charities.len(), 1);
        assert_eq!(response.charities[0], Charity::named("Org A"));
        assert!(response.cursor.is_none());
        assert!(response.explain.rationale.is_empty());
    }

    #[test]
    fn test_location_shapes() {
        let single: Charity =
            serde_json::from_value(json!({"name": "A", "location": "Boston, MA"})).unwrap();
        let many: Charity =
            serde_json::from_value(json!({"name": "B", "location": ["Kenya", " ", "Uganda"]}))
                .unwrap();
        let missing: Charity = serde_json::from_value(json!({"name": "C", "location": null})).unwrap();

        assert_eq!(single.location.unwrap().places(), vec!["Boston, MA"]);
        assert_eq!(many.location.unwrap().places(), vec!["Kenya", "Uganda"]);
        assert!(missing.location.is_none());
    }

    #[test]
    fn test_expired_cursor_detection() {
        let explain = Explain {
            ntee: Some("E70".to_string()),
            rationale: vec![
                "Issue focus: health".to_string(),
                "Cursor expired. Please submit the survey again for fresh results.".to_string(),
            ],
        };
        assert!(explain.cursor_expired());
        assert!(!Explain::default().cursor_expired());
    }
}
