//! # Survey Model Crate
//!
//! Domain types and form handling for the charity survey client.
//!
//! ## Main Components
//!
//! - **types**: Wire types shared with the recommendation service
//!   (Answer, Cursor, RecommendationRequest/Response, Charity)
//! - **form**: Form state, the question catalogue and the answer serializer
//! - **error**: Error types for building submissions
//!
//! ## Example Usage
//!
//! ```ignore
//! use survey_model::{FormState, serialize_answers, RecommendationRequest};
//!
//! let form = FormState::new()
//!     .with("q_issue_family", "health")
//!     .with("q_impact_mode", "direct")
//!     .with("q_geography", "global");
//!
//! let request = RecommendationRequest::first_page(serialize_answers(&form));
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod form;

// Re-export commonly used types for convenience
pub use error::{Result, SurveyError};
pub use form::{
    serialize_answers,
    FormState,
    Q_GEOGRAPHY,
    Q_IMPACT_MODE,
    Q_ISSUE_FAMILY,
    Q_LOCATION,
    Q_TOPICS,
    REQUIRED_QUESTIONS,
};
pub use types::{
    // Constants
    DEFAULT_PICKS_LIMIT,
    PAGE_SIZE,
    // Wire types
    Answer,
    AnswerValue,
    Charity,
    Cursor,
    DailyPicksResponse,
    Explain,
    Location,
    RecommendationRequest,
    RecommendationResponse,
    ServiceStatus,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_scenario_serializes_to_request() {
        let form = FormState::new()
            .with(Q_ISSUE_FAMILY, "health")
            .with(Q_IMPACT_MODE, "direct")
            .with(Q_GEOGRAPHY, "global");

        let request = RecommendationRequest::first_page(serialize_answers(&form));

        assert_eq!(request.answers.len(), 3);
        assert_eq!(request.answers[2].question_id, Q_GEOGRAPHY);
        assert_eq!(request.cursor, None);
        assert_eq!(request.limit, PAGE_SIZE);
    }
}
