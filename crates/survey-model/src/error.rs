//! Error types for the survey-model crate.
//!
//! Validation failures never reach the network: they are produced and
//! surfaced locally by whoever builds a submission.

use thiserror::Error;

/// Errors that can occur while building a survey submission
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurveyError {
    /// One or more of the required questions has no selected value
    #[error("Missing required answers: {}", missing.join(", "))]
    MissingRequired { missing: Vec<String> },

    /// The submission carried no answers at all
    #[error("At least one answer is required")]
    NoAnswers,

    /// A raw `name=value` form entry couldn't be parsed
    #[error("Invalid form entry '{entry}': {reason}")]
    InvalidEntry { entry: String, reason: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, SurveyError>;
