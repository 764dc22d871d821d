//! Error types for talking to the recommendation service.

use thiserror::Error;

/// Message surfaced when nothing more specific is known about a failure
pub const GENERIC_FAILURE: &str = "Request failed";

/// Errors resolving the client configuration.
///
/// `Clone` because one failed resolution is handed to every caller that
/// was waiting on it, and to every caller after it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to fetch client config: {0}")]
    Fetch(String),

    #[error("Client config request returned status {0}")]
    Status(u16),

    #[error("Client config is not valid JSON: {0}")]
    Parse(String),

    #[error("Client config has no apiBase")]
    MissingApiBase,
}

/// Errors that can occur when calling the recommendation service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request never got an HTTP response
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-success HTTP status; `message` is already normalized
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Invalid response from recommendation service: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Text shown to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Config(_) => GENERIC_FAILURE.to_string(),
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
