//! Client for the charity recommendation service.
//!
//! This crate provides:
//! - `ConfigProvider`: resolves the API base URL once and shares it
//! - `ApiClient`: sends JSON requests and normalizes failures into `ApiError`
//! - `RecommendationService`: the two calls the orchestrator depends on
//!
//! ## Example Usage
//! ```ignore
//! use api_client::{ApiClient, ConfigProvider, RecommendationService};
//! use survey_model::RecommendationRequest;
//!
//! let config = ConfigProvider::from_url(reqwest::Client::new(), "https://example.org/config.json");
//! let client = ApiClient::new(config)?;
//! let page = client.recommend(&RecommendationRequest::first_page(answers)).await?;
//! ```

pub mod config;
pub mod error;
pub mod client;
pub mod service;

pub use client::{join_url, ApiClient, ApiRequest};
pub use config::ConfigProvider;
pub use error::{ApiError, ConfigError, GENERIC_FAILURE};
pub use service::RecommendationService;
