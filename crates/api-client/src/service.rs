//! Service seam used by the orchestrator.
//!
//! The orchestrator only needs two calls; keeping them behind a trait lets
//! the page session run against the real HTTP client or an in-memory stand-in.

use async_trait::async_trait;
use tracing::debug;

use survey_model::{Charity, RecommendationRequest, RecommendationResponse};

use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;

/// Calls the orchestrator makes against the recommendation service
#[async_trait]
pub trait RecommendationService: Send + Sync {
    /// `POST /api/recommend`
    async fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResponse, ApiError>;

    /// `GET /api/daily-picks?limit={limit}`
    async fn daily_picks(&self, limit: u32) -> Result<Vec<Charity>, ApiError>;
}

#[async_trait]
impl RecommendationService for ApiClient {
    async fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResponse, ApiError> {
        debug!(
            "Requesting recommendations: {} answers, cursor={}, limit={}",
            request.answers.len(),
            request.cursor.is_some(),
            request.limit
        );
        self.send_as("/api/recommend", ApiRequest::post_json(request)?)
            .await
    }

    async fn daily_picks(&self, limit: u32) -> Result<Vec<Charity>, ApiError> {
        Ok(self.fetch_daily_picks(limit).await?.charities)
    }
}
