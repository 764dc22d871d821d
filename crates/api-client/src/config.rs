//! Config provider: resolves and memoizes the API base URL.
//!
//! The resolution is a single shared lazy future. Every caller awaits the
//! same one, so concurrent callers before the first resolution cause only
//! one fetch, and a failure is returned to every caller for the lifetime of
//! the provider.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::header::CACHE_CONTROL;
use serde::Deserialize;
use tracing::{error, info};

use crate::error::ConfigError;

type Resolution = Shared<BoxFuture<'static, Result<Arc<str>, ConfigError>>>;

/// Static JSON document served next to the page
#[derive(Debug, Deserialize)]
struct ConfigDocument {
    #[serde(rename = "apiBase")]
    api_base: Option<String>,
}

/// Idempotent accessor for the API base URL.
///
/// Cloning is cheap and clones share the same resolution.
#[derive(Clone)]
pub struct ConfigProvider {
    resolution: Resolution,
}

impl ConfigProvider {
    /// Provider that is already resolved, for hosts that know the base URL
    pub fn fixed(api_base: impl Into<String>) -> Self {
        let base: Arc<str> = Arc::from(api_base.into());
        Self {
            resolution: futures::future::ready(Ok(base)).boxed().shared(),
        }
    }

    /// Provider that fetches `{ "apiBase": ... }` from `config_url` on first use
    pub fn from_url(http: reqwest::Client, config_url: impl Into<String>) -> Self {
        let config_url = config_url.into();
        Self {
            resolution: fetch_config(http, config_url).boxed().shared(),
        }
    }

    /// Resolve the API base URL, waiting on the shared resolution if needed
    pub async fn api_base(&self) -> Result<Arc<str>, ConfigError> {
        self.resolution.clone().await
    }
}

async fn fetch_config(http: reqwest::Client, config_url: String) -> Result<Arc<str>, ConfigError> {
    info!("Loading client config from {}", config_url);

    let result = load_document(&http, &config_url).await;
    match &result {
        Ok(base) => info!("Resolved API base: {}", base),
        Err(err) => error!("Failed to load client config from {}: {}", config_url, err),
    }
    result
}

async fn load_document(http: &reqwest::Client, config_url: &str) -> Result<Arc<str>, ConfigError> {
    let response = http
        .get(config_url)
        .header(CACHE_CONTROL, "no-store")
        .send()
        .await
        .map_err(|e| ConfigError::Fetch(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ConfigError::Status(response.status().as_u16()));
    }

    let document: ConfigDocument = response
        .json()
        .await
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    let base = document
        .api_base
        .map(|base| base.trim().to_string())
        .filter(|base| !base.is_empty())
        .ok_or(ConfigError::MissingApiBase)?;

    Ok(Arc::from(base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fixed_provider_resolves_immediately() {
        let provider = ConfigProvider::fixed("https://api.example.org");
        assert_eq!(&*provider.api_base().await.unwrap(), "https://api.example.org");
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/config.json"))
            .and(header("cache-control", "no-store"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"apiBase": "http://api.local/"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            ConfigProvider::from_url(reqwest::Client::new(), format!("{}/config.json", server.uri()));
        let clone = provider.clone();

        let (first, second, third) = tokio::join!(provider.api_base(), clone.api_base(), provider.api_base());
        assert_eq!(&*first.unwrap(), "http://api.local/");
        assert_eq!(&*second.unwrap(), "http://api.local/");
        assert_eq!(&*third.unwrap(), "http://api.local/");

        // Later calls reuse the memoized value
        assert_eq!(&*provider.api_base().await.unwrap(), "http://api.local/");
    }

    #[tokio::test]
    async fn test_failure_is_cached_for_every_caller() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/config.json"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            ConfigProvider::from_url(reqwest::Client::new(), format!("{}/config.json", server.uri()));

        assert_eq!(provider.api_base().await, Err(ConfigError::Status(503)));
        assert_eq!(provider.api_base().await, Err(ConfigError::Status(503)));
    }

    #[tokio::test]
    async fn test_missing_api_base_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/config.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"apiBase": "  "})))
            .mount(&server)
            .await;

        let provider =
            ConfigProvider::from_url(reqwest::Client::new(), format!("{}/config.json", server.uri()));
        assert_eq!(provider.api_base().await, Err(ConfigError::MissingApiBase));
    }

    #[tokio::test]
    async fn test_unparsable_document_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/config.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider =
            ConfigProvider::from_url(reqwest::Client::new(), format!("{}/config.json", server.uri()));
        assert!(matches!(provider.api_base().await, Err(ConfigError::Parse(_))));
    }
}
