//! HTTP client for the recommendation service.
//!
//! Every call resolves the base URL through the [`ConfigProvider`], sends
//! JSON, and normalizes any failure into an [`ApiError`] carrying one
//! human-readable message.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use survey_model::{DailyPicksResponse, ServiceStatus};

use crate::config::ConfigProvider;
use crate::error::{ApiError, GENERIC_FAILURE};

// =============================================================================
// Request description
// =============================================================================

/// One outgoing call: method, optional JSON body, extra headers.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            headers: Vec::new(),
        }
    }

    /// Serialize `body` and build a POST from it
    pub fn post_json<T: Serialize>(body: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        Ok(Self::post(body))
    }

    /// Add a header; it wins over the defaults for the same name
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the recommendation service.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ConfigProvider,
}

impl ApiClient {
    /// Build a client with a fresh HTTP connection pool.
    ///
    /// No client-side timeout is set: slow responses are waited on.
    pub fn new(config: ConfigProvider) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::with_http(http, config))
    }

    /// Build a client around an existing HTTP client
    pub fn with_http(http: reqwest::Client, config: ConfigProvider) -> Self {
        Self { http, config }
    }

    /// Send a request to `path` under the resolved base URL.
    ///
    /// Returns the parsed JSON body on success. On a non-success status the
    /// body is read as a structured error if possible; a body that can't be
    /// parsed just counts as "no structured error".
    pub async fn send(&self, path: &str, request: ApiRequest) -> Result<Value, ApiError> {
        let base = self.config.api_base().await?;
        let url = join_url(&base, path);
        let headers = merge_headers(&request.headers)?;

        debug!("{} {}", request.method, url);

        let mut builder = self.http.request(request.method.clone(), &url).headers(headers);
        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
            builder = builder.body(bytes);
        }

        let response = builder.send().await.map_err(|e| {
            error!("{} {} failed: {}", request.method, url, e);
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.ok();
            let parsed = body.and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok());
            let message = error_message(parsed.as_ref(), status);
            warn!("{} {} returned {}: {}", request.method, url, status.as_u16(), message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<Value>().await.map_err(|e| {
            error!("{} {} returned an unreadable body: {}", request.method, url, e);
            ApiError::Decode(e.to_string())
        })
    }

    /// Send and decode the JSON body into `T`
    pub async fn send_as<T: DeserializeOwned>(&self, path: &str, request: ApiRequest) -> Result<T, ApiError> {
        let value = self.send(path, request).await?;
        serde_json::from_value(value).map_err(|e| {
            error!("Unexpected response shape from {}: {}", path, e);
            ApiError::Decode(e.to_string())
        })
    }

    /// `GET /api/daily-picks?limit={limit}`
    pub async fn fetch_daily_picks(&self, limit: u32) -> Result<DailyPicksResponse, ApiError> {
        self.send_as(&format!("/api/daily-picks?limit={}", limit), ApiRequest::get())
            .await
    }

    /// `GET /api/status`
    pub async fn status(&self) -> Result<ServiceStatus, ApiError> {
        self.send_as("/api/status", ApiRequest::get()).await
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Join a base URL and a path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

/// Default JSON content type, overridden per name by caller headers.
pub(crate) fn merge_headers(extra: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::InvalidRequest(format!("bad header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidRequest(format!("bad header value for '{}': {}", name, e)))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

/// Pick the most useful message for a failed response.
///
/// Order: structured `detail`, then `message`, then the status text, then
/// the generic fallback.
pub(crate) fn error_message(body: Option<&Value>, status: StatusCode) -> String {
    body.and_then(structured_message)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

fn structured_message(body: &Value) -> Option<String> {
    body.get("detail")
        .and_then(detail_message)
        .or_else(|| non_empty(body.get("message")))
}

// `detail` comes as a plain string, an object with a `message`, or a list
// of validation items each carrying `msg`.
fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(_) => non_empty(Some(detail)),
        Value::Object(_) => non_empty(detail.get("message")),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .filter(|msg| !msg.trim().is_empty())
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_url_normalizes_slashes() {
        assert_eq!(join_url("http://api.local", "/api/recommend"), "http://api.local/api/recommend");
        assert_eq!(join_url("http://api.local/", "api/recommend"), "http://api.local/api/recommend");
        assert_eq!(join_url("http://api.local//", "//api/status"), "http://api.local/api/status");
        assert_eq!(
            join_url("http://api.local/v1/", "/api/daily-picks?limit=3"),
            "http://api.local/v1/api/daily-picks?limit=3"
        );
    }

    #[test]
    fn test_merge_headers_caller_wins() {
        let headers = merge_headers(&[
            ("Content-Type".to_string(), "application/merge-patch+json".to_string()),
            ("X-Trace".to_string(), "abc".to_string()),
        ])
        .unwrap();

        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/merge-patch+json");
        assert_eq!(headers.get("x-trace").unwrap(), "abc");
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_merge_headers_default_content_type() {
        let headers = merge_headers(&[]).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_merge_headers_rejects_bad_names() {
        let result = merge_headers(&[("bad header".to_string(), "x".to_string())]);
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn test_error_message_from_detail_string() {
        let body = json!({"detail": "answers are required"});
        assert_eq!(error_message(Some(&body), StatusCode::BAD_REQUEST), "answers are required");
    }

    #[test]
    fn test_error_message_from_detail_object() {
        let body = json!({"detail": {"message": "Too many requests, please slow down.", "limit": 60}});
        assert_eq!(
            error_message(Some(&body), StatusCode::TOO_MANY_REQUESTS),
            "Too many requests, please slow down."
        );
    }

    #[test]
    fn test_error_message_from_validation_list() {
        let body = json!({"detail": [
            {"loc": ["body", "limit"], "msg": "ensure this value is less than or equal to 12"},
            {"loc": ["body", "answers"], "msg": "field required"}
        ]});
        assert_eq!(
            error_message(Some(&body), StatusCode::UNPROCESSABLE_ENTITY),
            "ensure this value is less than or equal to 12; field required"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_message_field() {
        let body = json!({"detail": null, "message": "Service unavailable"});
        assert_eq!(error_message(Some(&body), StatusCode::SERVICE_UNAVAILABLE), "Service unavailable");
    }

    #[test]
    fn test_error_message_falls_back_to_status_text() {
        assert_eq!(error_message(None, StatusCode::BAD_GATEWAY), "Bad Gateway");
        let body = json!({"unrelated": true});
        assert_eq!(error_message(Some(&body), StatusCode::NOT_FOUND), "Not Found");
    }

    #[test]
    fn test_error_message_generic_fallback() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(error_message(None, status), GENERIC_FAILURE);
    }
}
