//! HTTP client for the analytics service.

use super::request::{Endpoint, Method, ViewRequest};
use super::AnalyticsService;
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Longest error body quoted back in an [`DashboardError::UpstreamRequest`].
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Analytics service reached over HTTP/JSON.
///
/// # Example
///
/// ```rust,ignore
/// use statdash::{DashboardConfig, upstream::HttpAnalyticsClient};
///
/// let config = DashboardConfig::builder()
///     .base_url("http://localhost:8000/api")
///     .timeout_secs(10)
///     .build()?;
/// let client = HttpAnalyticsClient::new(config)?;
/// ```
pub struct HttpAnalyticsClient {
    config: DashboardConfig,
    client: Client,
}

impl HttpAnalyticsClient {
    /// Create a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: DashboardConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DashboardError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Absolute URL for an endpoint (query string not included).
    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.config.base_url, endpoint.path)
    }
}

impl AnalyticsService for HttpAnalyticsClient {
    async fn fetch(&self, request: &ViewRequest) -> Result<Value> {
        let endpoint = request.endpoint(self.config.monte_carlo_simulations);
        let url = self.url_for(&endpoint);
        debug!(view = %request.kind(), %url, "Sending analytics request");

        let builder = match endpoint.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        let builder = builder.query(&endpoint.query);
        let builder = match &endpoint.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&text)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            warn!(view = %request.kind(), status = status.as_u16(), "Analytics request failed: {}", message);
            return Err(DashboardError::UpstreamRequest {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| DashboardError::malformed(request.kind().as_str(), format!("invalid JSON: {e}")))
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Pull a readable message out of an error body.
///
/// Prefers a string `detail` field, falling back to the raw text (trimmed and
/// truncated). Returns `None` for an empty body.
fn error_message(body: &str) -> Option<String> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body)
        && let Some(Value::String(detail)) = map.get("detail")
    {
        return Some(detail.clone());
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect())
}
