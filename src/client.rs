//! REST client for the monitoring API.
//!
//! Pure request/response: no caching and no retry. Retry and refresh cadence
//! are caller concerns (the dashboard's manual refresh key, the polling
//! source, the resolution workflow). Client-side deadlines are enforced per
//! request: single-service probes get the short probe timeout, the aggregate
//! overview gets the longer one, and a timed-out probe surfaces as a plain
//! failure rather than an indeterminate state.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::data::{
    EmailMessage, EmailPage, MonitoringSnapshot, MonitoringStats, RatingStats, RatingSubmission,
    RatingTimeline, ServiceHistory, ServicesRatings,
};
use crate::error::{ApiError, ResolveError};
use crate::settings::Settings;

/// Typed client for the monitoring backend's REST surface.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    probe_timeout: Duration,
    overview_timeout: Duration,
}

impl ApiClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Build a client from loaded [`Settings`].
    pub fn from_settings(settings: &Settings) -> Self {
        Self::builder()
            .base_url(&settings.api_base_url)
            .probe_timeout(settings.probe_timeout())
            .overview_timeout(settings.overview_timeout())
            .build()
    }

    /// Fetch the full aggregated monitoring view.
    pub async fn fetch_overview(&self) -> Result<MonitoringSnapshot, ApiError> {
        let url = format!("{}/api/monitoring/overview", self.base_url);
        self.get_json(&url, self.overview_timeout).await
    }

    /// Fetch backend-wide monitoring counters.
    pub async fn fetch_stats(&self) -> Result<MonitoringStats, ApiError> {
        let url = format!("{}/api/monitoring/stats", self.base_url);
        self.get_json(&url, self.probe_timeout).await
    }

    /// Fetch probe history for one service over the last `hours` hours.
    ///
    /// An empty `service_name` is a guard case: no request is issued and an
    /// empty history is returned immediately.
    pub async fn fetch_service_history(
        &self,
        service_name: &str,
        hours: u32,
    ) -> Result<ServiceHistory, ApiError> {
        if service_name.is_empty() {
            return Ok(ServiceHistory::empty(service_name, hours));
        }

        let url = format!(
            "{}/api/monitoring/service/{}/history?hours={}",
            self.base_url,
            urlencoded(service_name),
            hours
        );
        self.get_json(&url, self.probe_timeout).await
    }

    /// Ask the backend to run a probe cycle now. The response body is unused.
    pub async fn trigger_check(&self) -> Result<(), ApiError> {
        let url = format!("{}/api/monitoring/check-now", self.base_url);
        let response = self
            .client
            .post(&url)
            .timeout(self.overview_timeout)
            .send()
            .await
            .map_err(ApiError::from)?;

        if !response.status().is_success() {
            return Err(ApiError::Http {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    /// Mark an alert resolved on the backend.
    ///
    /// The backend owns `resolved_at` and may touch other alerts as a side
    /// effect, so callers must follow a success with a fresh overview fetch
    /// instead of patching local state.
    pub async fn resolve_alert(&self, alert_id: i64, resolved_by: &str) -> Result<(), ResolveError> {
        let url = format!("{}/api/monitoring/alerts/{}/resolve", self.base_url, alert_id);
        let body = serde_json::json!({ "resolved_by": resolved_by });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.overview_timeout)
            .send()
            .await
            .map_err(|e| ResolveError {
                alert_id,
                source: ApiError::from(e),
            })?;

        if !response.status().is_success() {
            return Err(ResolveError {
                alert_id,
                source: ApiError::Http {
                    status: response.status().as_u16(),
                },
            });
        }
        Ok(())
    }

    /// Rating aggregates for a period, optionally filtered to one service.
    pub async fn fetch_rating_stats(
        &self,
        service_name: Option<&str>,
        days: u32,
    ) -> Result<RatingStats, ApiError> {
        let url = ratings_url(&self.base_url, "stats", service_name, days);
        self.get_json(&url, self.probe_timeout).await
    }

    /// Daily rating averages for a period.
    pub async fn fetch_rating_timeline(
        &self,
        service_name: Option<&str>,
        days: u32,
    ) -> Result<RatingTimeline, ApiError> {
        let url = ratings_url(&self.base_url, "timeline", service_name, days);
        self.get_json(&url, self.probe_timeout).await
    }

    /// Per-service rating rollups for a period.
    pub async fn fetch_services_ratings(&self, days: u32) -> Result<ServicesRatings, ApiError> {
        let url = format!("{}/api/ratings/services?days={}", self.base_url, days);
        self.get_json(&url, self.probe_timeout).await
    }

    /// Submit a user rating.
    pub async fn submit_rating(&self, submission: &RatingSubmission) -> Result<(), ApiError> {
        let url = format!("{}/api/rating", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(submission)
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(ApiError::from)?;

        if !response.status().is_success() {
            return Err(ApiError::Http {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    /// Fetch a page of operational emails.
    pub async fn fetch_emails(&self, limit: u32, offset: u32) -> Result<Vec<EmailMessage>, ApiError> {
        let url = format!(
            "{}/api/monitoring/emails?limit={}&offset={}",
            self.base_url, limit, offset
        );
        let page: EmailPage = self.get_json(&url, self.probe_timeout).await?;
        Ok(page.items)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, timeout: Duration) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(ApiError::from)?;

        if !response.status().is_success() {
            return Err(ApiError::Http {
                status: response.status().as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| ApiError::Parse(e.to_string()))
    }
}

fn ratings_url(base_url: &str, kind: &str, service_name: Option<&str>, days: u32) -> String {
    let mut url = format!("{}/api/ratings/{}?days={}", base_url, kind, days);
    if let Some(name) = service_name {
        url.push_str("&service_name=");
        url.push_str(&urlencoded(name));
    }
    url
}

/// Builder for [`ApiClient`].
#[derive(Debug, Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    probe_timeout: Option<Duration>,
    overview_timeout: Option<Duration>,
}

impl ApiClientBuilder {
    /// Set the REST base URL (e.g. "http://localhost:8000").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Deadline for single-service probes (default: 3 seconds).
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = Some(timeout);
        self
    }

    /// Deadline for the aggregate overview probe (default: 5 seconds).
    pub fn overview_timeout(mut self, timeout: Duration) -> Self {
        self.overview_timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> ApiClient {
        let client = Client::builder().build().expect("Failed to build HTTP client");

        ApiClient {
            client,
            base_url: self
                .base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "http://localhost:8000".to_string()),
            probe_timeout: self.probe_timeout.unwrap_or(Duration::from_secs(3)),
            overview_timeout: self.overview_timeout.unwrap_or(Duration::from_secs(5)),
        }
    }
}

// Percent-encode a string for use in a path segment or query value.
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = ApiClient::builder().build();
        assert_eq!(client.base_url, "http://localhost:8000");
        assert_eq!(client.probe_timeout, Duration::from_secs(3));
        assert_eq!(client.overview_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_builder_strips_trailing_slash() {
        let client = ApiClient::builder().base_url("http://api.example.com/").build();
        assert_eq!(client.base_url, "http://api.example.com");
    }

    #[test]
    fn test_urlencoded() {
        assert_eq!(urlencoded("main-api"), "main-api");
        assert_eq!(urlencoded("my service"), "my%20service");
        assert_eq!(urlencoded("a/b"), "a%2Fb");
        assert_eq!(urlencoded("q?&"), "q%3F%26");
    }

    #[test]
    fn test_ratings_url() {
        assert_eq!(
            ratings_url("http://x", "stats", None, 30),
            "http://x/api/ratings/stats?days=30"
        );
        assert_eq!(
            ratings_url("http://x", "timeline", Some("my service"), 7),
            "http://x/api/ratings/timeline?days=7&service_name=my%20service"
        );
    }

    #[tokio::test]
    async fn test_empty_service_name_short_circuits() {
        // Unroutable base URL: if a request were issued this would error, not
        // return an empty history.
        let client = ApiClient::builder().base_url("http://127.0.0.1:1").build();

        let history = client.fetch_service_history("", 24).await.unwrap();
        assert_eq!(history.service_name, "");
        assert_eq!(history.period_hours, 24);
        assert!(history.data_points.is_empty());
    }
}
