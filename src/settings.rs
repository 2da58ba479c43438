//! Runtime configuration.
//!
//! Settings are layered: built-in defaults, then environment variables
//! (`API_BASE_URL`, `WS_URL`, and the policy knobs below), then CLI flags
//! applied by the binary. Policy values live here rather than in the
//! components that enforce them, so tuning never touches connection or
//! client logic.

use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Reconnect policy for the live channel: a bounded number of attempts with
/// a fixed inter-attempt delay (deliberately not exponential backoff; the
/// observed backend contract is 10 x 3000 ms).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

/// All tunables for the dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// REST base, e.g. `http://localhost:8000`.
    pub api_base_url: String,
    /// WebSocket base, e.g. `ws://localhost:8000`.
    pub ws_url: String,
    /// Identity recorded as `resolved_by` when resolving alerts.
    pub operator: String,
    /// Default history window in hours.
    pub history_hours: u32,
    /// Fallback polling cadence when the live channel is disabled.
    pub poll_interval_ms: u64,
    /// Client-side deadline for single-service probes (history, stats).
    pub probe_timeout_ms: u64,
    /// Client-side deadline for the aggregate overview probe.
    pub overview_timeout_ms: u64,
    /// Live-channel reconnect attempt budget.
    pub reconnect_attempts: u32,
    /// Fixed delay between reconnect attempts.
    pub reconnect_delay_ms: u64,
}

impl Settings {
    /// Load settings from defaults overlaid with the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("api_base_url", "http://localhost:8000")?
            .set_default("ws_url", "ws://localhost:8000")?
            .set_default("operator", "admin")?
            .set_default("history_hours", 24)?
            .set_default("poll_interval_ms", 30_000)?
            .set_default("probe_timeout_ms", 3_000)?
            .set_default("overview_timeout_ms", 5_000)?
            .set_default("reconnect_attempts", 10)?
            .set_default("reconnect_delay_ms", 3_000)?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// The full WebSocket endpoint for monitoring pushes.
    pub fn ws_endpoint(&self) -> String {
        format!("{}/ws/monitoring", self.ws_url.trim_end_matches('/'))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.reconnect_attempts,
            retry_delay: Duration::from_millis(self.reconnect_delay_ms),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn overview_timeout(&self) -> Duration {
        Duration::from_millis(self.overview_timeout_ms)
    }
}
