//! Wire types for the monitoring API.
//!
//! These types match the JSON produced by the monitoring backend. They serve
//! as the common format between the REST snapshot endpoint and the WebSocket
//! push channel, which both deliver complete [`MonitoringSnapshot`] values.

use serde::{Deserialize, Serialize};

/// Health of a single service, or of the system as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
    Down,
    Unknown,
}

impl ServiceStatus {
    /// Severity rank for worst-wins aggregation: `down > degraded > unknown > healthy`.
    ///
    /// The ordering is explicit rather than derived so it cannot silently
    /// drift if variants are reordered.
    pub fn severity_rank(self) -> u8 {
        match self {
            ServiceStatus::Healthy => 0,
            ServiceStatus::Unknown => 1,
            ServiceStatus::Degraded => 2,
            ServiceStatus::Down => 3,
        }
    }

    /// Returns a short uppercase label for display.
    pub fn label(self) -> &'static str {
        match self {
            ServiceStatus::Healthy => "HEALTHY",
            ServiceStatus::Degraded => "DEGRADED",
            ServiceStatus::Down => "DOWN",
            ServiceStatus::Unknown => "UNKNOWN",
        }
    }
}

/// What kind of thing a service entry represents.
///
/// The wire names are the backend's provider-specific ones (`vercel` is its
/// deployment target, `heroku` its process host, `api_key` a checked
/// credential).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceKind {
    #[serde(rename = "vercel")]
    Deployment,
    #[serde(rename = "heroku")]
    ProcessHost,
    #[serde(rename = "api_key")]
    Credential,
    #[serde(rename = "database")]
    Database,
    #[serde(other)]
    Other,
}

/// One monitored service as reported by the backend.
///
/// Identity is `name`; the whole record is replaced on every snapshot, never
/// patched field by field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ServiceKind,
    pub status: ServiceStatus,

    /// Probe round-trip in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,

    /// RFC 3339 timestamp of the last probe. Kept opaque; the dashboard only
    /// displays it.
    pub last_checked: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Open map of backend-specific extras (deployment URL, dyno counts, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Alert severity as assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl AlertSeverity {
    pub fn label(self) -> &'static str {
        match self {
            AlertSeverity::Info => "INFO",
            AlertSeverity::Warning => "WARN",
            AlertSeverity::Critical => "CRIT",
        }
    }
}

/// A system alert raised by the backend.
///
/// Alerts are created server-side only; the client transitions them to
/// resolved via the resolution workflow and otherwise treats them as
/// read-only. `resolved_at`/`resolved_by` are present iff `resolved` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemAlert {
    pub id: i64,
    pub severity: AlertSeverity,
    /// Name of the service this alert concerns (not validated against the
    /// services list).
    pub service: String,
    pub message: String,
    pub created_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
}

impl SystemAlert {
    pub fn is_resolved(&self) -> bool {
        self.resolved.unwrap_or(false)
    }
}

/// Aggregate usage counters, replaced wholesale with each snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserActivity {
    pub total_users_24h: u64,
    pub total_requests_24h: u64,
    pub avg_response_time: f64,
}

/// A complete point-in-time view of the monitored system.
///
/// Both the REST overview endpoint and the WebSocket channel produce values
/// of this shape. Whichever arrives later fully replaces the previous one;
/// see [`crate::data::merge`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSnapshot {
    pub timestamp: String,
    /// Backend-defined order, preserved as received.
    pub services: Vec<Service>,
    pub alerts: Vec<SystemAlert>,
    pub activity: UserActivity,
    /// Server-computed aggregate. Displayed as-is; the local aggregator in
    /// [`crate::data::health`] exists to cross-check it.
    pub overall_health: ServiceStatus,
}

/// One sample in a service's probe history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: String,
    pub status: ServiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Probe history for one service over a time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHistory {
    pub service_name: String,
    pub period_hours: u32,
    pub data_points: Vec<HistoryPoint>,
}

impl ServiceHistory {
    /// An empty history, used by the client's empty-name guard.
    pub fn empty(service_name: &str, period_hours: u32) -> Self {
        Self {
            service_name: service_name.to_string(),
            period_hours,
            data_points: Vec::new(),
        }
    }
}

/// Backend-wide monitoring counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringStats {
    pub total_health_checks: u64,
    pub total_alerts: u64,
    pub active_alerts: u64,
    pub monitored_services: u64,
    pub uptime_percentage: f64,
}

/// Per-category average scores over a rating period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingAverages {
    pub clarity: f64,
    pub usefulness: f64,
    pub accuracy: f64,
    pub usability: f64,
    pub speed: f64,
    pub design: f64,
    pub overall: f64,
    pub recommend: f64,
    pub price: f64,
}

/// A recent free-text feedback entry attached to a rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: i64,
    pub overall: f64,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    pub created_at: String,
}

/// Rating aggregates for a period, optionally filtered by service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingStats {
    pub period_days: u32,
    pub total_ratings: u64,
    pub averages: RatingAverages,
    pub nps: f64,
    /// Score value -> count. JSON object keys are strings even though the
    /// scores are numeric.
    pub distribution: std::collections::BTreeMap<String, u64>,
    pub recent_feedback: Vec<FeedbackEntry>,
}

/// One bucket in the rating timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingTimelinePoint {
    pub date: String,
    pub avg_rating: f64,
    pub count: u64,
}

/// Daily rating averages over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingTimeline {
    pub period_days: u32,
    pub data_points: Vec<RatingTimelinePoint>,
}

/// Rating rollup for one service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRating {
    pub service_name: String,
    pub total_ratings: u64,
    pub avg_rating: f64,
}

/// Per-service rating rollups for a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesRatings {
    pub period_days: u32,
    pub services: Vec<ServiceRating>,
}

/// Body of `POST /api/rating`.
///
/// Per-category scores are 1-5 stars; absent categories were skipped by the
/// user and are omitted from the payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RatingSubmission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarity: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usefulness: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usability: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommend: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<u8>,
    pub overall: u8,
    pub feedback: String,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
}

/// An operational email captured by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub id: i64,
    #[serde(default)]
    pub subject: String,
    #[serde(rename = "from", default)]
    pub sender: String,
    #[serde(rename = "to", default)]
    pub recipient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
}

/// Response envelope of `GET /api/monitoring/emails`.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailPage {
    #[serde(default)]
    pub items: Vec<EmailMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snapshot() {
        let json = r#"{
            "timestamp": "2025-04-01T12:00:00Z",
            "services": [
                {
                    "name": "main-api",
                    "type": "heroku",
                    "status": "healthy",
                    "response_time": 0.182,
                    "last_checked": "2025-04-01T11:59:30Z",
                    "additional_info": { "dynos_running": 2, "dynos_total": 2 }
                },
                {
                    "name": "frontend",
                    "type": "vercel",
                    "status": "down",
                    "last_checked": "2025-04-01T11:59:30Z",
                    "error": "deployment ERROR"
                }
            ],
            "alerts": [
                {
                    "id": 42,
                    "severity": "critical",
                    "service": "frontend",
                    "message": "Deployment failed",
                    "created_at": "2025-04-01T11:58:00Z"
                }
            ],
            "activity": {
                "total_users_24h": 120,
                "total_requests_24h": 4815,
                "avg_response_time": 0.21
            },
            "overall_health": "down"
        }"#;

        let snapshot: MonitoringSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.services.len(), 2);
        assert_eq!(snapshot.services[0].kind, ServiceKind::ProcessHost);
        assert_eq!(snapshot.services[0].response_time, Some(0.182));
        assert_eq!(snapshot.services[1].status, ServiceStatus::Down);
        assert_eq!(snapshot.services[1].error.as_deref(), Some("deployment ERROR"));
        assert_eq!(snapshot.overall_health, ServiceStatus::Down);

        let alert = &snapshot.alerts[0];
        assert_eq!(alert.id, 42);
        assert_eq!(alert.severity, AlertSeverity::Critical);
        assert!(!alert.is_resolved());
    }

    #[test]
    fn test_unknown_service_kind_tolerated() {
        let json = r#"{
            "name": "queue",
            "type": "rabbitmq",
            "status": "unknown",
            "last_checked": "2025-04-01T11:59:30Z"
        }"#;

        let service: Service = serde_json::from_str(json).unwrap();
        assert_eq!(service.kind, ServiceKind::Other);
        assert_eq!(service.status, ServiceStatus::Unknown);
    }

    #[test]
    fn test_resolved_alert_fields() {
        let json = r#"{
            "id": 7,
            "severity": "warning",
            "service": "db",
            "message": "Slow queries",
            "created_at": "2025-04-01T09:00:00Z",
            "resolved": true,
            "resolved_at": "2025-04-01T09:30:00Z",
            "resolved_by": "admin"
        }"#;

        let alert: SystemAlert = serde_json::from_str(json).unwrap();
        assert!(alert.is_resolved());
        assert_eq!(alert.resolved_by.as_deref(), Some("admin"));
    }

    #[test]
    fn test_severity_rank_ordering() {
        assert!(ServiceStatus::Down.severity_rank() > ServiceStatus::Degraded.severity_rank());
        assert!(ServiceStatus::Degraded.severity_rank() > ServiceStatus::Unknown.severity_rank());
        assert!(ServiceStatus::Unknown.severity_rank() > ServiceStatus::Healthy.severity_rank());
    }

    #[test]
    fn test_rating_submission_skips_absent_categories() {
        let submission = RatingSubmission {
            clarity: Some(5),
            overall: 5,
            feedback: "great".to_string(),
            session_id: "abc123".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["clarity"], 5);
        assert!(json.get("usefulness").is_none());
        assert!(json.get("service_name").is_none());
    }

    #[test]
    fn test_email_page_defaults_to_empty_items() {
        let page: EmailPage = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
    }
}
