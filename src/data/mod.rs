//! Data model and processing for monitoring snapshots.
//!
//! ## Submodules
//!
//! - [`model`]: Wire types matching the backend JSON ([`MonitoringSnapshot`],
//!   [`Service`], [`SystemAlert`], history, stats, ratings, emails)
//! - [`health`]: Worst-wins aggregation of per-service statuses
//! - [`merge`]: Last-write-wins reconciliation of push updates
//! - [`stats`]: Derived avg/min/max statistics over a history window
//!
//! ## Data Flow
//!
//! ```text
//! MonitoringSnapshot (REST fetch or WebSocket push, raw JSON)
//!        │
//!        ▼
//! merge::merge()  — wholesale replacement, arrival order
//!        │
//!        ├──▶ App state (services, alerts, activity)
//!        │
//!        └──▶ health::aggregate() (cross-check of server overall_health)
//! ```

pub mod health;
pub mod merge;
pub mod model;
pub mod stats;

pub use model::{
    AlertSeverity, EmailMessage, EmailPage, FeedbackEntry, HistoryPoint, MonitoringSnapshot,
    MonitoringStats, RatingAverages, RatingStats, RatingSubmission, RatingTimeline,
    RatingTimelinePoint, Service, ServiceHistory, ServiceKind, ServiceRating, ServiceStatus,
    ServicesRatings, SystemAlert, UserActivity,
};
pub use stats::HistoryStats;
