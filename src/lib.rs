// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # statuswatch
//!
//! A typed client and diagnostic TUI for the platform monitoring API.
//!
//! The backend exposes a REST snapshot of all monitored services plus a
//! receive-only WebSocket channel that pushes complete snapshots as they
//! change. This crate merges the two into one live view, tracks connection
//! health with a bounded reconnect budget, and drives the alert-resolution
//! workflow against the backend.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │ (model)  │    │(render) │    │         │  │
//! │  └──┬───┬──┘    └──────────┘    └─────────┘    └─────────┘  │
//! │     │   │                                                    │
//! │     ▼   ▼                                                    │
//! │  ┌──────────┐   ┌────────────┐                               │
//! │  │  source  │   │ controller │──▶ ApiClient (REST)           │
//! │  │ (live/   │   │ (commands) │                               │
//! │  │  poll)   │   └────────────┘                               │
//! │  └──────────┘                                                │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, load lifecycle, alert store, navigation
//! - **[`source`]**: Snapshot source abstraction ([`SnapshotSource`] trait)
//!   with the live WebSocket channel, interval polling, and channel input
//! - **[`controller`]**: Background command runner over the REST client
//! - **[`client`]**: Typed REST client for the monitoring API
//! - **[`data`]**: Wire types, health aggregation, snapshot merging, history
//!   statistics
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Live dashboard over the WebSocket channel
//! statuswatch --url http://localhost:8000
//!
//! # Interval polling where WebSockets are unavailable
//! statuswatch --poll --poll-interval 30
//! ```
//!
//! ### As a library with a channel source
//!
//! ```
//! use statuswatch::source::ChannelSource;
//!
//! // Create a channel for pushing snapshots in-process
//! let (tx, source) = ChannelSource::create("embedded");
//! ```
//!
//! ### Talking to the API directly
//!
//! ```no_run
//! use statuswatch::client::ApiClient;
//!
//! # tokio_test::block_on(async {
//! let client = ApiClient::builder()
//!     .base_url("http://localhost:8000")
//!     .build();
//! let snapshot = client.fetch_overview().await?;
//! println!("{} services", snapshot.services.len());
//! # Ok::<(), statuswatch::error::ApiError>(())
//! # });
//! ```

pub mod app;
pub mod client;
pub mod controller;
pub mod data;
pub mod error;
pub mod events;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, Phase, View};
pub use client::ApiClient;
pub use controller::{Command, Controller, Outcome};
pub use data::{
    HistoryStats, MonitoringSnapshot, MonitoringStats, Service, ServiceHistory, ServiceStatus,
    SystemAlert,
};
pub use error::{ApiError, ResolveError, TransportError};
pub use settings::{RetryPolicy, Settings};
pub use source::{
    ChannelSource, ConnectionState, LiveSource, PollSource, SnapshotSource, WsConnector,
};
