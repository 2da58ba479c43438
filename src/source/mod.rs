//! Snapshot source abstraction.
//!
//! The dashboard consumes [`MonitoringSnapshot`] values from exactly one
//! source at a time: the live WebSocket channel, the fixed-interval polling
//! fallback, or an in-process channel (embedding and tests). All of them
//! expose the same non-blocking [`SnapshotSource::poll`] interface, so the
//! event loop never blocks on I/O.

mod channel;
mod live;
mod poll;

pub use channel::ChannelSource;
pub use live::{Connector, LiveSource, MessageStream, WsConnector};
pub use poll::PollSource;

use std::fmt::Debug;

use crate::data::MonitoringSnapshot;

/// Observable state of the underlying transport.
///
/// `Closed` is terminal for the live channel: the retry budget is spent and
/// no further reconnects will happen. Consumers keep showing the last good
/// snapshot and mark it stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// Trait for receiving monitoring snapshots from various transports.
pub trait SnapshotSource: Send + Debug {
    /// Poll for the next snapshot, in arrival order.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// Must be non-blocking; it is called from the UI event loop.
    fn poll(&mut self) -> Option<MonitoringSnapshot>;

    /// Human-readable description of the source, for the status bar.
    fn description(&self) -> &str;

    /// Current transport state.
    fn connection_state(&self) -> ConnectionState;

    /// The most recent transport or parse error, if any.
    fn last_error(&self) -> Option<String>;
}
