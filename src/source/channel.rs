//! Channel-based data source.
//!
//! Receives monitoring snapshots via a tokio watch channel. Useful for
//! embedding the dashboard against an in-process feed and for driving the
//! merge pipeline in tests without any transport.

use tokio::sync::watch;

use super::{ConnectionState, SnapshotSource};
use crate::data::MonitoringSnapshot;

/// A data source fed by a watch channel.
///
/// # Example
///
/// ```
/// use statuswatch::source::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("embedded");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Option<MonitoringSnapshot>>,
    description: String,
}

impl ChannelSource {
    /// Wrap the receiving end of an existing watch channel.
    pub fn new(
        receiver: watch::Receiver<Option<MonitoringSnapshot>>,
        source_description: &str,
    ) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
        }
    }

    /// Create a channel pair: push snapshots through the sender, hand the
    /// source to the dashboard.
    pub fn create(
        source_description: &str,
    ) -> (watch::Sender<Option<MonitoringSnapshot>>, Self) {
        let (tx, rx) = watch::channel(None);
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl SnapshotSource for ChannelSource {
    fn poll(&mut self) -> Option<MonitoringSnapshot> {
        if self.receiver.has_changed().unwrap_or(false) {
            self.receiver.borrow_and_update().clone()
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn connection_state(&self) -> ConnectionState {
        ConnectionState::Open
    }

    fn last_error(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ServiceStatus, UserActivity};

    fn snapshot() -> MonitoringSnapshot {
        MonitoringSnapshot {
            timestamp: "2025-04-01T12:00:00Z".to_string(),
            services: Vec::new(),
            alerts: Vec::new(),
            activity: UserActivity {
                total_users_24h: 0,
                total_requests_24h: 0,
                avg_response_time: 0.0,
            },
            overall_health: ServiceStatus::Unknown,
        }
    }

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Nothing sent yet.
        assert!(source.poll().is_none());

        tx.send(Some(snapshot())).unwrap();
        assert!(source.poll().is_some());

        // No change since last poll.
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_channel_source_description() {
        let (_tx, source) = ChannelSource::create("embedded");
        assert_eq!(source.description(), "channel: embedded");
    }
}
