//! Fixed-interval polling fallback.
//!
//! When the live channel is unavailable or disabled, a background task
//! re-fetches the overview on a fixed cadence (policy default 30 s) and
//! feeds the same non-blocking `poll()` interface as the live source. The
//! timer dies with the source: dropping a `PollSource` aborts the task, so
//! no background work leaks past view teardown.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{ConnectionState, SnapshotSource};
use crate::client::ApiClient;
use crate::data::MonitoringSnapshot;

/// A data source that periodically re-fetches the monitoring overview.
#[derive(Debug)]
pub struct PollSource {
    receiver: mpsc::Receiver<MonitoringSnapshot>,
    description: String,
    state: watch::Receiver<ConnectionState>,
    last_error: Arc<Mutex<Option<String>>>,
    task: JoinHandle<()>,
}

impl PollSource {
    /// Spawn the polling task. The first fetch happens immediately, then
    /// every `interval`.
    pub fn spawn(client: ApiClient, interval: Duration, description: &str) -> Self {
        let (tx, rx) = mpsc::channel(16);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                match client.fetch_overview().await {
                    Ok(snapshot) => {
                        debug!(services = snapshot.services.len(), "poll fetch ok");
                        let _ = state_tx.send(ConnectionState::Open);
                        *error_handle.lock().unwrap() = None;
                        if tx.send(snapshot).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        // Keep polling; a single failed cycle is not terminal.
                        warn!("poll fetch failed: {}", e);
                        *error_handle.lock().unwrap() = Some(e.to_string());
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("poll: {}", description),
            state: state_rx,
            last_error,
            task,
        }
    }
}

impl Drop for PollSource {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl SnapshotSource for PollSource {
    fn poll(&mut self) -> Option<MonitoringSnapshot> {
        match self.receiver.try_recv() {
            Ok(snapshot) => Some(snapshot),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => None,
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn connection_state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }
}
