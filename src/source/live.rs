//! Live (WebSocket) data source.
//!
//! Receives monitoring snapshots pushed by the backend over a receive-only
//! WebSocket. A background task owns the connection and reconnects on
//! abnormal close with a bounded budget of fixed-delay attempts; when the
//! budget is spent the state becomes terminally [`ConnectionState::Closed`]
//! and the last good snapshot stays available via [`LiveSource::latest`].
//!
//! Malformed frames are fail-soft: logged, dropped, connection kept alive.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{ConnectionState, SnapshotSource};
use crate::data::MonitoringSnapshot;
use crate::error::TransportError;
use crate::settings::RetryPolicy;

/// Stream of text frames from one connection attempt.
///
/// The stream ending (or yielding an error) means the connection is gone and
/// the reconnect loop takes over.
pub type MessageStream = BoxStream<'static, Result<String, TransportError>>;

/// A dialer for the live channel.
///
/// Abstracting the transport behind this trait keeps the reconnect loop
/// testable without a server; production uses [`WsConnector`].
#[async_trait]
pub trait Connector: Send + Sync + std::fmt::Debug {
    async fn connect(&self) -> Result<MessageStream, TransportError>;
}

/// Production connector dialing `{WS_URL}/ws/monitoring`.
#[derive(Debug, Clone)]
pub struct WsConnector {
    endpoint: String,
}

impl WsConnector {
    /// `endpoint` is the full WebSocket URL, e.g. `ws://localhost:8000/ws/monitoring`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self) -> Result<MessageStream, TransportError> {
        use tokio_tungstenite::tungstenite::Message;

        let (ws, _response) = tokio_tungstenite::connect_async(self.endpoint.as_str())
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        // The channel is receive-only: the client never sends, so the write
        // half is simply dropped with the rest of the stream.
        let stream = ws
            .filter_map(|msg| async move {
                match msg {
                    Ok(Message::Text(text)) => Some(Ok(text.to_string())),
                    Ok(Message::Close(frame)) => Some(Err(TransportError::Closed(
                        frame.map(|f| f.reason.to_string()).unwrap_or_default(),
                    ))),
                    // Binary, ping and pong frames carry no snapshots.
                    Ok(_) => None,
                    Err(e) => Some(Err(TransportError::Closed(e.to_string()))),
                }
            })
            .boxed();

        Ok(stream)
    }
}

/// A data source fed by the live WebSocket channel.
///
/// # Example
///
/// ```no_run
/// use statuswatch::settings::RetryPolicy;
/// use statuswatch::source::{LiveSource, WsConnector};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let connector = Arc::new(WsConnector::new("ws://localhost:8000/ws/monitoring"));
/// let policy = RetryPolicy {
///     max_attempts: 10,
///     retry_delay: Duration::from_millis(3000),
/// };
/// let source = LiveSource::spawn(connector, policy, "ws://localhost:8000");
/// # });
/// ```
#[derive(Debug)]
pub struct LiveSource {
    receiver: mpsc::Receiver<MonitoringSnapshot>,
    description: String,
    state: watch::Receiver<ConnectionState>,
    latest: Arc<Mutex<Option<MonitoringSnapshot>>>,
    last_error: Arc<Mutex<Option<String>>>,
    task: JoinHandle<()>,
}

impl LiveSource {
    /// Spawn the connection-owning background task.
    ///
    /// `policy.max_attempts` bounds *consecutive* failed attempts; any
    /// successful connect resets the budget.
    pub fn spawn(connector: Arc<dyn Connector>, policy: RetryPolicy, description: &str) -> Self {
        let (tx, rx) = mpsc::channel(16);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let latest = Arc::new(Mutex::new(None));
        let last_error = Arc::new(Mutex::new(None));

        let latest_handle = latest.clone();
        let error_handle = last_error.clone();

        let task = tokio::spawn(async move {
            run_connection_loop(connector, policy, tx, state_tx, latest_handle, error_handle).await;
        });

        Self {
            receiver: rx,
            description: format!("live: {}", description),
            state: state_rx,
            latest,
            last_error,
            task,
        }
    }

    /// The most recent good snapshot, kept across disconnects.
    pub fn latest(&self) -> Option<MonitoringSnapshot> {
        self.latest.lock().unwrap().clone()
    }
}

impl Drop for LiveSource {
    fn drop(&mut self) {
        // Deterministic teardown: the connection task must not outlive the view.
        self.task.abort();
    }
}

impl SnapshotSource for LiveSource {
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

async fn run_connection_loop(
    connector: Arc<dyn Connector>,
    policy: RetryPolicy,
    tx: mpsc::Sender<MonitoringSnapshot>,
    state: watch::Sender<ConnectionState>,
    latest: Arc<Mutex<Option<MonitoringSnapshot>>>,
    last_error: Arc<Mutex<Option<String>>>,
) {
    let mut attempts_left = policy.max_attempts;

    loop {
        let _ = state.send(ConnectionState::Connecting);

        match connector.connect().await {
            Ok(mut stream) => {
                info!("live channel connected");
                let _ = state.send(ConnectionState::Open);
                *last_error.lock().unwrap() = None;
                attempts_left = policy.max_attempts;

                while let Some(item) = stream.next().await {
                    match item {
                        Ok(text) => match serde_json::from_str::<MonitoringSnapshot>(&text) {
                            Ok(snapshot) => {
                                debug!(
                                    services = snapshot.services.len(),
                                    alerts = snapshot.alerts.len(),
                                    "snapshot received"
                                );
                                *latest.lock().unwrap() = Some(snapshot.clone());
                                if tx.send(snapshot).await.is_err() {
                                    // Consumer gone; stop quietly.
                                    return;
                                }
                            }
                            Err(e) => {
                                // Bad frame: skip it, keep the connection.
                                warn!("dropping malformed push message: {}", e);
                                *last_error.lock().unwrap() =
                                    Some(format!("Parse error: {}", e));
                            }
                        },
                        Err(e) => {
                            warn!("live channel lost: {}", e);
                            *last_error.lock().unwrap() = Some(e.to_string());
                            break;
                        }
                    }
                }
                // Stream ended without an explicit error: treat as an
                // abnormal close and fall through to the retry path.
            }
            Err(e) => {
                warn!("live channel connect failed: {}", e);
                *last_error.lock().unwrap() = Some(e.to_string());
            }
        }

        if attempts_left == 0 {
            info!("reconnect budget exhausted, live channel closed");
            let _ = state.send(ConnectionState::Closed);
            return;
        }
        attempts_left -= 1;
        tokio::time::sleep(policy.retry_delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn sample_json() -> String {
        serde_json::json!({
            "timestamp": "2025-04-01T12:00:00Z",
            "services": [{
                "name": "main-api",
                "type": "heroku",
                "status": "healthy",
                "last_checked": "2025-04-01T11:59:30Z"
            }],
            "alerts": [],
            "activity": {
                "total_users_24h": 1,
                "total_requests_24h": 2,
                "avg_response_time": 0.1
            },
            "overall_health": "healthy"
        })
        .to_string()
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            retry_delay: Duration::from_millis(1),
        }
    }

    /// Always refuses the connection and counts attempts.
    #[derive(Debug)]
    struct RefusingConnector {
        attempts: Arc<AtomicU32>,
    }

    #[async_trait]
    impl Connector for RefusingConnector {
        async fn connect(&self) -> Result<MessageStream, TransportError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(TransportError::Connect("connection refused".to_string()))
        }
    }

    /// Yields the scripted frames, then keeps the connection open forever.
    #[derive(Debug)]
    struct ScriptedConnector {
        frames: Vec<String>,
    }

    #[async_trait]
    impl Connector for ScriptedConnector {
        async fn connect(&self) -> Result<MessageStream, TransportError> {
            let frames: Vec<Result<String, TransportError>> =
                self.frames.iter().cloned().map(Ok).collect();
            Ok(futures_util::stream::iter(frames)
                .chain(futures_util::stream::pending())
                .boxed())
        }
    }

    /// Succeeds once with the given frames, then refuses every reconnect.
    #[derive(Debug)]
    struct FlakyConnector {
        attempts: Arc<AtomicU32>,
        frames: Vec<String>,
    }

    #[async_trait]
    impl Connector for FlakyConnector {
        async fn connect(&self) -> Result<MessageStream, TransportError> {
            let n = self.attempts.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                let frames: Vec<Result<String, TransportError>> =
                    self.frames.iter().cloned().map(Ok).collect();
                Ok(futures_util::stream::iter(frames).boxed())
            } else {
                Err(TransportError::Connect("connection refused".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn test_receives_pushed_snapshots() {
        let connector = Arc::new(ScriptedConnector {
            frames: vec![sample_json()],
        });
        let mut source = LiveSource::spawn(connector, fast_policy(10), "test");

        tokio::time::sleep(Duration::from_millis(50)).await;

        let snapshot = source.poll().expect("snapshot should arrive");
        assert_eq!(snapshot.services.len(), 1);
        assert_eq!(source.connection_state(), ConnectionState::Open);
        assert!(source.latest().is_some());
    }

    #[tokio::test]
    async fn test_malformed_push_is_dropped_not_fatal() {
        let connector = Arc::new(ScriptedConnector {
            frames: vec![sample_json(), "not json".to_string()],
        });
        let mut source = LiveSource::spawn(connector, fast_policy(10), "test");

        tokio::time::sleep(Duration::from_millis(50)).await;

        // The good frame arrives; the bad one is skipped.
        assert!(source.poll().is_some());
        assert!(source.poll().is_none());

        // Connection survives the bad frame and the last good snapshot stands.
        assert_eq!(source.connection_state(), ConnectionState::Open);
        assert!(source.latest().is_some());
        assert!(source.last_error().unwrap().contains("Parse error"));
    }

    #[tokio::test]
    async fn test_reconnect_budget_exhaustion_is_terminal() {
        let attempts = Arc::new(AtomicU32::new(0));
        let connector = Arc::new(RefusingConnector {
            attempts: attempts.clone(),
        });
        let source = LiveSource::spawn(connector, fast_policy(10), "test");

        tokio::time::sleep(Duration::from_millis(200)).await;

        // Initial attempt plus 10 retries, then terminal.
        assert_eq!(attempts.load(Ordering::SeqCst), 11);
        assert_eq!(source.connection_state(), ConnectionState::Closed);

        // No further attempts once closed.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(attempts.load(Ordering::SeqCst), 11);
    }

    #[tokio::test]
    async fn test_last_snapshot_survives_terminal_close() {
        let attempts = Arc::new(AtomicU32::new(0));
        let connector = Arc::new(FlakyConnector {
            attempts,
            frames: vec![sample_json()],
        });
        let mut source = LiveSource::spawn(connector, fast_policy(2), "test");

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(source.connection_state(), ConnectionState::Closed);
        assert!(source.poll().is_some());
        // The getter still serves the last good snapshot after terminal close.
        assert!(source.latest().is_some());
    }

    #[tokio::test]
    async fn test_successful_connect_resets_budget() {
        // One good connect after two failures must reset the remaining
        // attempts; otherwise budgets would leak across sessions.
        #[derive(Debug)]
        struct Sequenced {
            attempts: Arc<AtomicU32>,
        }

        #[async_trait]
        impl Connector for Sequenced {
            async fn connect(&self) -> Result<MessageStream, TransportError> {
                let n = self.attempts.fetch_add(1, Ordering::SeqCst);
                if n == 2 {
                    // Third attempt succeeds, then the stream ends at once.
                    let frames = Vec::<Result<String, TransportError>>::new();
                    Ok(futures_util::stream::iter(frames).boxed())
                } else if n < 5 {
                    Err(TransportError::Connect("refused".to_string()))
                } else {
                    // Keep the final connection open so the test can observe it.
                    Ok(futures_util::stream::pending().boxed())
                }
            }
        }

        let attempts = Arc::new(AtomicU32::new(0));
        let source = LiveSource::spawn(
            Arc::new(Sequenced {
                attempts: attempts.clone(),
            }),
            fast_policy(3),
            "test",
        );

        tokio::time::sleep(Duration::from_millis(100)).await;

        // Without the reset after the success at attempt 3, budget 3 would
        // have gone terminal on attempt 4; instead the loop reaches the open
        // connection at attempt 6.
        assert_eq!(attempts.load(Ordering::SeqCst), 6);
        assert_eq!(source.connection_state(), ConnectionState::Open);
    }

    #[tokio::test]
    async fn test_description() {
        let connector = Arc::new(ScriptedConnector { frames: Vec::new() });
        let source = LiveSource::spawn(connector, fast_policy(1), "ws://localhost:8000");
        assert_eq!(source.description(), "live: ws://localhost:8000");
    }
}
