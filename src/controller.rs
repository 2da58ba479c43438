//! Background command runner.
//!
//! The TUI event loop is synchronous; every network operation it triggers is
//! handed to the controller as a [`Command`] and comes back as an
//! [`Outcome`] on a channel the app drains each tick. Commands run on their
//! own tasks, so a slow history fetch never delays an alert resolve; the app
//! copes with out-of-order completion (that is what its stale-request guard
//! is for).

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::data::{
    MonitoringSnapshot, MonitoringStats, RatingStats, RatingSubmission, RatingTimeline,
    ServiceHistory, ServicesRatings,
};

/// A request from the dashboard to the backend.
#[derive(Debug, Clone)]
pub enum Command {
    /// Fetch a fresh overview snapshot.
    Refresh,
    /// Ask the backend to run a probe cycle now.
    CheckNow,
    /// Resolve an alert, then refresh the snapshot from the backend.
    ResolveAlert { alert_id: i64, resolved_by: String },
    /// Fetch probe history for one service.
    FetchHistory { service: String, hours: u32 },
    /// Fetch backend-wide monitoring counters.
    FetchStats,
    /// Fetch rating aggregates (stats, timeline, per-service) for a period.
    FetchRatings { days: u32 },
    /// Submit a user rating.
    SubmitRating(Box<RatingSubmission>),
}

/// The result of a [`Command`], delivered asynchronously.
#[derive(Debug)]
pub enum Outcome {
    Snapshot(MonitoringSnapshot),
    SnapshotFailed(String),
    CheckTriggered,
    CheckFailed(String),
    AlertResolved { alert_id: i64 },
    ResolveFailed { alert_id: i64, error: String },
    History {
        service: String,
        hours: u32,
        history: ServiceHistory,
    },
    HistoryFailed {
        service: String,
        hours: u32,
        error: String,
    },
    Stats(MonitoringStats),
    StatsFailed(String),
    Ratings {
        stats: RatingStats,
        timeline: RatingTimeline,
        services: ServicesRatings,
    },
    RatingsFailed(String),
    RatingSubmitted,
    RatingSubmitFailed(String),
}

/// Owns the [`ApiClient`] and executes commands in the background.
#[derive(Debug)]
pub struct Controller {
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl Controller {
    /// Spawn the controller. Returns the handle and the outcome receiver the
    /// app should drain every tick.
    pub fn spawn(client: ApiClient) -> (Self, mpsc::UnboundedReceiver<Outcome>) {
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Command>();
        let (out_tx, out_rx) = mpsc::unbounded_channel::<Outcome>();

        let task = tokio::spawn(async move {
            while let Some(command) = cmd_rx.recv().await {
                debug!(?command, "dispatching");
                let client = client.clone();
                let out = out_tx.clone();
                // Each command runs on its own task; completions arrive in
                // whatever order the backend answers.
                tokio::spawn(async move {
                    run_command(client, command, out).await;
                });
            }
        });

        (
            Self {
                commands: cmd_tx,
                task,
            },
            out_rx,
        )
    }

    /// Enqueue a command. Silently a no-op after shutdown.
    pub fn send(&self, command: Command) {
        let _ = self.commands.send(command);
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_command(client: ApiClient, command: Command, out: mpsc::UnboundedSender<Outcome>) {
    match command {
        Command::Refresh => {
            let outcome = match client.fetch_overview().await {
                Ok(snapshot) => Outcome::Snapshot(snapshot),
                Err(e) => Outcome::SnapshotFailed(e.to_string()),
            };
            let _ = out.send(outcome);
        }

        Command::CheckNow => {
            let outcome = match client.trigger_check().await {
                Ok(()) => Outcome::CheckTriggered,
                Err(e) => Outcome::CheckFailed(e.to_string()),
            };
            let _ = out.send(outcome);
        }

        Command::ResolveAlert {
            alert_id,
            resolved_by,
        } => {
            match client.resolve_alert(alert_id, &resolved_by).await {
                Ok(()) => {
                    info!(alert_id, resolved_by = %resolved_by, "alert resolved");
                    let _ = out.send(Outcome::AlertResolved { alert_id });

                    // The backend owns resolved_at and may have touched other
                    // alerts; reconcile from a fresh snapshot instead of
                    // patching locally.
                    let followup = match client.fetch_overview().await {
                        Ok(snapshot) => Outcome::Snapshot(snapshot),
                        Err(e) => Outcome::SnapshotFailed(e.to_string()),
                    };
                    let _ = out.send(followup);
                }
                Err(e) => {
                    warn!(alert_id, "resolve failed: {}", e);
                    let _ = out.send(Outcome::ResolveFailed {
                        alert_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        Command::FetchHistory { service, hours } => {
            let outcome = match client.fetch_service_history(&service, hours).await {
                Ok(history) => Outcome::History {
                    service,
                    hours,
                    history,
                },
                Err(e) => Outcome::HistoryFailed {
                    service,
                    hours,
                    error: e.to_string(),
                },
            };
            let _ = out.send(outcome);
        }

        Command::FetchStats => {
            let outcome = match client.fetch_stats().await {
                Ok(stats) => Outcome::Stats(stats),
                Err(e) => Outcome::StatsFailed(e.to_string()),
            };
            let _ = out.send(outcome);
        }

        Command::FetchRatings { days } => {
            let (stats, timeline, services) = tokio::join!(
                client.fetch_rating_stats(None, days),
                client.fetch_rating_timeline(None, days),
                client.fetch_services_ratings(days),
            );

            let outcome = match (stats, timeline, services) {
                (Ok(stats), Ok(timeline), Ok(services)) => Outcome::Ratings {
                    stats,
                    timeline,
                    services,
                },
                (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                    Outcome::RatingsFailed(e.to_string())
                }
            };
            let _ = out.send(outcome);
        }

        Command::SubmitRating(submission) => {
            let outcome = match client.submit_rating(&submission).await {
                Ok(()) => Outcome::RatingSubmitted,
                Err(e) => Outcome::RatingSubmitFailed(e.to_string()),
            };
            let _ = out.send(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn unreachable_controller() -> (Controller, mpsc::UnboundedReceiver<Outcome>) {
        let client = ApiClient::builder().base_url("http://127.0.0.1:1").build();
        Controller::spawn(client)
    }

    #[tokio::test]
    async fn test_refresh_failure_yields_failed_outcome() {
        let (controller, mut outcomes) = unreachable_controller();
        controller.send(Command::Refresh);

        let outcome = tokio::time::timeout(Duration::from_secs(5), outcomes.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(outcome, Outcome::SnapshotFailed(_)));
    }

    #[tokio::test]
    async fn test_empty_history_guard_short_circuits() {
        let (controller, mut outcomes) = unreachable_controller();
        controller.send(Command::FetchHistory {
            service: String::new(),
            hours: 24,
        });

        // The guard answers without touching the (unreachable) network.
        let outcome = tokio::time::timeout(Duration::from_secs(5), outcomes.recv())
            .await
            .unwrap()
            .unwrap();
        match outcome {
            Outcome::History {
                service,
                hours,
                history,
            } => {
                assert_eq!(service, "");
                assert_eq!(hours, 24);
                assert!(history.data_points.is_empty());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rating_submission_failure_surfaces() {
        use crate::data::RatingSubmission;

        let (controller, mut outcomes) = unreachable_controller();
        controller.send(Command::SubmitRating(Box::new(RatingSubmission {
            overall: 4,
            feedback: "solid".to_string(),
            session_id: "s1".to_string(),
            ..Default::default()
        })));

        let outcome = tokio::time::timeout(Duration::from_secs(5), outcomes.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(outcome, Outcome::RatingSubmitFailed(_)));
    }

    #[tokio::test]
    async fn test_resolve_failure_carries_alert_id() {
        let (controller, mut outcomes) = unreachable_controller();
        controller.send(Command::ResolveAlert {
            alert_id: 42,
            resolved_by: "admin".to_string(),
        });

        let outcome = tokio::time::timeout(Duration::from_secs(5), outcomes.recv())
            .await
            .unwrap()
            .unwrap();
        match outcome {
            Outcome::ResolveFailed { alert_id, .. } => assert_eq!(alert_id, 42),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
