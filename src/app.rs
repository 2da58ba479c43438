//! Application state and navigation logic.
//!
//! `App` owns the snapshot source, the background controller, and the
//! current in-memory snapshot. The event loop calls [`App::tick`] to drain
//! both channels; everything else is synchronous state manipulation driven
//! by key events.
//!
//! Load lifecycle: `Initial -> Loading -> {Ready, Error}`. Once `Ready`, the
//! app stays `Ready` across live updates; if the live channel goes
//! terminally closed the data is kept on screen and merely flagged stale
//! ([`App::is_stale`]) instead of reverting to an error screen.

use std::collections::HashSet;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::debug;

use crate::controller::{Command, Controller, Outcome};
use crate::data::{
    health, merge, HistoryStats, MonitoringSnapshot, MonitoringStats, RatingStats, RatingTimeline,
    Service, ServiceHistory, ServiceStatus, ServicesRatings, SystemAlert,
};
use crate::source::{ConnectionState, SnapshotSource};
use crate::ui::Theme;

/// Rating aggregates are always requested over this window.
const RATINGS_PERIOD_DAYS: u32 = 30;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// All monitored services with status and response times.
    Services,
    /// System alerts and the resolution workflow.
    Alerts,
    /// Probe history for the selected service.
    History,
    /// User rating aggregates.
    Ratings,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Services => View::Alerts,
            View::Alerts => View::History,
            View::History => View::Ratings,
            View::Ratings => View::Services,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Services => View::Ratings,
            View::Alerts => View::Services,
            View::History => View::Alerts,
            View::Ratings => View::History,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Services => "Services",
            View::Alerts => "Alerts",
            View::History => "History",
            View::Ratings => "Ratings",
        }
    }
}

/// Load lifecycle of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing requested yet.
    Initial,
    /// First snapshot in flight.
    Loading,
    /// A snapshot is on screen (possibly stale, see [`App::is_stale`]).
    Ready,
    /// The first load failed and there is nothing to show.
    Error,
}

/// Key of an in-flight history request, used to discard stale responses.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HistoryKey {
    service: String,
    hours: u32,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data pipeline
    source: Box<dyn SnapshotSource>,
    /// True when `source` is the live push channel (affects status labels).
    pub live: bool,
    controller: Controller,
    outcomes: mpsc::UnboundedReceiver<Outcome>,

    phase: Phase,
    pub snapshot: Option<MonitoringSnapshot>,
    pub load_error: Option<String>,
    pub stats: Option<MonitoringStats>,

    // History view
    pub history: Option<ServiceHistory>,
    pub history_stats: Option<HistoryStats>,
    pub history_error: Option<String>,
    pub history_hours: u32,
    history_request: Option<HistoryKey>,

    // Ratings view
    pub rating_stats: Option<RatingStats>,
    pub rating_timeline: Option<RatingTimeline>,
    pub services_ratings: Option<ServicesRatings>,
    pub ratings_error: Option<String>,
    ratings_requested: bool,

    // Navigation state
    pub selected_service_index: usize,
    pub selected_alert_index: usize,

    // Search/filter (Services view)
    pub filter_text: String,
    pub filter_active: bool,

    // Resolution workflow
    operator: String,
    pending_resolves: HashSet<i64>,

    // UI
    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App over the given source and controller.
    pub fn new(
        source: Box<dyn SnapshotSource>,
        live: bool,
        controller: Controller,
        outcomes: mpsc::UnboundedReceiver<Outcome>,
        operator: String,
        history_hours: u32,
    ) -> Self {
        Self {
            running: true,
            current_view: View::Services,
            show_help: false,
            source,
            live,
            controller,
            outcomes,
            phase: Phase::Initial,
            snapshot: None,
            load_error: None,
            stats: None,
            history: None,
            history_stats: None,
            history_error: None,
            history_hours,
            history_request: None,
            rating_stats: None,
            rating_timeline: None,
            services_ratings: None,
            ratings_error: None,
            ratings_requested: false,
            selected_service_index: 0,
            selected_alert_index: 0,
            filter_text: String::new(),
            filter_active: false,
            operator,
            pending_resolves: HashSet::new(),
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Kick off the initial load. Always fetches fresh on mount; nothing is
    /// persisted across dashboard sessions.
    pub fn start(&mut self) {
        self.phase = Phase::Loading;
        self.controller.send(Command::Refresh);
        self.controller.send(Command::FetchStats);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Drain the snapshot source and the outcome channel.
    ///
    /// Returns true if any state changed (a redraw is worthwhile).
    pub fn tick(&mut self) -> bool {
        let mut changed = false;

        while let Some(snapshot) = self.source.poll() {
            self.apply_snapshot(snapshot);
            changed = true;
        }

        while let Ok(outcome) = self.outcomes.try_recv() {
            self.handle_outcome(outcome);
            changed = true;
        }

        changed
    }

    /// Replace the current snapshot with a newer arrival.
    fn apply_snapshot(&mut self, incoming: MonitoringSnapshot) {
        self.snapshot = Some(merge::merge(self.snapshot.as_ref(), incoming));
        self.phase = Phase::Ready;
        self.load_error = None;
        self.clamp_selection();
    }

    /// Apply one asynchronous result to the app state.
    pub fn handle_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Snapshot(snapshot) => self.apply_snapshot(snapshot),

            Outcome::SnapshotFailed(error) => {
                if self.snapshot.is_none() {
                    self.phase = Phase::Error;
                    self.load_error = Some(error);
                } else {
                    // Keep showing the data we have.
                    self.set_status_message(format!("Refresh failed: {}", error));
                }
            }

            Outcome::CheckTriggered => {
                self.set_status_message("Probe cycle triggered".to_string());
            }
            Outcome::CheckFailed(error) => {
                self.set_status_message(format!("Check-now failed: {}", error));
            }

            Outcome::AlertResolved { alert_id } => {
                // Local alerts are not patched here; the controller follows
                // up with a fresh snapshot carrying the backend's
                // resolved_at/resolved_by.
                self.pending_resolves.remove(&alert_id);
                self.set_status_message(format!("Alert #{} resolved", alert_id));
            }
            Outcome::ResolveFailed { alert_id, error } => {
                self.pending_resolves.remove(&alert_id);
                self.set_status_message(format!("Resolve failed: {}", error));
            }

            Outcome::History {
                service,
                hours,
                history,
            } => {
                let key = HistoryKey { service, hours };
                if self.history_request.as_ref() == Some(&key) {
                    self.history_stats = HistoryStats::compute(&history.data_points);
                    self.history = Some(history);
                    self.history_error = None;
                } else {
                    // Superseded by a newer selection; drop it.
                    debug!(service = %key.service, "discarding stale history response");
                }
            }
            Outcome::HistoryFailed {
                service,
                hours,
                error,
            } => {
                let key = HistoryKey { service, hours };
                if self.history_request.as_ref() == Some(&key) {
                    self.history_error = Some(error);
                }
            }

            Outcome::Stats(stats) => self.stats = Some(stats),
            Outcome::StatsFailed(error) => {
                self.set_status_message(format!("Stats fetch failed: {}", error));
            }

            Outcome::Ratings {
                stats,
                timeline,
                services,
            } => {
                self.rating_stats = Some(stats);
                self.rating_timeline = Some(timeline);
                self.services_ratings = Some(services);
                self.ratings_error = None;
            }
            Outcome::RatingsFailed(error) => self.ratings_error = Some(error),

            Outcome::RatingSubmitted => {
                self.set_status_message("Rating submitted".to_string());
            }
            Outcome::RatingSubmitFailed(error) => {
                self.set_status_message(format!("Rating submit failed: {}", error));
            }
        }
    }

    /// Current transport state of the snapshot source.
    pub fn connection_state(&self) -> ConnectionState {
        self.source.connection_state()
    }

    /// True when data is on screen but the live channel is terminally gone.
    ///
    /// Stale data stays visible; it is never cleared on disconnect.
    pub fn is_stale(&self) -> bool {
        self.phase == Phase::Ready && self.source.connection_state() == ConnectionState::Closed
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Most recent transport/parse error from the source, if any.
    pub fn source_error(&self) -> Option<String> {
        self.source.last_error()
    }

    /// Worst status across the current services, computed locally.
    ///
    /// Display trusts the server's `overall_health`; this exists to
    /// cross-check it (see [`App::health_mismatch`]).
    pub fn local_health(&self) -> ServiceStatus {
        self.snapshot
            .as_ref()
            .map(|s| health::aggregate(&s.services))
            .unwrap_or(ServiceStatus::Unknown)
    }

    /// True when the server-supplied overall health disagrees with the local
    /// aggregation, which would point at a backend aggregation bug.
    pub fn health_mismatch(&self) -> bool {
        match &self.snapshot {
            Some(s) => s.overall_health != self.local_health(),
            None => false,
        }
    }

    // --- Commands ---------------------------------------------------------

    /// Manually re-fetch the snapshot (the UI's Refresh key).
    pub fn refresh(&mut self) {
        if self.phase == Phase::Initial || self.phase == Phase::Error {
            self.phase = Phase::Loading;
        }
        self.controller.send(Command::Refresh);
    }

    /// Ask the backend for an immediate probe cycle.
    pub fn trigger_check(&mut self) {
        self.controller.send(Command::CheckNow);
        self.set_status_message("Requesting probe cycle...".to_string());
    }

    /// Resolve the selected alert as the configured operator.
    ///
    /// Duplicate invocations while a resolve is in flight are ignored;
    /// resolving an already-resolved alert is allowed and relies on the
    /// backend answering idempotently.
    pub fn resolve_selected_alert(&mut self) {
        let Some(alert) = self.selected_alert() else {
            return;
        };
        let alert_id = alert.id;

        if self.pending_resolves.contains(&alert_id) {
            self.set_status_message(format!("Alert #{} resolve already in flight", alert_id));
            return;
        }

        self.pending_resolves.insert(alert_id);
        self.controller.send(Command::ResolveAlert {
            alert_id,
            resolved_by: self.operator.clone(),
        });
        self.set_status_message(format!("Resolving alert #{}...", alert_id));
    }

    /// True while a resolve for this alert is in flight.
    pub fn is_resolve_pending(&self, alert_id: i64) -> bool {
        self.pending_resolves.contains(&alert_id)
    }

    /// Open the History view for the currently selected service.
    pub fn open_history_for_selected(&mut self) {
        let Some(name) = self.selected_service_name() else {
            return;
        };
        self.current_view = View::History;
        self.request_history(name);
    }

    /// Issue a history fetch and remember its key; any response for an older
    /// key is discarded when it arrives.
    pub fn request_history(&mut self, service: String) {
        let key = HistoryKey {
            service: service.clone(),
            hours: self.history_hours,
        };
        self.history = None;
        self.history_stats = None;
        self.history_error = None;
        self.history_request = Some(key);
        self.controller.send(Command::FetchHistory {
            service,
            hours: self.history_hours,
        });
    }

    /// The service whose history is currently shown or loading.
    pub fn history_service(&self) -> Option<&str> {
        self.history_request.as_ref().map(|k| k.service.as_str())
    }

    /// Request rating aggregates once, on first entry to the Ratings view.
    pub fn ensure_ratings_loaded(&mut self) {
        if !self.ratings_requested {
            self.ratings_requested = true;
            self.controller.send(Command::FetchRatings {
                days: RATINGS_PERIOD_DAYS,
            });
        }
    }

    // --- Navigation -------------------------------------------------------

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.set_view(self.current_view.next());
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.set_view(self.current_view.prev());
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        if view == View::Ratings {
            self.ensure_ratings_loaded();
        }
        if view == View::History && self.history_request.is_none() {
            if let Some(name) = self.selected_service_name() {
                self.request_history(name);
            }
        }
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        match self.current_view {
            View::Services => {
                let max = self.filtered_services().len().saturating_sub(1);
                self.selected_service_index = (self.selected_service_index + n).min(max);
            }
            View::Alerts => {
                let count = self.snapshot.as_ref().map_or(0, |s| s.alerts.len());
                let max = count.saturating_sub(1);
                self.selected_alert_index = (self.selected_alert_index + n).min(max);
            }
            View::History | View::Ratings => {}
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        match self.current_view {
            View::Services => {
                self.selected_service_index = self.selected_service_index.saturating_sub(n);
            }
            View::Alerts => {
                self.selected_alert_index = self.selected_alert_index.saturating_sub(n);
            }
            View::History | View::Ratings => {}
        }
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        match self.current_view {
            View::Services => self.selected_service_index = 0,
            View::Alerts => self.selected_alert_index = 0,
            View::History | View::Ratings => {}
        }
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        match self.current_view {
            View::Services => {
                self.selected_service_index = self.filtered_services().len().saturating_sub(1);
            }
            View::Alerts => {
                let count = self.snapshot.as_ref().map_or(0, |s| s.alerts.len());
                self.selected_alert_index = count.saturating_sub(1);
            }
            View::History | View::Ratings => {}
        }
    }

    fn clamp_selection(&mut self) {
        let service_count = self.filtered_services().len();
        if self.selected_service_index >= service_count {
            self.selected_service_index = service_count.saturating_sub(1);
        }
        let alert_count = self.snapshot.as_ref().map_or(0, |s| s.alerts.len());
        if self.selected_alert_index >= alert_count {
            self.selected_alert_index = alert_count.saturating_sub(1);
        }
    }

    // --- Selection accessors ---------------------------------------------

    /// Services matching the current filter, with their raw indices.
    pub fn filtered_services(&self) -> Vec<(usize, &Service)> {
        let Some(ref snapshot) = self.snapshot else {
            return Vec::new();
        };
        snapshot
            .services
            .iter()
            .enumerate()
            .filter(|(_, s)| self.matches_filter(&s.name))
            .collect()
    }

    /// Name of the currently selected (filtered) service.
    pub fn selected_service_name(&self) -> Option<String> {
        self.filtered_services()
            .get(self.selected_service_index)
            .map(|(_, s)| s.name.clone())
    }

    /// The currently selected alert, in backend order.
    pub fn selected_alert(&self) -> Option<&SystemAlert> {
        self.snapshot.as_ref()?.alerts.get(self.selected_alert_index)
    }

    // --- Filter -----------------------------------------------------------

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Check if a service name matches the current filter.
    pub fn matches_filter(&self, name: &str) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        name.to_lowercase().contains(&self.filter_text.to_lowercase())
    }

    // --- Status message ---------------------------------------------------

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("phase", &self.phase)
            .field("view", &self.current_view)
            .field("source", &self.source.description())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiClient;
    use crate::data::model::{AlertSeverity, ServiceKind, UserActivity};
    use crate::source::ChannelSource;
    use tokio::sync::watch;

    fn service(name: &str, status: ServiceStatus) -> Service {
        Service {
            name: name.to_string(),
            kind: ServiceKind::ProcessHost,
            status,
            response_time: Some(0.1),
            last_checked: "2025-04-01T12:00:00Z".to_string(),
            error: None,
            additional_info: None,
        }
    }

    fn alert(id: i64, resolved: bool) -> SystemAlert {
        SystemAlert {
            id,
            severity: AlertSeverity::Warning,
            service: "main-api".to_string(),
            message: "High latency".to_string(),
            created_at: "2025-04-01T11:00:00Z".to_string(),
            resolved: resolved.then_some(true),
            resolved_at: resolved.then(|| "2025-04-01T11:30:00Z".to_string()),
            resolved_by: resolved.then(|| "ops".to_string()),
        }
    }

    fn snapshot(services: Vec<Service>, alerts: Vec<SystemAlert>) -> MonitoringSnapshot {
        MonitoringSnapshot {
            timestamp: "2025-04-01T12:00:00Z".to_string(),
            services,
            alerts,
            activity: UserActivity {
                total_users_24h: 10,
                total_requests_24h: 100,
                avg_response_time: 0.2,
            },
            overall_health: ServiceStatus::Healthy,
        }
    }

    fn test_app() -> (App, watch::Sender<Option<MonitoringSnapshot>>) {
        let (tx, source) = ChannelSource::create("test");
        let client = ApiClient::builder().base_url("http://127.0.0.1:1").build();
        let (controller, outcomes) = Controller::spawn(client);
        let app = App::new(
            Box::new(source),
            false,
            controller,
            outcomes,
            "admin".to_string(),
            24,
        );
        (app, tx)
    }

    fn history(service: &str, hours: u32, n: usize) -> ServiceHistory {
        use crate::data::model::HistoryPoint;
        ServiceHistory {
            service_name: service.to_string(),
            period_hours: hours,
            data_points: (0..n)
                .map(|i| HistoryPoint {
                    timestamp: format!("2025-04-01T{:02}:00:00Z", i),
                    status: ServiceStatus::Healthy,
                    response_time: Some(0.1),
                    error: None,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_phase_transitions() {
        let (mut app, _tx) = test_app();
        assert_eq!(app.phase(), Phase::Initial);

        app.start();
        assert_eq!(app.phase(), Phase::Loading);

        // First load fails with nothing to show.
        app.handle_outcome(Outcome::SnapshotFailed("HTTP error! status: 500".to_string()));
        assert_eq!(app.phase(), Phase::Error);
        assert!(app.load_error.is_some());

        // A later snapshot recovers.
        app.handle_outcome(Outcome::Snapshot(snapshot(vec![], vec![])));
        assert_eq!(app.phase(), Phase::Ready);
        assert!(app.load_error.is_none());

        // A refresh failure with data on screen does not regress the phase.
        app.handle_outcome(Outcome::SnapshotFailed("HTTP error! status: 502".to_string()));
        assert_eq!(app.phase(), Phase::Ready);
        assert!(app.snapshot.is_some());
    }

    #[tokio::test]
    async fn test_snapshot_replacement_is_wholesale() {
        let (mut app, tx) = test_app();

        tx.send(Some(snapshot(
            vec![
                service("a", ServiceStatus::Healthy),
                service("b", ServiceStatus::Down),
            ],
            vec![],
        )))
        .unwrap();
        app.tick();
        assert_eq!(app.snapshot.as_ref().unwrap().services.len(), 2);

        tx.send(Some(snapshot(
            vec![service("c", ServiceStatus::Healthy)],
            vec![],
        )))
        .unwrap();
        app.tick();

        let services = &app.snapshot.as_ref().unwrap().services;
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].name, "c");
    }

    #[tokio::test]
    async fn test_resolve_of_already_resolved_alert_does_not_mutate_locally() {
        let (mut app, _tx) = test_app();
        app.handle_outcome(Outcome::Snapshot(snapshot(vec![], vec![alert(7, true)])));

        // Resolve the already-resolved alert twice; neither attempt may touch
        // the local record before a refresh arrives.
        app.current_view = View::Alerts;
        app.resolve_selected_alert();
        app.handle_outcome(Outcome::AlertResolved { alert_id: 7 });
        app.resolve_selected_alert();
        app.handle_outcome(Outcome::ResolveFailed {
            alert_id: 7,
            error: "HTTP error! status: 409".to_string(),
        });

        let stored = &app.snapshot.as_ref().unwrap().alerts[0];
        assert_eq!(stored.resolved, Some(true));
        assert_eq!(stored.resolved_at.as_deref(), Some("2025-04-01T11:30:00Z"));
        assert_eq!(stored.resolved_by.as_deref(), Some("ops"));
    }

    #[tokio::test]
    async fn test_resolve_failure_leaves_alert_unresolved() {
        let (mut app, _tx) = test_app();
        app.handle_outcome(Outcome::Snapshot(snapshot(vec![], vec![alert(42, false)])));

        app.current_view = View::Alerts;
        app.resolve_selected_alert();
        assert!(app.is_resolve_pending(42));

        app.handle_outcome(Outcome::ResolveFailed {
            alert_id: 42,
            error: "HTTP error! status: 500".to_string(),
        });

        assert!(!app.is_resolve_pending(42));
        let stored = &app.snapshot.as_ref().unwrap().alerts[0];
        assert!(!stored.is_resolved());
    }

    #[tokio::test]
    async fn test_resolve_success_reconciles_from_refreshed_snapshot() {
        let (mut app, _tx) = test_app();
        app.handle_outcome(Outcome::Snapshot(snapshot(vec![], vec![alert(42, false)])));

        app.current_view = View::Alerts;
        app.resolve_selected_alert();
        app.handle_outcome(Outcome::AlertResolved { alert_id: 42 });

        // Still unresolved locally until the refreshed snapshot lands.
        assert!(!app.snapshot.as_ref().unwrap().alerts[0].is_resolved());

        let mut resolved = alert(42, false);
        resolved.resolved = Some(true);
        resolved.resolved_at = Some("2025-04-01T12:01:00Z".to_string());
        resolved.resolved_by = Some("admin".to_string());
        app.handle_outcome(Outcome::Snapshot(snapshot(vec![], vec![resolved])));

        let stored = &app.snapshot.as_ref().unwrap().alerts[0];
        assert!(stored.is_resolved());
        assert_eq!(stored.resolved_by.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_stale_history_response_is_discarded() {
        let (mut app, _tx) = test_app();
        app.handle_outcome(Outcome::Snapshot(snapshot(
            vec![
                service("a", ServiceStatus::Healthy),
                service("b", ServiceStatus::Healthy),
            ],
            vec![],
        )));

        // Request history for "a", then supersede it with "b".
        app.request_history("a".to_string());
        app.request_history("b".to_string());

        // The late response for "a" arrives first and must be dropped.
        app.handle_outcome(Outcome::History {
            service: "a".to_string(),
            hours: 24,
            history: history("a", 24, 3),
        });
        assert!(app.history.is_none());

        app.handle_outcome(Outcome::History {
            service: "b".to_string(),
            hours: 24,
            history: history("b", 24, 5),
        });
        let shown = app.history.as_ref().unwrap();
        assert_eq!(shown.service_name, "b");
        assert_eq!(shown.data_points.len(), 5);

        // Even later responses for "a" cannot overwrite "b".
        app.handle_outcome(Outcome::History {
            service: "a".to_string(),
            hours: 24,
            history: history("a", 24, 3),
        });
        assert_eq!(app.history.as_ref().unwrap().service_name, "b");
    }

    #[tokio::test]
    async fn test_stale_flag_requires_terminal_close() {
        let (mut app, _tx) = test_app();
        app.handle_outcome(Outcome::Snapshot(snapshot(vec![], vec![])));

        // ChannelSource reports Open, so data is live, not stale.
        assert_eq!(app.phase(), Phase::Ready);
        assert!(!app.is_stale());
    }

    #[tokio::test]
    async fn test_health_mismatch_detection() {
        let (mut app, _tx) = test_app();

        // Server claims healthy while a service is down.
        let mut snap = snapshot(vec![service("a", ServiceStatus::Down)], vec![]);
        snap.overall_health = ServiceStatus::Healthy;
        app.handle_outcome(Outcome::Snapshot(snap));

        assert_eq!(app.local_health(), ServiceStatus::Down);
        assert!(app.health_mismatch());
    }

    #[tokio::test]
    async fn test_filter_narrows_services() {
        let (mut app, _tx) = test_app();
        app.handle_outcome(Outcome::Snapshot(snapshot(
            vec![
                service("main-api", ServiceStatus::Healthy),
                service("frontend", ServiceStatus::Healthy),
                service("api-gateway", ServiceStatus::Healthy),
            ],
            vec![],
        )));

        app.filter_text = "api".to_string();
        let filtered = app.filtered_services();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|(_, s)| s.name.contains("api")));
    }

    #[tokio::test]
    async fn test_selection_clamped_on_shrinking_snapshot() {
        let (mut app, _tx) = test_app();
        app.handle_outcome(Outcome::Snapshot(snapshot(
            (0..5)
                .map(|i| service(&format!("s{i}"), ServiceStatus::Healthy))
                .collect(),
            vec![],
        )));
        app.select_last();
        assert_eq!(app.selected_service_index, 4);

        app.handle_outcome(Outcome::Snapshot(snapshot(
            vec![service("s0", ServiceStatus::Healthy)],
            vec![],
        )));
        assert_eq!(app.selected_service_index, 0);
    }
}
