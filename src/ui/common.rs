//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, Phase, View};
use crate::data::ServiceStatus;
use crate::source::ConnectionState;

/// Render the header bar with overall system health.
///
/// Displays: overall status, per-status service counts, active alert count,
/// 24h activity, connection indicator.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref snapshot) = app.snapshot else {
        let line = Line::from(vec![
            Span::styled(" STATUSWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(match app.phase() {
                Phase::Loading => "| Loading...",
                Phase::Error => "| Load failed",
                _ => "|",
            }),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    // Count services by status
    let mut healthy = 0;
    let mut degraded = 0;
    let mut down = 0;
    let mut unknown = 0;

    for service in &snapshot.services {
        match service.status {
            ServiceStatus::Healthy => healthy += 1,
            ServiceStatus::Degraded => degraded += 1,
            ServiceStatus::Down => down += 1,
            ServiceStatus::Unknown => unknown += 1,
        }
    }

    let active_alerts = snapshot.alerts.iter().filter(|a| !a.is_resolved()).count();

    let mut spans = vec![
        Span::styled(" ● ", app.theme.status_style(snapshot.overall_health)),
        Span::styled("STATUSWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            snapshot.overall_health.label(),
            app.theme.status_style(snapshot.overall_health),
        ),
    ];

    if app.health_mismatch() {
        // Server and local aggregation disagree; surface it quietly.
        spans.push(Span::styled(
            format!(" (local: {})", app.local_health().label()),
            Style::default().fg(app.theme.warning),
        ));
    }

    spans.extend([
        Span::raw(" │ "),
        Span::styled(format!("{}", healthy), Style::default().fg(app.theme.healthy)),
        Span::raw(" up "),
        Span::styled(format!("{}", degraded), Style::default().fg(app.theme.warning)),
        Span::raw(" deg "),
        Span::styled(
            format!("{}", down),
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" down "),
        Span::styled(format!("{}", unknown), Style::default().fg(app.theme.muted)),
        Span::raw(" unk │ "),
        Span::styled(
            format!("{} alerts", active_alerts),
            if active_alerts > 0 {
                Style::default().fg(app.theme.warning)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            },
        ),
        Span::raw(" │ "),
        Span::raw(format!(
            "{} users {} reqs 24h",
            snapshot.activity.total_users_24h, snapshot.activity.total_requests_24h
        )),
        Span::raw(" │ "),
        connection_span(app),
    ]);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// The connection indicator: LIVE / CONNECTING / STALE, or POLL when the
/// WebSocket channel is disabled.
fn connection_span(app: &App) -> Span<'static> {
    match (app.live, app.connection_state()) {
        (true, ConnectionState::Open) => {
            Span::styled("LIVE", Style::default().fg(app.theme.healthy))
        }
        (true, ConnectionState::Connecting) => {
            Span::styled("CONNECTING", Style::default().fg(app.theme.warning))
        }
        (true, ConnectionState::Closed) => Span::styled(
            "STALE",
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        ),
        (false, ConnectionState::Closed) => {
            Span::styled("STOPPED", Style::default().fg(app.theme.critical))
        }
        (false, _) => Span::styled("POLL", Style::default().fg(app.theme.muted)),
    }
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Services "),
        Line::from(" 2:Alerts "),
        Line::from(" 3:History "),
        Line::from(" 4:Ratings "),
    ];

    let selected = match app.current_view {
        View::Services => 0,
        View::Alerts => 1,
        View::History => 2,
        View::Ratings => 3,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: snapshot age, data source, available controls. Also displays
/// temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Temporary status message takes precedence
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref snapshot) = app.snapshot {
        let controls = match app.current_view {
            View::Services => {
                if app.filter_active {
                    "Type to search | Enter:apply Esc:cancel"
                } else {
                    "/:search Enter:history r:refresh p:probe ?:help q:quit"
                }
            }
            View::Alerts => "R:resolve r:refresh Tab:switch ?:help q:quit",
            View::History => "Esc:back r:refresh Tab:switch ?:help q:quit",
            View::Ratings => "Tab:switch r:refresh ?:help q:quit",
        };

        let staleness = if app.is_stale() {
            " | NOT LIVE (showing last snapshot)"
        } else {
            ""
        };

        format!(
            " {} | as of {}{} | {}",
            app.source_description(),
            snapshot.timestamp,
            staleness,
            controls,
        )
    } else if let Some(ref err) = app.load_error {
        format!(" Error: {} | r:retry q:quit", err)
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  1-4         Jump to view"),
        Line::from("  Enter       Service history"),
        Line::from("  Esc         Back to services"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Actions",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Refresh snapshot"),
        Line::from("  p         Trigger probe cycle"),
        Line::from("  R         Resolve selected alert"),
        Line::from("  /         Filter services"),
        Line::from("  c         Clear filter"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ?         Toggle this help"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
