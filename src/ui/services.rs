//! Services view rendering.
//!
//! Displays a table of all monitored services with kind, status, response
//! time and last-check time, plus a footer strip with backend-wide counters
//! when stats have loaded.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::{Service, ServiceKind};

/// Render the Services view.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Min(4),    // Table
        Constraint::Length(1), // Stats strip
    ])
    .split(area);

    render_table(frame, app, chunks[0]);
    render_stats_strip(frame, app, chunks[1]);
}

fn render_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let services = app.filtered_services();
    let total = app.snapshot.as_ref().map_or(0, |s| s.services.len());

    let header = Row::new(vec![
        Cell::from("Service"),
        Cell::from("Kind"),
        Cell::from("Response"),
        Cell::from("Last checked"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = services
        .iter()
        .map(|(_, service)| {
            let status_style = app.theme.status_style(service.status);

            let response = service
                .response_time
                .map(|secs| format!("{:.0}ms", secs * 1000.0))
                .unwrap_or_else(|| "-".to_string());

            let label = match &service.error {
                Some(err) => format!("{} ({})", service.status.label(), truncate(err, 24)),
                None => service.status.label().to_string(),
            };

            Row::new(vec![
                Cell::from(service.name.clone()),
                Cell::from(kind_label(service)),
                Cell::from(response),
                Cell::from(service.last_checked.clone()),
                Cell::from(label).style(status_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),  // Service name
        Constraint::Fill(1),  // Kind
        Constraint::Min(9),   // Response
        Constraint::Fill(2),  // Last checked
        Constraint::Fill(2),  // Status
    ];

    let selected = app.selected_service_index.min(services.len().saturating_sub(1));

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let position_info = if !services.is_empty() {
        format!(" [{}/{}]", selected + 1, services.len())
    } else {
        String::new()
    };

    let title = format!(" Services ({}/{}){}{} ", services.len(), total, filter_info, position_info);

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_stats_strip(frame: &mut Frame, app: &App, area: Rect) {
    let text = match &app.stats {
        Some(stats) => format!(
            " {} services monitored | {} checks | {} alerts ({} active) | uptime {:.2}%",
            stats.monitored_services,
            stats.total_health_checks,
            stats.total_alerts,
            stats.active_alerts,
            stats.uptime_percentage,
        ),
        None => String::new(),
    };

    let paragraph = Paragraph::new(text).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

fn kind_label(service: &Service) -> &'static str {
    match service.kind {
        ServiceKind::Deployment => "deploy",
        ServiceKind::ProcessHost => "host",
        ServiceKind::Credential => "cred",
        ServiceKind::Database => "db",
        ServiceKind::Other => "other",
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
