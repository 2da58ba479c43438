//! Alerts view rendering.
//!
//! Displays the alert list in backend order with severity, age, and
//! resolution state. The selected unresolved alert can be resolved with the
//! `R` key; a resolve in flight is marked so it is not retried blindly.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;

/// Render the Alerts view.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let alerts = app.snapshot.as_ref().map(|s| s.alerts.clone()).unwrap_or_default();

    let header = Row::new(vec![
        Cell::from("Id"),
        Cell::from("Sev"),
        Cell::from("Service"),
        Cell::from("Message"),
        Cell::from("Created"),
        Cell::from("Resolution"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = alerts
        .iter()
        .map(|alert| {
            let severity_style = app.theme.severity_style(alert.severity);

            let resolution = if alert.is_resolved() {
                format!(
                    "resolved by {}",
                    alert.resolved_by.as_deref().unwrap_or("?")
                )
            } else if app.is_resolve_pending(alert.id) {
                "resolving...".to_string()
            } else {
                "open".to_string()
            };

            let resolution_style = if alert.is_resolved() {
                Style::default().fg(app.theme.healthy)
            } else if app.is_resolve_pending(alert.id) {
                Style::default().fg(app.theme.highlight)
            } else {
                Style::default().fg(app.theme.warning)
            };

            let row_style = if alert.is_resolved() {
                Style::default().add_modifier(Modifier::DIM)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("#{}", alert.id)),
                Cell::from(alert.severity.label()).style(severity_style),
                Cell::from(alert.service.clone()),
                Cell::from(alert.message.clone()),
                Cell::from(alert.created_at.clone()),
                Cell::from(resolution).style(resolution_style),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Min(6),  // Id
        Constraint::Min(5),  // Severity
        Constraint::Fill(1), // Service
        Constraint::Fill(3), // Message
        Constraint::Fill(1), // Created
        Constraint::Fill(1), // Resolution
    ];

    let open_count = alerts.iter().filter(|a| !a.is_resolved()).count();
    let title = format!(" Alerts ({} open / {} total) [R:resolve] ", open_count, alerts.len());

    let selected = app.selected_alert_index.min(alerts.len().saturating_sub(1));

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
    state.select(if alerts.is_empty() { None } else { Some(selected) });

    frame.render_stateful_widget(table, area, &mut state);
}
