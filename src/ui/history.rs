//! History view rendering.
//!
//! Shows the probe history of the selected service: a response-time
//! sparkline over the fetched window, the derived avg/min/max strip, and the
//! most recent samples in a table.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table},
    Frame,
};

use crate::app::App;

/// Render the History view.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let title = match app.history_service() {
        Some(name) => format!(" {} - last {}h ", name, app.history_hours),
        None => " History ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.history_service().is_none() {
        let hint = Paragraph::new("Select a service and press Enter to load its history")
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(hint, inner);
        return;
    }

    if let Some(ref err) = app.history_error {
        let msg = Paragraph::new(format!("Error loading history: {}", err))
            .style(Style::default().fg(app.theme.critical));
        frame.render_widget(msg, inner);
        return;
    }

    let Some(ref history) = app.history else {
        let loading =
            Paragraph::new("Loading history...").style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(loading, inner);
        return;
    };

    if history.data_points.is_empty() {
        let empty = Paragraph::new("No history data available")
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(empty, inner);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(6), // Sparkline
        Constraint::Length(1), // Stats strip
        Constraint::Min(3),    // Recent samples
    ])
    .split(inner);

    render_sparkline(frame, app, chunks[0]);
    render_stats_strip(frame, app, chunks[1]);
    render_samples(frame, app, chunks[2]);
}

fn render_sparkline(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref history) = app.history else {
        return;
    };

    // Missing samples render as zero-height bars, matching how the stats
    // treat them.
    let series: Vec<u64> = history
        .data_points
        .iter()
        .map(|p| (p.response_time.unwrap_or(0.0) * 1000.0) as u64)
        .collect();

    // Show the most recent window that fits.
    let width = area.width as usize;
    let start = series.len().saturating_sub(width);

    let sparkline = Sparkline::default()
        .block(Block::default().title("Response time (ms)"))
        .data(&series[start..])
        .style(Style::default().fg(app.theme.highlight));

    frame.render_widget(sparkline, area);
}

fn render_stats_strip(frame: &mut Frame, app: &App, area: Rect) {
    let text = match app.history_stats {
        Some(stats) => {
            let min = stats
                .min_ms
                .map(|ms| format!("{:.0}ms", ms))
                .unwrap_or_else(|| "-".to_string());
            format!(
                " avg {:.0}ms | min {} | max {:.0}ms | {} samples",
                stats.avg_ms,
                min,
                stats.max_ms,
                app.history.as_ref().map_or(0, |h| h.data_points.len()),
            )
        }
        None => String::new(),
    };

    let paragraph = Paragraph::new(text).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

fn render_samples(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref history) = app.history else {
        return;
    };

    let header = Row::new(vec![
        Cell::from("Timestamp"),
        Cell::from("Status"),
        Cell::from("Response"),
        Cell::from("Error"),
    ])
    .height(1)
    .style(app.theme.header);

    // Newest first; the table holds however many rows fit.
    let rows: Vec<Row> = history
        .data_points
        .iter()
        .rev()
        .map(|point| {
            let response = point
                .response_time
                .map(|secs| format!("{:.0}ms", secs * 1000.0))
                .unwrap_or_else(|| "-".to_string());

            Row::new(vec![
                Cell::from(point.timestamp.clone()),
                Cell::from(point.status.label()).style(app.theme.status_style(point.status)),
                Cell::from(response),
                Cell::from(point.error.clone().unwrap_or_default()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Min(9),
        Constraint::Min(9),
        Constraint::Fill(2),
    ];

    let table = Table::new(rows, widths).header(header);
    frame.render_widget(table, area);
}
