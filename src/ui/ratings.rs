//! Ratings view rendering.
//!
//! Shows the 30-day rating aggregates: per-category averages, NPS, the
//! per-service breakdown, and recent free-text feedback.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;

/// Render the Ratings view.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Ratings (30d) ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(ref err) = app.ratings_error {
        let msg = Paragraph::new(format!("Error loading ratings: {}", err))
            .style(Style::default().fg(app.theme.critical));
        frame.render_widget(msg, inner);
        return;
    }

    let Some(ref stats) = app.rating_stats else {
        let loading =
            Paragraph::new("Loading ratings...").style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(loading, inner);
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(4), // Summary + category averages
        Constraint::Min(4),    // Per-service table
        Constraint::Length(6), // Recent feedback
    ])
    .split(inner);

    let averages = &stats.averages;
    let summary = vec![
        Line::from(vec![
            Span::styled(
                format!(" {:.1} ", averages.overall),
                Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "overall from {} ratings | NPS {:.0}",
                stats.total_ratings, stats.nps
            )),
        ]),
        Line::from(format!(
            " clarity {:.1} | useful {:.1} | accuracy {:.1} | usability {:.1}",
            averages.clarity, averages.usefulness, averages.accuracy, averages.usability
        )),
        Line::from(format!(
            " speed {:.1} | design {:.1} | recommend {:.1} | fair price ${:.0}",
            averages.speed, averages.design, averages.recommend, averages.price
        )),
    ];
    frame.render_widget(Paragraph::new(summary), chunks[0]);

    render_services_table(frame, app, chunks[1]);
    render_feedback(frame, app, chunks[2]);
}

fn render_services_table(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref ratings) = app.services_ratings else {
        return;
    };

    let header = Row::new(vec![
        Cell::from("Service"),
        Cell::from("Ratings"),
        Cell::from("Average"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = ratings
        .services
        .iter()
        .map(|s| {
            Row::new(vec![
                Cell::from(s.service_name.clone()),
                Cell::from(format!("{}", s.total_ratings)),
                Cell::from(format!("{:.2}", s.avg_rating)),
            ])
        })
        .collect();

    let widths = [Constraint::Fill(3), Constraint::Min(8), Constraint::Min(8)];

    let table = Table::new(rows, widths).header(header);
    frame.render_widget(table, area);
}

fn render_feedback(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref stats) = app.rating_stats else {
        return;
    };

    let mut lines = vec![Line::from(Span::styled(
        "Recent feedback",
        app.theme.header,
    ))];
    for entry in stats.recent_feedback.iter().take(area.height.saturating_sub(1) as usize) {
        let service = entry.service_name.as_deref().unwrap_or("-");
        lines.push(Line::from(format!(
            " [{:.0}/5] {} - {}",
            entry.overall, service, entry.feedback
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);
}
