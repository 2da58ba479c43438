// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing_subscriber::EnvFilter;

mod app;
mod client;
mod controller;
mod data;
mod error;
mod events;
mod settings;
mod source;
mod ui;

use app::{App, View};
use client::ApiClient;
use controller::Controller;
use settings::Settings;
use source::{LiveSource, PollSource, SnapshotSource, WsConnector};
use ui::Theme;

#[derive(Parser, Debug)]
#[command(name = "statuswatch")]
#[command(about = "Live TUI dashboard for the platform monitoring API")]
struct Args {
    /// REST base URL (overrides API_BASE_URL)
    #[arg(short, long)]
    url: Option<String>,

    /// WebSocket base URL (overrides WS_URL)
    #[arg(short, long)]
    ws_url: Option<String>,

    /// Use interval polling instead of the live WebSocket channel
    #[arg(short, long)]
    poll: bool,

    /// Polling interval in seconds (used with --poll)
    #[arg(long, requires = "poll")]
    poll_interval: Option<u64>,

    /// Identity recorded as resolved_by when resolving alerts
    #[arg(short, long)]
    operator: Option<String>,

    /// History window in hours
    #[arg(long)]
    hours: Option<u32>,

    /// Color theme: light, dark, or auto
    #[arg(long, default_value = "auto")]
    theme: String,
}

fn main() -> Result<()> {
    // Logs go to stderr so they never fight the TUI for stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut settings = Settings::load()?;
    if let Some(url) = args.url {
        settings.api_base_url = url;
    }
    if let Some(ws_url) = args.ws_url {
        settings.ws_url = ws_url;
    }
    if let Some(operator) = args.operator {
        settings.operator = operator;
    }
    if let Some(hours) = args.hours {
        settings.history_hours = hours;
    }
    if let Some(secs) = args.poll_interval {
        settings.poll_interval_ms = secs * 1000;
    }

    // Background tasks (live channel, polling timer, controller) run on the
    // runtime's worker threads while the TUI loop stays synchronous.
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let client = ApiClient::from_settings(&settings);
    let (controller, outcomes) = Controller::spawn(client.clone());

    let (source, live): (Box<dyn SnapshotSource>, bool) = if args.poll {
        let source = PollSource::spawn(
            client,
            settings.poll_interval(),
            &settings.api_base_url,
        );
        (Box::new(source), false)
    } else {
        let connector = Arc::new(WsConnector::new(settings.ws_endpoint()));
        let source = LiveSource::spawn(connector, settings.retry_policy(), &settings.ws_url);
        (Box::new(source), true)
    };

    let mut app = App::new(
        source,
        live,
        controller,
        outcomes,
        settings.operator.clone(),
        settings.history_hours,
    );

    app.theme = match args.theme.as_str() {
        "light" => Theme::light(),
        "dark" => Theme::dark(),
        _ => Theme::auto_detect(),
    };

    run_tui(&mut app)

    // Dropping the app aborts the source and controller tasks; the runtime
    // shuts down after that, so teardown never leaks background work.
}

/// Run the TUI over the prepared app state.
fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Kick off the initial load
    app.start();

    // Run the main loop
    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            // Render header with system health
            ui::common::render_header(frame, app, chunks[0]);

            // Render tabs
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view
            match app.current_view {
                View::Services => ui::services::render(frame, app, chunks[2]),
                View::Alerts => ui::alerts::render(frame, app, chunks[2]),
                View::History => ui::history::render(frame, app, chunks[2]),
                View::Ratings => ui::ratings::render(frame, app, chunks[2]),
            }

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + table header (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Drain pushed snapshots and command outcomes
        app.tick();
    }

    Ok(())
}
