use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If filter input is active, handle text input
    if app.filter_active {
        handle_filter_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Services),
        KeyCode::Char('2') => app.set_view(View::Alerts),
        KeyCode::Char('3') => app.set_view(View::History),
        KeyCode::Char('4') => app.set_view(View::Ratings),

        // Navigation (up/down for items, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Open history for the selected service
        KeyCode::Enter => {
            if app.current_view == View::Services {
                app.open_history_for_selected();
            }
        }

        // Back to the services view
        KeyCode::Esc | KeyCode::Backspace => {
            if app.current_view != View::Services {
                app.set_view(View::Services);
            }
        }

        // Manual refresh (retry after errors too)
        KeyCode::Char('r') => app.refresh(),

        // Trigger an immediate probe cycle
        KeyCode::Char('p') => app.trigger_check(),

        // Resolve the selected alert
        KeyCode::Char('R') => {
            if app.current_view == View::Alerts {
                app.resolve_selected_alert();
            }
        }

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Filter (Services view)
        KeyCode::Char('/') => {
            if app.current_view == View::Services {
                app.start_filter();
            }
        }

        // Clear filter
        KeyCode::Char('c') => {
            if !app.filter_text.is_empty() {
                app.clear_filter();
            }
        }

        _ => {}
    }
}

/// Handle key input while filter is active
fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Confirm filter
        KeyCode::Enter => {
            app.filter_active = false;
        }

        // Cancel filter (keep text but exit input mode)
        KeyCode::Esc => {
            app.cancel_filter();
        }

        // Clear and exit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_filter();
        }

        // Backspace
        KeyCode::Backspace => {
            app.filter_pop();
            if app.filter_text.is_empty() {
                app.filter_active = false;
            }
        }

        // Type characters
        KeyCode::Char(c) => {
            app.filter_push(c);
        }

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => {
            app.select_prev();
        }
        MouseEventKind::ScrollDown => {
            app.select_next();
        }

        // Click to select
        MouseEventKind::Down(crossterm::event::MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Check if clicking in content area (after header, tabs, table header)
            if clicked_row > content_start_row {
                let item_row = (clicked_row - content_start_row - 1) as usize;

                match app.current_view {
                    View::Services => {
                        if item_row < app.filtered_services().len() {
                            app.selected_service_index = item_row;
                        }
                    }
                    View::Alerts => {
                        let count = app.snapshot.as_ref().map_or(0, |s| s.alerts.len());
                        if item_row < count {
                            app.selected_alert_index = item_row;
                        }
                    }
                    View::History | View::Ratings => {}
                }
            }

            // Check for tab clicks (row 1, after header)
            if clicked_row == 1 {
                let col = mouse.column;
                // Approximate tab positions: Services (0-11), Alerts (12-21),
                // History (22-32), Ratings (33-43)
                if col < 12 {
                    app.set_view(View::Services);
                } else if col < 22 {
                    app.set_view(View::Alerts);
                } else if col < 33 {
                    app.set_view(View::History);
                } else if col < 44 {
                    app.set_view(View::Ratings);
                }
            }
        }

        _ => {}
    }
}
