pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

use crate::dataset::Dataset;

/// Big step for H/L
const COARSE_STEPS: i32 = 5;

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(250);

    let mut pending_reload: Option<tokio::task::JoinHandle<_>> = None;

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => {
                app.update_flash();
                if app.is_loading {
                    app.advance_spinner();
                }
            }
        }

        // Check if background reload has completed
        if let Some(handle) = pending_reload.take_if(|h| h.is_finished()) {
            match handle.await {
                Ok(Ok(dataset)) => app.replace_dataset(dataset),
                Ok(Err(e)) => app.show_flash(format!("Failed to reload: {}", e)),
                Err(e) => app.show_flash(format!("Failed to reload: task panicked: {}", e)),
            }
            app.is_loading = false;
        }

        // Spawn a reload if one was requested and none is running
        if app.needs_reload && pending_reload.is_none() {
            app.needs_reload = false;
            if let Some((path, config)) = app.source.clone() {
                tracing::debug!(path = %path.display(), "reloading dataset");
                pending_reload = Some(tokio::task::spawn_blocking(move || {
                    Dataset::load(&path, &config)
                }));
                app.is_loading = true;
            }
        }

        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => match key.code {
            // Quit
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true
            }

            // Slider focus
            KeyCode::Tab => app.focus_next(),
            KeyCode::BackTab => app.focus_previous(),

            // Slider adjustment
            KeyCode::Left | KeyCode::Char('h') => app.adjust_focused(-1),
            KeyCode::Right | KeyCode::Char('l') => app.adjust_focused(1),
            KeyCode::Char('H') => app.adjust_focused(-COARSE_STEPS),
            KeyCode::Char('L') => app.adjust_focused(COARSE_STEPS),
            KeyCode::Char('0') => app.reset_sliders(),

            // Navigation
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

            KeyCode::Char('n') => app.toggle_normalization(),
            KeyCode::Char('r') => {
                app.request_reload();
                if app.needs_reload {
                    app.show_flash("Reloading dataset...".to_string());
                }
            }
            KeyCode::Char('?') => app.show_help(),
            KeyCode::Char('b') | KeyCode::Enter => app.show_score_breakdown(),

            _ => {}
        },
        app::InputMode::ScoreBreakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Enter => app.dismiss_score_breakdown(),
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dataset::NeighborhoodRecord;

    fn app() -> App {
        let dataset = Dataset::new(vec![
            NeighborhoodRecord::new("Indiranagar", 28000.0, 30, 25.0, 8.5),
            NeighborhoodRecord::new("BTM Layout", 16000.0, 12, 8.0, 7.5),
        ]);
        App::new(dataset, None, &Config::default(), ThemeColors::dark())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys_move_focused_slider() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.focused, app::Slider::Metro);
        handle_key_event(&mut app, press(KeyCode::Right));
        assert_eq!(app.weights.metro, 0.85);
        handle_key_event(&mut app, press(KeyCode::Char('H')));
        assert_eq!(app.weights.metro, 0.6);
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('?')));
        assert_eq!(app.input_mode, app::InputMode::Help);
        handle_key_event(&mut app, press(KeyCode::Char('x')));
        assert_eq!(app.input_mode, app::InputMode::Normal);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_breakdown_navigation() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('b')));
        assert_eq!(app.input_mode, app::InputMode::ScoreBreakdown);
        handle_key_event(&mut app, press(KeyCode::Char('j')));
        assert_eq!(app.table_state.selected(), Some(1));
        handle_key_event(&mut app, press(KeyCode::Esc));
        assert_eq!(app.input_mode, app::InputMode::Normal);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }
}
