//! Full-screen player: terminal setup, teardown, and the event loop.

mod app;
mod effects;
mod view;

use std::io;
use std::time::Instant;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use tw_engine::Session;

use app::PlayApp;
pub use effects::ScreenEffects;

/// Play `session` until the player leaves or the story closes.
pub fn run(session: Session, effects: ScreenEffects) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("terminal error: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| format!("terminal error: {e}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| format!("terminal error: {e}"))?;

    let mut app = PlayApp::new(session, effects);
    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    result
}

/// Draw, wait for input or the next timed change, repeat.
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut PlayApp,
) -> Result<(), String> {
    let mut last_tick = Instant::now();
    loop {
        terminal
            .draw(|frame| view::draw(frame, app))
            .map_err(|e| format!("draw error: {e}"))?;

        if app.should_quit {
            return Ok(());
        }

        let timeout = app.next_wakeup();
        if event::poll(timeout).map_err(|e| format!("event error: {e}"))? {
            let event = event::read().map_err(|e| format!("event error: {e}"))?;
            handle_event(app, event)?;
        }

        let now = Instant::now();
        app.tick(now - last_tick)?;
        last_tick = now;
    }
}

fn handle_event(app: &mut PlayApp, event: Event) -> Result<(), String> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                app.should_quit = true;
                return Ok(());
            }
            app.handle_key(key)
        }
        Event::Mouse(mouse) => {
            app.handle_mouse(mouse);
            Ok(())
        }
        _ => Ok(()),
    }
}
