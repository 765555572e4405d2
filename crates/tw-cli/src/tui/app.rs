//! State of the full-screen player.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use tracing::debug;
use tw_engine::translate::keys;
use tw_engine::{InputOutcome, Phase, Session, SessionEvent, StaticTranslator, Translator};

use super::effects::ScreenEffects;

/// Poll interval when nothing is animating.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// The session plus everything the terminal front end tracks around it.
pub struct PlayApp {
    /// The story being played.
    pub session: Session,
    /// Effects shared with the session.
    pub effects: ScreenEffects,
    translator: StaticTranslator,
    /// Current input text.
    pub input_text: String,
    /// Cursor position within input text, in bytes.
    pub input_cursor: usize,
    /// Scroll offset from the bottom.
    pub output_scroll: u16,
    /// The leave-the-story prompt is open.
    pub confirm_exit: bool,
    /// The loop exits after the next draw.
    pub should_quit: bool,
    /// Frames drawn so far, used to animate effects.
    pub frame_count: u64,
}

impl PlayApp {
    /// Wrap a started session.
    pub fn new(session: Session, effects: ScreenEffects) -> Self {
        let mut app = Self {
            session,
            effects,
            translator: StaticTranslator::default(),
            input_text: String::new(),
            input_cursor: 0,
            output_scroll: 0,
            confirm_exit: false,
            should_quit: false,
            frame_count: 0,
        };
        app.sync_effects();
        app
    }

    /// Look up a UI string.
    pub fn translate(&self, key: &str) -> String {
        self.translator.translate(key)
    }

    /// How long the loop may wait for input before something changes.
    pub fn next_wakeup(&self) -> Duration {
        [self.session.next_wakeup(), self.effects.next_frame()]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(IDLE_POLL)
    }

    /// Let time pass.
    pub fn tick(&mut self, elapsed: Duration) -> Result<(), String> {
        if self.effects.tick(elapsed) {
            self.session.resume_writing();
        }
        self.session.advance(elapsed).map_err(|e| e.to_string())?;
        self.sync_effects();
        Ok(())
    }

    /// Hold the typewriter while a freshly started glitch plays.
    fn sync_effects(&mut self) {
        if self.effects.take_glitch_start() {
            self.session.pause_writing();
        }
        for event in self.session.drain_events() {
            debug!(?event, "session event");
            if matches!(event, SessionEvent::Restarted | SessionEvent::NodeEntered { .. }) {
                self.output_scroll = 0;
            }
        }
    }

    /// Edit the input line, submit it, or answer the leave prompt.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<(), String> {
        if self.confirm_exit {
            match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => self.should_quit = true,
                KeyCode::Char('n' | 'N') | KeyCode::Esc => self.confirm_exit = false,
                _ => {}
            }
            return Ok(());
        }

        if self.session.is_closed() {
            self.should_quit = true;
            return Ok(());
        }

        match key.code {
            KeyCode::Enter | KeyCode::Esc if self.session.phase() == Phase::Writing => {
                self.session.skip();
                self.sync_effects();
            }
            KeyCode::Enter => self.submit_input()?,
            KeyCode::Esc => {
                if self.input_text.is_empty() {
                    self.confirm_exit = true;
                } else {
                    self.input_text.clear();
                    self.input_cursor = 0;
                }
            }
            KeyCode::Backspace => {
                if let Some(prev) = self.prev_boundary() {
                    self.input_text.remove(prev);
                    self.input_cursor = prev;
                }
            }
            KeyCode::Left => {
                if let Some(prev) = self.prev_boundary() {
                    self.input_cursor = prev;
                }
            }
            KeyCode::Right => {
                if self.input_cursor < self.input_text.len() {
                    self.input_cursor = self.input_text[self.input_cursor..]
                        .char_indices()
                        .nth(1)
                        .map_or(self.input_text.len(), |(i, _)| self.input_cursor + i);
                }
            }
            KeyCode::Home => self.input_cursor = 0,
            KeyCode::End => self.input_cursor = self.input_text.len(),
            KeyCode::Up => self.output_scroll = self.output_scroll.saturating_add(1),
            KeyCode::Down => self.output_scroll = self.output_scroll.saturating_sub(1),
            KeyCode::PageUp => self.output_scroll = self.output_scroll.saturating_add(10),
            KeyCode::PageDown => self.output_scroll = self.output_scroll.saturating_sub(10),
            KeyCode::Char(c) => {
                self.input_text.insert(self.input_cursor, c);
                self.input_cursor += c.len_utf8();
            }
            _ => {}
        }
        Ok(())
    }

    /// Scroll with the wheel.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.output_scroll = self.output_scroll.saturating_add(1),
            MouseEventKind::ScrollDown => {
                self.output_scroll = self.output_scroll.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn submit_input(&mut self) -> Result<(), String> {
        let outcome = self
            .session
            .send_input(&self.input_text)
            .map_err(|e| e.to_string())?;
        debug!(?outcome, "input handled");
        if outcome != InputOutcome::Busy {
            self.input_text.clear();
            self.input_cursor = 0;
        }
        self.sync_effects();
        Ok(())
    }

    fn prev_boundary(&self) -> Option<usize> {
        if self.input_cursor == 0 {
            return None;
        }
        Some(
            self.input_text[..self.input_cursor]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i),
        )
    }

    /// Text of the leave-the-story prompt.
    pub fn exit_prompt(&self) -> (String, String) {
        (
            self.translate(keys::EXIT_CONFIRM),
            self.translate(keys::EXIT_CANCEL),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use tw_engine::MemoryStorage;
    use tw_story::StoryGraph;

    const STORY: &str = r#"{"nodes": [
        {"id": "welcome", "text": "Name?", "choices": [
            {"id": 1, "text": "", "nextNodeId": "storm"}
        ]},
        {"id": "storm", "text": "Lightning.", "vfx": "glitch", "choices": [
            {"id": 1, "text": "Run", "nextNodeId": "storm"}
        ]}
    ]}"#;

    fn app() -> PlayApp {
        let effects = ScreenEffects::default();
        let mut session = Session::new(StoryGraph::from_json(STORY).unwrap(), MemoryStorage::new())
            .with_effects(effects.clone());
        session.start().unwrap();
        PlayApp::new(session, effects)
    }

    fn press(app: &mut PlayApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn type_line(app: &mut PlayApp, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter);
    }

    #[test]
    fn enter_skips_writing_then_submits() {
        let mut app = app();
        assert_eq!(app.session.phase(), Phase::Writing);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.phase(), Phase::AwaitingInput);

        type_line(&mut app, "Kim");
        assert_eq!(app.session.player().name, "Kim");
        assert!(app.input_text.is_empty());
    }

    #[test]
    fn glitch_pauses_writing_until_it_ends() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        type_line(&mut app, "Kim");

        assert!(app.effects.state().glitch.is_some());
        assert_eq!(app.session.next_wakeup(), None);

        app.tick(Duration::from_millis(500)).unwrap();
        assert_eq!(app.session.phase(), Phase::Writing);
        assert!(!app.session.display().render().contains("Lightning."));

        // The glitch runs out and the same tick starts writing again.
        app.tick(Duration::from_millis(100)).unwrap();
        assert!(app.effects.state().glitch.is_none());
        assert!(app.session.next_wakeup().is_some());
    }

    #[test]
    fn escape_asks_before_leaving() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        assert!(app.confirm_exit);
        press(&mut app, KeyCode::Char('n'));
        assert!(!app.confirm_exit);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('y'));
        assert!(app.should_quit);
    }

    #[test]
    fn editing_handles_multibyte_chars() {
        let mut app = app();
        press(&mut app, KeyCode::Char('é'));
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input_text, "a");
        assert_eq!(app.input_cursor, 0);
    }
}
