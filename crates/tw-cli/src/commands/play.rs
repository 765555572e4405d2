//! `tw play`: full-screen or line-mode play.

use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::debug;
use tw_engine::{JsonFileStorage, Session, Settings};

use crate::tui::{self, ScreenEffects};

/// Flags that shape a play session.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayOptions {
    /// Line mode instead of the full-screen player.
    pub plain: bool,
    /// Typewriter speed to save before starting.
    pub speed: Option<u64>,
    /// Drop saved progress first.
    pub fresh: bool,
}

/// Play a story, resuming saved progress unless told otherwise.
pub fn run(story: &Path, save: Option<&Path>, options: PlayOptions) -> Result<(), String> {
    let graph = super::load_story(story)?;
    let path = super::save_path(story, save);
    let storage = JsonFileStorage::open(&path).map_err(|e| e.to_string())?;
    debug!(save = %path.display(), plain = options.plain, "opening session");

    if options.plain {
        let session = prepare(Session::new(graph, storage), options)?;
        play_plain(session, io::stdin().lock(), &mut io::stdout().lock())
    } else {
        let effects = ScreenEffects::default();
        let session = Session::new(graph, storage).with_effects(effects.clone());
        let session = prepare(session, options)?;
        tui::run(session, effects)
    }
}

/// Start or resume, then apply the command-line overrides.
fn prepare(mut session: Session, options: PlayOptions) -> Result<Session, String> {
    session.start().map_err(|e| e.to_string())?;
    if options.fresh {
        session.clear_all_and_restart().map_err(|e| e.to_string())?;
    }
    if let Some(ms) = options.speed {
        let settings = Settings {
            typewriter_speed_ms: ms,
            ..session.settings().clone()
        };
        session.update_settings(settings).map_err(|e| e.to_string())?;
    }
    Ok(session)
}

/// Line mode: every input line is one submission, narration appears at once.
fn play_plain(mut session: Session, input: impl BufRead, out: &mut impl Write) -> Result<(), String> {
    let mut shown = Vec::new();
    session.settle().map_err(|e| e.to_string())?;
    print_new_lines(&session, &mut shown, out).map_err(|e| e.to_string())?;

    for line in input.lines() {
        let line = line.map_err(|e| e.to_string())?;
        let outcome = session.send_input(&line).map_err(|e| e.to_string())?;
        debug!(?outcome, "input handled");
        session.settle().map_err(|e| e.to_string())?;
        print_new_lines(&session, &mut shown, out).map_err(|e| e.to_string())?;
        if session.is_closed() {
            break;
        }
    }
    Ok(())
}

/// Print the display lines that differ from what was printed last time.
fn print_new_lines(
    session: &Session,
    shown: &mut Vec<String>,
    out: &mut impl Write,
) -> io::Result<()> {
    let current: Vec<String> = session
        .display()
        .lines()
        .iter()
        .map(ToString::to_string)
        .collect();
    let common = shown
        .iter()
        .zip(&current)
        .take_while(|(before, now)| before == now)
        .count();
    for line in &current[common..] {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    *shown = current;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tw_engine::MemoryStorage;
    use tw_story::StoryGraph;

    const STORY: &str = r#"{"nodes": [
        {"id": "welcome", "text": "Who goes there?", "choices": [
            {"id": 1, "text": "", "nextNodeId": "gate"}
        ]},
        {"id": "gate", "text": "A gate.", "choices": [
            {"id": 1, "text": "Knock", "nextNodeId": "gate", "altTextOnChoiceRepeat": "Silence."},
            {"id": 2, "text": "Walk away", "nextNodeId": "gate",
             "effects": [{"type": "close"}]}
        ]}
    ]}"#;

    fn session() -> Session {
        Session::new(StoryGraph::from_json(STORY).unwrap(), MemoryStorage::new())
    }

    fn play(input: &str) -> String {
        let session = prepare(session(), PlayOptions::default()).unwrap();
        let mut out = Vec::new();
        play_plain(session, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn prints_only_new_lines() {
        let out = play("Robin\n1\n1\n");
        assert_eq!(out.matches("Who goes there?").count(), 1);
        assert!(out.contains("> Robin"));
        assert_eq!(out.matches("> Knock").count(), 2);
        assert!(out.contains("Silence."));
    }

    #[test]
    fn stops_when_the_story_closes() {
        let out = play("Robin\n2\n1\n");
        assert!(out.contains("> Walk away"));
        assert!(!out.contains("> Knock"));
    }

    #[test]
    fn speed_override_is_saved() {
        let storage = MemoryStorage::new();
        let session = Session::new(StoryGraph::from_json(STORY).unwrap(), storage.clone());
        let options = PlayOptions {
            speed: Some(5),
            ..PlayOptions::default()
        };
        let session = prepare(session, options).unwrap();
        assert_eq!(session.settings().typewriter_speed_ms, 5);
        assert!(storage.keys().contains(&"settings".to_string()));
    }
}
