//! Engine configuration and persisted player settings.

use serde::{Deserialize, Serialize};
use tw_story::player::DEFAULT_HEALTH;

/// Tunables for a story session.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Milliseconds between revealed units.
    pub typewriter_speed_ms: u64,
    /// Pause in milliseconds between `\`-separated segments.
    pub line_break_delay_ms: u64,
    /// Auto-redirect delay for nodes that don't set one.
    pub auto_redirect_delay_ms: u64,
    /// Reveal word by word instead of character by character.
    pub word_mode: bool,
    /// Longest accepted player name, in characters.
    pub name_max_chars: usize,
    /// Longest accepted free-text input, in characters.
    pub free_input_max_chars: usize,
    /// Non-exact keyword matches need at least this share of the keyword's length.
    pub keyword_length_ratio: f64,
    /// Fuzzy scores above this are no match at all.
    pub match_threshold: f64,
    /// Where the player goes when health hits zero and no override is set.
    pub game_over_node: String,
    /// Node that asks for the player's name. `None` means the story's first node.
    pub name_entry_node: Option<String>,
    /// Health a fresh player starts with.
    pub default_health: u32,
    /// Consecutive auto-redirects `settle` follows before giving up.
    pub redirect_hop_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            typewriter_speed_ms: 30,
            line_break_delay_ms: 1000,
            auto_redirect_delay_ms: 500,
            word_mode: false,
            name_max_chars: 20,
            free_input_max_chars: 30,
            keyword_length_ratio: 0.8,
            match_threshold: 0.4,
            game_over_node: tw_story::DEFAULT_GAME_OVER_NODE.to_string(),
            name_entry_node: None,
            default_health: DEFAULT_HEALTH,
            redirect_hop_limit: 64,
        }
    }
}

impl EngineConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the typewriter speed.
    pub fn with_typewriter_speed(mut self, ms: u64) -> Self {
        self.typewriter_speed_ms = ms;
        self
    }

    /// Set the pause between text segments.
    pub fn with_line_break_delay(mut self, ms: u64) -> Self {
        self.line_break_delay_ms = ms;
        self
    }

    /// Set the fallback auto-redirect delay.
    pub fn with_auto_redirect_delay(mut self, ms: u64) -> Self {
        self.auto_redirect_delay_ms = ms;
        self
    }

    /// Reveal text word by word.
    pub fn with_word_mode(mut self, enabled: bool) -> Self {
        self.word_mode = enabled;
        self
    }

    /// Set the default game-over node.
    pub fn with_game_over_node(mut self, id: impl Into<String>) -> Self {
        self.game_over_node = id.into();
        self
    }

    /// Set the name-entry node.
    pub fn with_name_entry_node(mut self, id: impl Into<String>) -> Self {
        self.name_entry_node = Some(id.into());
        self
    }

    /// Set the starting health.
    pub fn with_default_health(mut self, health: u32) -> Self {
        self.default_health = health;
        self
    }

    /// Set the fuzzy match threshold (clamped to 0.0-1.0).
    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold.clamp(0.0, 1.0);
        self
    }
}

/// Player-facing settings. Survive a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Milliseconds between revealed units.
    pub typewriter_speed_ms: u64,
    /// Play node sound effects.
    pub sfx_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Settings {
    /// Settings matching the config's defaults.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            typewriter_speed_ms: config.typewriter_speed_ms,
            sfx_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.typewriter_speed_ms, 30);
        assert_eq!(cfg.line_break_delay_ms, 1000);
        assert_eq!(cfg.auto_redirect_delay_ms, 500);
        assert_eq!(cfg.name_max_chars, 20);
        assert_eq!(cfg.free_input_max_chars, 30);
        assert_eq!(cfg.game_over_node, "game-over");
        assert_eq!(cfg.default_health, 3);
        assert!(cfg.name_entry_node.is_none());
    }

    #[test]
    fn builder_methods() {
        let cfg = EngineConfig::new()
            .with_typewriter_speed(5)
            .with_word_mode(true)
            .with_game_over_node("dead")
            .with_name_entry_node("welcome")
            .with_match_threshold(3.0)
            .with_line_break_delay(0)
            .with_auto_redirect_delay(10)
            .with_default_health(7);
        assert_eq!(cfg.typewriter_speed_ms, 5);
        assert_eq!(cfg.line_break_delay_ms, 0);
        assert_eq!(cfg.auto_redirect_delay_ms, 10);
        assert_eq!(cfg.default_health, 7);
        assert!(cfg.word_mode);
        assert_eq!(cfg.game_over_node, "dead");
        assert_eq!(cfg.name_entry_node.as_deref(), Some("welcome"));
        assert!(cfg.match_threshold <= 1.0);
    }

    #[test]
    fn settings_tolerate_partial_records() {
        let settings: Settings = serde_json::from_str(r#"{"sfxEnabled": false}"#).unwrap();
        assert_eq!(settings.typewriter_speed_ms, 30);
        assert!(!settings.sfx_enabled);
    }
}
