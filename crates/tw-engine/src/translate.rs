//! Translation of UI strings.

use std::collections::HashMap;

/// Translation keys used by the engine and front ends.
pub mod keys {
    /// Label of the synthetic choice offered when nothing else is available.
    pub const LEAVE: &str = "story.leave";
    /// Question asked before quitting.
    pub const EXIT_CONFIRM: &str = "story.exitConfirm";
    /// Answer that keeps playing.
    pub const EXIT_CANCEL: &str = "story.exitCancel";
}

/// Looks up display strings by key.
pub trait Translator {
    /// Translate `key`. Unknown keys come back unchanged.
    fn translate(&self, key: &str) -> String;
}

/// An in-memory table of translations, English by default.
#[derive(Debug, Clone)]
pub struct StaticTranslator {
    entries: HashMap<String, String>,
}

impl Default for StaticTranslator {
    fn default() -> Self {
        Self::empty()
            .with_entry(keys::LEAVE, "Leave")
            .with_entry(keys::EXIT_CONFIRM, "Leave the story? Your progress is kept.")
            .with_entry(keys::EXIT_CANCEL, "Keep playing")
    }
}

impl StaticTranslator {
    /// A translator with no entries.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add or override an entry.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl Translator for StaticTranslator {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
