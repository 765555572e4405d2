//! Story nodes and the top-level document.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::choice::Choice;

/// The top-level story document: `{ "$schema": ..., "nodes": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameData {
    /// Schema reference used by the authoring tool. Ignored by the engine.
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// All nodes, in document order. The first node is the story's start.
    pub nodes: Vec<StoryNode>,
}

/// A unit of narrative text plus its outgoing choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryNode {
    /// Unique node id.
    pub id: String,
    /// Primary narration. A `\` splits it into paced segments.
    pub text: String,
    /// Outgoing choices. A node without choices is terminal.
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Node to move to automatically once the text is written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_redirect_to: Option<String>,
    /// Delay in milliseconds before the automatic move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_redirect_delay: Option<u64>,
    /// Narration used on every visit after the first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text_if_visited: Option<String>,
    /// Narration used when the player holds `knowledge_for_alt_text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text_if_knowledge: Option<String>,
    /// Knowledge id that unlocks `alt_text_if_knowledge`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_for_alt_text: Option<String>,
    /// The node expects free text matched against choice keywords.
    #[serde(default, alias = "freeInput")]
    pub is_free_input: bool,
    /// Visual effect played on entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vfx: Option<Vfx>,
    /// Sound effect played on entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sfx: Option<Sfx>,
}

impl StoryNode {
    /// Create a node with the given id and narration and no choices.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            choices: Vec::new(),
            auto_redirect_to: None,
            auto_redirect_delay: None,
            alt_text_if_visited: None,
            alt_text_if_knowledge: None,
            knowledge_for_alt_text: None,
            is_free_input: false,
            vfx: None,
            sfx: None,
        }
    }

    /// Add a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Redirect automatically to another node after `delay_ms`.
    pub fn with_auto_redirect(mut self, target: impl Into<String>, delay_ms: Option<u64>) -> Self {
        self.auto_redirect_to = Some(target.into());
        self.auto_redirect_delay = delay_ms;
        self
    }

    /// Narration for repeat visits.
    pub fn with_alt_text_if_visited(mut self, text: impl Into<String>) -> Self {
        self.alt_text_if_visited = Some(text.into());
        self
    }

    /// Narration shown when the player knows `knowledge`.
    pub fn with_alt_text_if_knowledge(
        mut self,
        knowledge: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.knowledge_for_alt_text = Some(knowledge.into());
        self.alt_text_if_knowledge = Some(text.into());
        self
    }

    /// Mark the node as a free-input node.
    pub fn free_input(mut self) -> Self {
        self.is_free_input = true;
        self
    }

    /// Set the visual effect.
    pub fn with_vfx(mut self, vfx: Vfx) -> Self {
        self.vfx = Some(vfx);
        self
    }

    /// Set the sound effect.
    pub fn with_sfx(mut self, sfx: Sfx) -> Self {
        self.sfx = Some(sfx);
        self
    }

    /// Whether the node has no outgoing choices.
    pub fn is_terminal(&self) -> bool {
        self.choices.is_empty()
    }

    /// Whether the node moves on by itself.
    pub fn is_auto_redirect(&self) -> bool {
        self.auto_redirect_to.is_some()
    }

    /// Every node id this node refers to, with the field it came from.
    pub fn references(&self) -> Vec<(&'static str, &str)> {
        let mut refs = Vec::new();
        if let Some(target) = &self.auto_redirect_to {
            refs.push(("autoRedirectTo", target.as_str()));
        }
        refs
    }
}

/// Visual effects a node can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vfx {
    /// Screen shake.
    Shake,
    /// Glitch overlay. Pauses the typewriter while active.
    Glitch,
    /// Darkened screen.
    Dark,
}

impl Vfx {
    /// Wire name of the effect.
    pub fn name(self) -> &'static str {
        match self {
            Vfx::Shake => "shake",
            Vfx::Glitch => "glitch",
            Vfx::Dark => "dark",
        }
    }
}

impl fmt::Display for Vfx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sound effects a node can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sfx {
    /// The default transition blip.
    #[default]
    Blip,
    /// Victory jingle.
    Win,
    /// Defeat jingle.
    Lose,
    /// Damage sound.
    Hurt,
}

impl Sfx {
    /// Wire name of the sound.
    pub fn name(self) -> &'static str {
        match self {
            Sfx::Blip => "blip",
            Sfx::Win => "win",
            Sfx::Lose => "lose",
            Sfx::Hurt => "hurt",
        }
    }
}

impl fmt::Display for Sfx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
