//! Choices and the conditions and effects attached to them.

mod condition;
mod effect;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use condition::Condition;
pub use effect::Effect;

/// Identifier of a choice, unique within its node. Authors use numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceId {
    /// Numeric id, e.g. `1`.
    Number(i64),
    /// String id, e.g. `"open-door"`.
    Text(String),
}

impl fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceId::Number(n) => write!(f, "{n}"),
            ChoiceId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ChoiceId {
    fn from(n: i64) -> Self {
        ChoiceId::Number(n)
    }
}

impl From<&str> for ChoiceId {
    fn from(s: &str) -> Self {
        ChoiceId::Text(s.to_string())
    }
}

/// A labeled transition from one node to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Id unique within the owning node.
    pub id: ChoiceId,
    /// Text shown to the player.
    pub text: String,
    /// Destination node.
    pub next_node_id: String,
    /// All must hold for the choice to be offered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    /// Applied in order when the choice is taken.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
    /// Keyword matched against free-text input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_keyword: Option<String>,
    /// Only a perfect keyword match selects this choice.
    #[serde(default)]
    pub exact_match: bool,
    /// Extra narration on the second pick of this choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text_on_choice_repeat: Option<String>,
    /// Destination once `alt_redirect_threshold` picks are reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_next_node_id: Option<String>,
    /// Pick count from which `alt_next_node_id` is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_redirect_threshold: Option<u32>,
}

impl Choice {
    /// Create a choice leading to `next_node_id`.
    pub fn new(id: impl Into<ChoiceId>, text: impl Into<String>, next_node_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            next_node_id: next_node_id.into(),
            conditions: Vec::new(),
            effects: Vec::new(),
            match_keyword: None,
            exact_match: false,
            alt_text_on_choice_repeat: None,
            alt_next_node_id: None,
            alt_redirect_threshold: None,
        }
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add an effect.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Set the free-text keyword.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.match_keyword = Some(keyword.into());
        self
    }

    /// Require a perfect keyword match.
    pub fn exact(mut self) -> Self {
        self.exact_match = true;
        self
    }

    /// Narration for the second pick.
    pub fn with_repeat_text(mut self, text: impl Into<String>) -> Self {
        self.alt_text_on_choice_repeat = Some(text.into());
        self
    }

    /// Redirect to `target` from the `threshold`-th pick on.
    pub fn with_threshold_redirect(mut self, target: impl Into<String>, threshold: u32) -> Self {
        self.alt_next_node_id = Some(target.into());
        self.alt_redirect_threshold = Some(threshold);
        self
    }

    /// Whether `node_id` is one of this choice's destinations.
    pub fn leads_to(&self, node_id: &str) -> bool {
        self.next_node_id == node_id || self.alt_next_node_id.as_deref() == Some(node_id)
    }

    /// The history record for picking this choice on `node_id`.
    pub fn pick_key(&self, node_id: &str) -> String {
        format!("{node_id}:{}", self.id)
    }

    /// Every node id this choice refers to, with the field it came from.
    pub fn references(&self) -> Vec<(&'static str, &str)> {
        let mut refs = vec![("nextNodeId", self.next_node_id.as_str())];
        if let Some(alt) = &self.alt_next_node_id {
            refs.push(("altNextNodeId", alt.as_str()));
        }
        for effect in &self.effects {
            if let Some(target) = effect.game_over_node() {
                refs.push(("gameOverNodeId", target));
            }
        }
        refs
    }
}
