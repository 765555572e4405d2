//! Player state.

use serde::{Deserialize, Serialize};

/// Name used until the player enters one.
pub const DEFAULT_PLAYER_NAME: &str = "anonymous";

/// Health a new player starts with.
pub const DEFAULT_HEALTH: u32 = 3;

/// The player's state within a story session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerState {
    /// Name entered on the welcome node.
    pub name: String,
    /// Remaining health. Never below zero.
    pub health: u32,
    /// Item ids, in pickup order, without duplicates.
    pub inventory: Vec<String>,
    /// Knowledge ids, in learning order, without duplicates.
    pub knowledge: Vec<String>,
    /// Moral points. Unbounded in both directions.
    pub moral_points: i64,
    /// Node shown when health reaches zero, set by the latest damage effect that names one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_over_node: Option<String>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::with_health(DEFAULT_HEALTH)
    }
}

impl PlayerState {
    /// Create a fresh player with the given starting health.
    pub fn with_health(health: u32) -> Self {
        Self {
            name: DEFAULT_PLAYER_NAME.to_string(),
            health,
            inventory: Vec::new(),
            knowledge: Vec::new(),
            moral_points: 0,
            game_over_node: None,
        }
    }

    /// Check if the player has an item.
    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.iter().any(|i| i == item)
    }

    /// Add an item to inventory. Adding an item twice keeps one copy.
    pub fn add_item(&mut self, item: impl Into<String>) {
        let item = item.into();
        if !self.has_item(&item) {
            self.inventory.push(item);
        }
    }

    /// Remove an item from inventory.
    pub fn remove_item(&mut self, item: &str) -> bool {
        if let Some(pos) = self.inventory.iter().position(|i| i == item) {
            self.inventory.remove(pos);
            true
        } else {
            false
        }
    }

    /// Check if the player knows something.
    pub fn has_knowledge(&self, key: &str) -> bool {
        self.knowledge.iter().any(|k| k == key)
    }

    /// Learn a fact. Learning it twice keeps one copy.
    pub fn add_knowledge(&mut self, key: impl Into<String>) {
        let key = key.into();
        if !self.has_knowledge(&key) {
            self.knowledge.push(key);
        }
    }

    /// Forget a fact.
    pub fn remove_knowledge(&mut self, key: &str) -> bool {
        if let Some(pos) = self.knowledge.iter().position(|k| k == key) {
            self.knowledge.remove(pos);
            true
        } else {
            false
        }
    }

    /// Whether the player has run out of health.
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// A fresh state that keeps only this player's name.
    pub fn reset_keeping_name(&self, health: u32) -> Self {
        Self {
            name: self.name.clone(),
            ..Self::with_health(health)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_state_default() {
        let state = PlayerState::default();

        assert_eq!(state.name, "anonymous");
        assert_eq!(state.health, 3);
        assert!(state.inventory.is_empty());
        assert!(state.knowledge.is_empty());
        assert_eq!(state.moral_points, 0);
        assert!(state.game_over_node.is_none());
    }

    #[test]
    fn inventory_management() {
        let mut state = PlayerState::default();

        assert!(!state.has_item("torch"));
        state.add_item("torch");
        assert!(state.has_item("torch"));

        // Adding again should not duplicate
        state.add_item("torch");
        assert_eq!(state.inventory.len(), 1);

        assert!(state.remove_item("torch"));
        assert!(!state.has_item("torch"));

        // Removing again should return false
        assert!(!state.remove_item("torch"));
    }

    #[test]
    fn knowledge_management() {
        let mut state = PlayerState::default();

        state.add_knowledge("secret");
        state.add_knowledge("secret");
        assert_eq!(state.knowledge, vec!["secret".to_string()]);
        assert!(state.remove_knowledge("secret"));
        assert!(!state.has_knowledge("secret"));
    }

    #[test]
    fn reset_keeps_only_name() {
        let mut state = PlayerState {
            name: "Alex".to_string(),
            health: 1,
            moral_points: 4,
            game_over_node: Some("pit".to_string()),
            ..PlayerState::default()
        };
        state.add_item("torch");

        let reset = state.reset_keeping_name(DEFAULT_HEALTH);
        assert_eq!(reset.name, "Alex");
        assert_eq!(
            reset,
            PlayerState {
                name: "Alex".to_string(),
                ..PlayerState::default()
            }
        );
    }

    #[test]
    fn serializes_camel_case() {
        let state = PlayerState {
            moral_points: -2,
            ..PlayerState::default()
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["moralPoints"], -2);
        assert!(json.get("gameOverNode").is_none());
    }

    #[test]
    fn partial_record_fills_defaults() {
        let state: PlayerState = serde_json::from_str(r#"{"name": "Alex"}"#).unwrap();
        assert_eq!(state.name, "Alex");
        assert_eq!(state.health, DEFAULT_HEALTH);
    }
}
