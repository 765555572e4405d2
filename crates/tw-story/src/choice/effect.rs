//! Effects that modify player state when a choice is taken.

use serde::{Deserialize, Serialize};

/// A player-state mutation attached to a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Effect {
    /// Put an item in the inventory.
    AddItem {
        /// Item id.
        item: String,
    },
    /// Take an item out of the inventory.
    RemoveItem {
        /// Item id.
        item: String,
    },
    /// Learn a fact.
    AddKnowledge {
        /// Knowledge id.
        knowledge: String,
    },
    /// Forget a fact.
    RemoveKnowledge {
        /// Knowledge id.
        knowledge: String,
    },
    /// Heal.
    AddHealth {
        /// Amount healed.
        health: u32,
    },
    /// Take damage, optionally naming where death leads.
    RemoveHealth {
        /// Amount of damage.
        health: u32,
        /// Node shown if this damage is fatal.
        #[serde(
            rename = "gameOverNodeId",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        game_over_node_id: Option<String>,
    },
    /// Gain moral points.
    AddMoralPoints {
        /// Amount gained.
        #[serde(rename = "moralPoints")]
        moral_points: i64,
    },
    /// Lose moral points.
    RemoveMoralPoints {
        /// Amount lost.
        #[serde(rename = "moralPoints")]
        moral_points: i64,
    },
    /// Wipe the saved session and start over.
    Restart,
    /// End the session.
    Close,
    /// An effect type this engine does not know. Does nothing.
    #[serde(other)]
    Unknown,
}

impl Effect {
    /// The game-over override carried by a `RemoveHealth` effect.
    pub fn game_over_node(&self) -> Option<&str> {
        match self {
            Effect::RemoveHealth {
                game_over_node_id, ..
            } => game_over_node_id.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_effects() {
        let effects: Vec<Effect> = serde_json::from_str(
            r#"[
                {"type": "addItem", "item": "torch"},
                {"type": "removeHealth", "health": 2, "gameOverNodeId": "drowned"},
                {"type": "removeHealth", "health": 1},
                {"type": "addMoralPoints", "moralPoints": 5},
                {"type": "restart"},
                {"type": "teleport", "to": "moon"}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            effects[0],
            Effect::AddItem {
                item: "torch".to_string()
            }
        );
        assert_eq!(effects[1].game_over_node(), Some("drowned"));
        assert_eq!(effects[2].game_over_node(), None);
        assert_eq!(effects[3], Effect::AddMoralPoints { moral_points: 5 });
        assert_eq!(effects[4], Effect::Restart);
        assert_eq!(effects[5], Effect::Unknown);
    }

    #[test]
    fn negative_health_is_malformed() {
        let result: Result<Effect, _> =
            serde_json::from_str(r#"{"type": "removeHealth", "health": -1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn serialize_uses_wire_names() {
        let json = serde_json::to_string(&Effect::RemoveHealth {
            health: 1,
            game_over_node_id: Some("end".to_string()),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"removeHealth","health":1,"gameOverNodeId":"end"}"#);
    }
}
