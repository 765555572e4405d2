//! Applying choice effects to player state.

use tracing::trace;
use tw_story::{Effect, PlayerState};

/// An effect that ends or restarts the session instead of changing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalAction {
    /// Wipe the saved session and start over.
    Restart,
    /// End the session.
    Close,
}

/// What applying a list of effects produced besides state changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectOutcome {
    /// The first terminal action in the list, if any.
    pub terminal: Option<TerminalAction>,
}

/// Apply effects to the player, strictly in order.
///
/// Health saturates at zero. Adding something the player already has and
/// removing something they don't are both no-ops.
pub fn apply(effects: &[Effect], player: &mut PlayerState) -> EffectOutcome {
    let mut outcome = EffectOutcome::default();

    for effect in effects {
        trace!(?effect, "applying effect");
        match effect {
            Effect::AddItem { item } => player.add_item(item.as_str()),
            Effect::RemoveItem { item } => {
                player.remove_item(item);
            }
            Effect::AddKnowledge { knowledge } => player.add_knowledge(knowledge.as_str()),
            Effect::RemoveKnowledge { knowledge } => {
                player.remove_knowledge(knowledge);
            }
            Effect::AddHealth { health } => player.health = player.health.saturating_add(*health),
            Effect::RemoveHealth {
                health,
                game_over_node_id,
            } => {
                player.health = player.health.saturating_sub(*health);
                if let Some(node) = game_over_node_id {
                    player.game_over_node = Some(node.clone());
                }
            }
            Effect::AddMoralPoints { moral_points } => {
                player.moral_points = player.moral_points.saturating_add(*moral_points);
            }
            Effect::RemoveMoralPoints { moral_points } => {
                player.moral_points = player.moral_points.saturating_sub(*moral_points);
            }
            Effect::Restart => {
                outcome.terminal.get_or_insert(TerminalAction::Restart);
            }
            Effect::Close => {
                outcome.terminal.get_or_insert(TerminalAction::Close);
            }
            Effect::Unknown => {}
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn applies_in_order() {
        let mut player = PlayerState::default();
        let effects = vec![
            Effect::AddItem {
                item: "torch".to_string(),
            },
            Effect::RemoveItem {
                item: "torch".to_string(),
            },
            Effect::AddKnowledge {
                knowledge: "map".to_string(),
            },
            Effect::AddMoralPoints { moral_points: 3 },
            Effect::RemoveMoralPoints { moral_points: 5 },
        ];
        let outcome = apply(&effects, &mut player);

        assert!(!player.has_item("torch"));
        assert!(player.has_knowledge("map"));
        assert_eq!(player.moral_points, -2);
        assert_eq!(outcome, EffectOutcome::default());
    }

    #[test]
    fn damage_records_game_over_override() {
        let mut player = PlayerState::default();
        apply(
            &[
                Effect::RemoveHealth {
                    health: 1,
                    game_over_node_id: Some("pit".to_string()),
                },
                Effect::RemoveHealth {
                    health: 1,
                    game_over_node_id: None,
                },
                Effect::RemoveHealth {
                    health: 5,
                    game_over_node_id: Some("river".to_string()),
                },
            ],
            &mut player,
        );
        assert_eq!(player.health, 0);
        assert!(player.is_dead());
        assert_eq!(player.game_over_node.as_deref(), Some("river"));
    }

    #[test]
    fn first_terminal_action_wins() {
        let mut player = PlayerState::default();
        let outcome = apply(
            &[
                Effect::AddHealth { health: 2 },
                Effect::Close,
                Effect::Restart,
            ],
            &mut player,
        );
        assert_eq!(outcome.terminal, Some(TerminalAction::Close));
        assert_eq!(player.health, 5);
    }

    proptest! {
        #[test]
        fn health_never_underflows(start in 0u32..10, damage in prop::collection::vec(0u32..10, 0..6)) {
            let mut player = PlayerState { health: start, ..PlayerState::default() };
            let effects: Vec<_> = damage
                .iter()
                .map(|&health| Effect::RemoveHealth { health, game_over_node_id: None })
                .collect();
            apply(&effects, &mut player);
            let total: u32 = damage.iter().sum();
            prop_assert_eq!(player.health, start.saturating_sub(total));
        }

        #[test]
        fn additions_are_idempotent(items in prop::collection::vec("[a-c]", 0..8)) {
            let mut player = PlayerState::default();
            let effects: Vec<_> = items
                .iter()
                .flat_map(|i| {
                    [
                        Effect::AddItem { item: i.clone() },
                        Effect::AddKnowledge { knowledge: i.clone() },
                    ]
                })
                .collect();
            apply(&effects, &mut player);
            let once = player.clone();
            apply(&effects, &mut player);
            prop_assert_eq!(&player, &once);

            let mut unique = items.clone();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(player.inventory.len(), unique.len());
            prop_assert_eq!(player.knowledge.len(), unique.len());
        }
    }
}
