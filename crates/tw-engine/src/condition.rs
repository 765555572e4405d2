//! Condition evaluation for choice visibility.

use tw_story::{Choice, Condition, PlayerState};

/// Evaluate one condition against the player and the visit history.
///
/// `candidate_next` is the destination of the choice that owns the
/// condition; only `HasNotVisitedNextNode` looks at it.
pub fn evaluate(
    condition: &Condition,
    player: &PlayerState,
    visited: &[String],
    candidate_next: &str,
) -> bool {
    match condition {
        Condition::HasItem { item } => player.has_item(item),
        Condition::HasNotItem { item } => !player.has_item(item),
        Condition::HasKnowledge { knowledge } => player.has_knowledge(knowledge),
        Condition::HasNotKnowledge { knowledge } => !player.has_knowledge(knowledge),
        Condition::HasHealth { health } => player.health >= *health,
        Condition::HasMoralPoints { moral_points } => player.moral_points >= *moral_points,
        Condition::HasNotVisitedNextNode => !visited.iter().any(|v| v == candidate_next),
        Condition::Unknown => true,
    }
}

/// Whether every condition on the choice holds. A choice without conditions is always available.
pub fn is_available(choice: &Choice, player: &PlayerState, visited: &[String]) -> bool {
    choice
        .conditions
        .iter()
        .all(|c| evaluate(c, player, visited, &choice.next_node_id))
}

/// The choices the player may currently see, in authored order.
pub fn filter_choices<'a>(
    choices: &'a [Choice],
    player: &PlayerState,
    visited: &[String],
) -> Vec<&'a Choice> {
    choices
        .iter()
        .filter(|c| is_available(c, player, visited))
        .collect()
}
