//! Conditions gating choice visibility.

use serde::{Deserialize, Serialize};

/// A predicate over player state and visit history.
///
/// Thresholds are inclusive: `HasHealth { health: 2 }` holds at 2 or more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Condition {
    /// The player carries the item.
    HasItem {
        /// Item id.
        item: String,
    },
    /// The player does not carry the item.
    HasNotItem {
        /// Item id.
        item: String,
    },
    /// The player knows the fact.
    HasKnowledge {
        /// Knowledge id.
        knowledge: String,
    },
    /// The player does not know the fact.
    HasNotKnowledge {
        /// Knowledge id.
        knowledge: String,
    },
    /// Health is at least the given value.
    HasHealth {
        /// Minimum health.
        health: u32,
    },
    /// Moral points are at least the given value.
    HasMoralPoints {
        /// Minimum moral points.
        #[serde(rename = "moralPoints")]
        moral_points: i64,
    },
    /// The choice's destination has never been visited.
    HasNotVisitedNextNode,
    /// A condition type this engine does not know. Always holds.
    #[serde(other)]
    Unknown,
}
