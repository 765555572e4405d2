//! Story model for Taleweaver: nodes, choices, conditions, effects, and player state.
//!
//! A story is a JSON document of nodes linked by choices. This crate parses
//! and validates that document into a [`StoryGraph`]. It knows nothing about
//! sessions or input; see `tw-engine` for that.

/// Choices and the conditions and effects attached to them.
pub mod choice;
/// Error types used throughout the crate.
pub mod error;
/// The validated, indexed story graph.
pub mod graph;
/// Story nodes and the top-level document.
pub mod node;
/// Player state mutated by effects.
pub mod player;
/// Structural validation of story documents.
pub mod validate;

/// Re-export choice types.
pub use choice::{Choice, ChoiceId, Condition, Effect};
/// Re-export error types.
pub use error::{StoryError, StoryResult};
/// Re-export graph types.
pub use graph::{StoryGraph, StoryStats};
/// Re-export node types.
pub use node::{GameData, Sfx, StoryNode, Vfx};
/// Re-export player state.
pub use player::PlayerState;
/// Re-export validation types.
pub use validate::{DEFAULT_GAME_OVER_NODE, Severity, ValidationIssue, validate};
