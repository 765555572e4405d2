//! Narrative session engine for Taleweaver.
//!
//! Drives a [`tw_story::StoryGraph`]: evaluates choice conditions, resolves
//! numbered and free-text input, applies effects, paces narration with a
//! typewriter, and saves progress so a session can be rebuilt later by
//! replaying its history.

/// Condition evaluation for choice visibility.
pub mod condition;
/// Engine configuration and player settings.
pub mod config;
/// Scrollback lines and narration selection.
pub mod display;
/// Applying effects to player state.
pub mod effect;
/// Error types for the engine.
pub mod error;
/// Append-only playthrough logs.
pub mod history;
/// Fuzzy keyword matching.
pub mod matcher;
/// Key-value persistence of session progress.
pub mod persistence;
/// Sound and visual effect playback.
pub mod playback;
/// Input resolution and pick planning.
pub mod resolver;
/// The story session state machine.
pub mod session;
/// UI string translation.
pub mod translate;
/// Time-driven text reveal.
pub mod typewriter;

pub use config::{EngineConfig, Settings};
pub use display::{DisplayBuffer, DisplayLine};
pub use error::{EngineError, EngineResult};
pub use history::SessionHistory;
pub use matcher::{FuzzyMatcher, KeywordMatcher};
pub use persistence::{JsonFileStorage, MemoryStorage, PersistenceGateway, Storage, StorageKey};
pub use playback::{EffectsPlayer, NoopEffects};
pub use session::{InputOutcome, Phase, Session, SessionEvent};
pub use translate::{StaticTranslator, Translator};
pub use typewriter::Typewriter;
