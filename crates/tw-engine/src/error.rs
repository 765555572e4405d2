//! Error types for the session engine.

use std::path::PathBuf;

use thiserror::Error;
use tw_story::StoryError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while running a story session.
///
/// Bad player input is never an error; it resolves to
/// [`InputOutcome::Ignored`](crate::session::InputOutcome::Ignored).
#[derive(Debug, Error)]
pub enum EngineError {
    /// The story graph failed to load, or a live transition named a missing node.
    #[error(transparent)]
    Story(#[from] StoryError),

    /// The save file could not be read or written.
    #[error("storage error at {path}: {source}")]
    Storage {
        /// Path of the save file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded for storage.
    #[error("cannot encode stored value: {0}")]
    Encode(#[from] serde_json::Error),

    /// Auto-redirects kept firing without ever waiting for input.
    #[error("redirect loop: gave up after {hops} hops at node \"{node}\"")]
    RedirectLoop {
        /// Node reached when the hop limit ran out.
        node: String,
        /// Hops taken.
        hops: usize,
    },
}

impl EngineError {
    /// Whether the error is a missing node on a live path.
    pub fn is_node_not_found(&self) -> bool {
        matches!(self, EngineError::Story(StoryError::NodeNotFound(_)))
    }
}
