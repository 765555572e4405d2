//! Errors raised while loading or querying a story.

use std::path::PathBuf;

use crate::validate::ValidationIssue;

/// Alias for `Result<T, StoryError>`.
pub type StoryResult<T> = Result<T, StoryError>;

/// Errors that can occur when loading or querying a story graph.
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    /// The story file could not be read.
    #[error("cannot read story file {path}: {source}")]
    Io {
        /// Path of the story file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The story document is not valid JSON or does not match the node schema.
    #[error("malformed story data: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The story document contains no nodes.
    #[error("story contains no nodes")]
    Empty,

    /// The story parsed but violates graph invariants.
    #[error("story failed validation with {} issue(s); first: {}", .0.len(), first_issue(.0))]
    Invalid(Vec<ValidationIssue>),

    /// A node id could not be resolved.
    #[error("node not found: \"{0}\"")]
    NodeNotFound(String),
}

fn first_issue(issues: &[ValidationIssue]) -> String {
    issues
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}
