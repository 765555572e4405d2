//! Structural validation of story documents.
//!
//! Checks that node ids are unique, choice ids are unique within a node,
//! and every node reference resolves. Issue paths use JSON-pointer style
//! so authors can find them in the source document.

use std::collections::HashSet;
use std::fmt;

use crate::choice::Effect;
use crate::node::GameData;

/// Node entered on death when no `gameOverNodeId` override applies.
pub const DEFAULT_GAME_OVER_NODE: &str = "game-over";

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The story cannot be played.
    Error,
    /// The story plays, but probably not as intended.
    Warning,
}

/// A problem found in a story document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// JSON-pointer style location, e.g. `/nodes/2/choices/0/nextNodeId`.
    pub path: String,
    /// A human-readable description of the issue.
    pub message: String,
    /// Error or warning.
    pub severity: Severity,
}

impl ValidationIssue {
    fn error(path: String, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    fn warning(path: String, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    /// Whether this issue prevents the story from loading.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level}: {}: {}", self.path, self.message)
    }
}

/// Validate a story document. Returns every issue found, errors and warnings.
pub fn validate(data: &GameData) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut ids = HashSet::new();
    for (n, node) in data.nodes.iter().enumerate() {
        if node.id.trim().is_empty() {
            issues.push(ValidationIssue::error(
                format!("/nodes/{n}/id"),
                "node id is empty",
            ));
        }
        if !ids.insert(node.id.as_str()) {
            issues.push(ValidationIssue::error(
                format!("/nodes/{n}/id"),
                format!("duplicate node id \"{}\"", node.id),
            ));
        }
    }

    for (n, node) in data.nodes.iter().enumerate() {
        for (field, target) in node.references() {
            if !ids.contains(target) {
                issues.push(ValidationIssue::error(
                    format!("/nodes/{n}/{field}"),
                    format!("references unknown node \"{target}\""),
                ));
            }
        }

        if node.is_auto_redirect() && !node.choices.is_empty() {
            issues.push(ValidationIssue::warning(
                format!("/nodes/{n}/choices"),
                "choices are never shown on an auto-redirect node",
            ));
        }

        let mut choice_ids = HashSet::new();
        for (c, choice) in node.choices.iter().enumerate() {
            let base = format!("/nodes/{n}/choices/{c}");

            if !choice_ids.insert(&choice.id) {
                issues.push(ValidationIssue::error(
                    format!("{base}/id"),
                    format!("duplicate choice id \"{}\" in node \"{}\"", choice.id, node.id),
                ));
            }

            for (field, target) in choice.references() {
                if !ids.contains(target) {
                    issues.push(ValidationIssue::error(
                        format!("{base}/{field}"),
                        format!("references unknown node \"{target}\""),
                    ));
                }
            }

            match (&choice.alt_next_node_id, choice.alt_redirect_threshold) {
                (Some(_), None) => issues.push(ValidationIssue::error(
                    format!("{base}/altNextNodeId"),
                    "altNextNodeId requires altRedirectThreshold",
                )),
                (None, Some(_)) => issues.push(ValidationIssue::error(
                    format!("{base}/altRedirectThreshold"),
                    "altRedirectThreshold requires altNextNodeId",
                )),
                (_, Some(0)) => issues.push(ValidationIssue::error(
                    format!("{base}/altRedirectThreshold"),
                    "altRedirectThreshold must be at least 1",
                )),
                _ => {}
            }

            if !ids.contains(DEFAULT_GAME_OVER_NODE) {
                for (e, effect) in choice.effects.iter().enumerate() {
                    if matches!(effect, Effect::RemoveHealth { .. }) && effect.game_over_node().is_none() {
                        issues.push(ValidationIssue::warning(
                            format!("{base}/effects/{e}"),
                            format!(
                                "removeHealth has no gameOverNodeId and there is no \"{DEFAULT_GAME_OVER_NODE}\" node"
                            ),
                        ));
                    }
                }
            }

            if choice.exact_match && choice.match_keyword.is_none() {
                issues.push(ValidationIssue::warning(
                    format!("{base}/exactMatch"),
                    "exactMatch has no effect without matchKeyword",
                ));
            }
        }

        if node.is_free_input {
            let fallbacks = node
                .choices
                .iter()
                .filter(|c| c.match_keyword.is_none())
                .count();
            if fallbacks > 1 {
                issues.push(ValidationIssue::warning(
                    format!("/nodes/{n}/choices"),
                    format!("{fallbacks} choices without matchKeyword; only the first is used as fallback"),
                ));
            }
        }
    }

    issues
}
