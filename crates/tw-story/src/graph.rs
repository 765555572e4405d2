//! The validated story graph: loading, lookup, and summary counts.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{StoryError, StoryResult};
use crate::node::{GameData, StoryNode};
use crate::validate::{ValidationIssue, validate};

/// The loaded story. Owns all nodes and indexes them by id.
///
/// A graph is only ever constructed from a document that passed
/// validation, so every reference inside it resolves.
#[derive(Debug, Clone)]
pub struct StoryGraph {
    nodes: Vec<StoryNode>,
    by_id: HashMap<String, usize>,
    warnings: Vec<ValidationIssue>,
}

/// Counts describing a story graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoryStats {
    /// Nodes in the story.
    pub nodes: usize,
    /// Choices across all nodes.
    pub choices: usize,
    /// Nodes that take free-text input.
    pub free_input_nodes: usize,
    /// Endings: nodes with neither choices nor a redirect.
    pub terminal_nodes: usize,
    /// Nodes that move on by themselves.
    pub auto_redirect_nodes: usize,
    /// Choices guarded by at least one condition.
    pub conditional_choices: usize,
}

impl StoryGraph {
    /// Parse and validate a story document.
    pub fn from_json(source: &str) -> StoryResult<Self> {
        let data: GameData = serde_json::from_str(source)?;
        Self::from_data(data)
    }

    /// Read, parse and validate a story file.
    pub fn from_path(path: impl AsRef<Path>) -> StoryResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| StoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&source)
    }

    /// Validate an already parsed document.
    pub fn from_data(data: GameData) -> StoryResult<Self> {
        if data.nodes.is_empty() {
            return Err(StoryError::Empty);
        }

        let (errors, warnings): (Vec<_>, Vec<_>) =
            validate(&data).into_iter().partition(ValidationIssue::is_error);
        if !errors.is_empty() {
            return Err(StoryError::Invalid(errors));
        }
        for issue in &warnings {
            warn!(%issue, "story warning");
        }

        let by_id = data
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();

        debug!(nodes = data.nodes.len(), "story graph loaded");
        Ok(Self {
            nodes: data.nodes,
            by_id,
            warnings,
        })
    }

    /// Look up a node by id.
    pub fn get(&self, id: &str) -> Option<&StoryNode> {
        self.by_id.get(id).map(|&i| &self.nodes[i])
    }

    /// Look up a node by id, failing when it does not exist.
    pub fn find_node(&self, id: &str) -> StoryResult<&StoryNode> {
        self.get(id)
            .ok_or_else(|| StoryError::NodeNotFound(id.to_string()))
    }

    /// Whether a node with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// The first node of the document.
    pub fn start_node(&self) -> &StoryNode {
        // from_data rejects empty documents
        &self.nodes[0]
    }

    /// All nodes in document order.
    pub fn nodes(&self) -> &[StoryNode] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a loaded graph.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Non-fatal issues found while loading.
    pub fn warnings(&self) -> &[ValidationIssue] {
        &self.warnings
    }

    /// Count nodes and choices by kind.
    pub fn stats(&self) -> StoryStats {
        let mut stats = StoryStats {
            nodes: self.nodes.len(),
            ..StoryStats::default()
        };
        for node in &self.nodes {
            stats.choices += node.choices.len();
            stats.conditional_choices += node
                .choices
                .iter()
                .filter(|c| !c.conditions.is_empty())
                .count();
            if node.is_free_input {
                stats.free_input_nodes += 1;
            }
            if node.is_auto_redirect() {
                stats.auto_redirect_nodes += 1;
            } else if node.is_terminal() {
                stats.terminal_nodes += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORY: &str = r#"{
        "$schema": "./schema.json",
        "nodes": [
            {"id": "welcome", "text": "What is your name?", "choices": [
                {"id": 1, "text": "", "nextNodeId": "hall"}
            ]},
            {"id": "hall", "text": "A hall.", "choices": [
                {"id": 1, "text": "North", "nextNodeId": "intro"},
                {"id": 2, "text": "Secret", "nextNodeId": "end",
                 "conditions": [{"type": "hasKnowledge", "knowledge": "map"}]}
            ]},
            {"id": "intro", "text": "Wind.", "autoRedirectTo": "riddle"},
            {"id": "riddle", "text": "Speak.", "isFreeInput": true, "choices": [
                {"id": 1, "text": "torch", "nextNodeId": "end", "matchKeyword": "torch"}
            ]},
            {"id": "end", "text": "The end."}
        ]
    }"#;

    #[test]
    fn load_and_lookup() {
        let graph = StoryGraph::from_json(STORY).unwrap();
        assert_eq!(graph.len(), 5);
        assert_eq!(graph.start_node().id, "welcome");
        assert_eq!(graph.find_node("riddle").unwrap().text, "Speak.");
        assert!(graph.get("cellar").is_none());
        assert!(graph.contains("end"));
        assert!(graph.warnings().is_empty());
    }

    #[test]
    fn missing_node_is_an_error() {
        let graph = StoryGraph::from_json(STORY).unwrap();
        let err = graph.find_node("cellar").unwrap_err();
        assert!(matches!(err, StoryError::NodeNotFound(ref id) if id == "cellar"));
    }

    #[test]
    fn empty_story_rejected() {
        let err = StoryGraph::from_json(r#"{"nodes": []}"#).unwrap_err();
        assert!(matches!(err, StoryError::Empty));
    }

    #[test]
    fn malformed_json_rejected() {
        let err = StoryGraph::from_json(r#"{"nodes": [{"id": 1}]}"#).unwrap_err();
        assert!(matches!(err, StoryError::Malformed(_)));
    }

    #[test]
    fn dangling_reference_rejected() {
        let err = StoryGraph::from_json(
            r#"{"nodes": [{"id": "a", "text": "", "choices": [
                {"id": 1, "text": "x", "nextNodeId": "b"}
            ]}]}"#,
        )
        .unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @r#"story failed validation with 1 issue(s); first: error: /nodes/0/choices/0/nextNodeId: references unknown node "b""#
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = StoryGraph::from_path("/nonexistent/story.json").unwrap_err();
        assert!(matches!(err, StoryError::Io { .. }));
    }

    #[test]
    fn stats_count_node_kinds() {
        let graph = StoryGraph::from_json(STORY).unwrap();
        assert_eq!(
            graph.stats(),
            StoryStats {
                nodes: 5,
                choices: 4,
                free_input_nodes: 1,
                terminal_nodes: 1,
                auto_redirect_nodes: 1,
                conditional_choices: 1,
            }
        );
    }
}
