//! Append-only logs that record a playthrough.

use serde::{Deserialize, Serialize};

/// Everything needed to replay a session from the start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionHistory {
    /// Node ids in visit order. Repeats are kept.
    pub visited_nodes: Vec<String>,
    /// `"nodeId:choiceId"` for every pick, in order.
    pub choice_history: Vec<String>,
    /// Accepted free-text inputs, in order.
    pub free_inputs: Vec<String>,
}

impl SessionHistory {
    /// How often `key` was picked.
    pub fn pick_count(&self, key: &str) -> usize {
        self.choice_history.iter().filter(|k| *k == key).count()
    }

    /// Forget the whole playthrough.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_counts() {
        let history = SessionHistory {
            visited_nodes: vec!["a".into(), "b".into(), "a".into()],
            choice_history: vec!["a:1".into(), "b:2".into()],
            free_inputs: Vec::new(),
        };
        assert_eq!(history.pick_count("a:1"), 1);
        assert_eq!(history.pick_count("a:2"), 0);
        assert_eq!(history.pick_count("b:2"), 1);
    }
}
