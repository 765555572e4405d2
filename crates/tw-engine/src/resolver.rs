//! Turning raw player input into a decision about the current node.

use tw_story::{Choice, PlayerState, StoryNode};

use crate::condition::filter_choices;
use crate::config::EngineConfig;
use crate::history::SessionHistory;
use crate::matcher::{FuzzyMatcher, KeywordMatcher};

/// Strip markup tags, trim, and cut to at most `max_chars` characters.
pub fn sanitize(input: &str, max_chars: usize) -> String {
    let mut text = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.trim()
        .chars()
        .take(max_chars)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// What a line of input means on the current node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing happens.
    Ignored,
    /// Wipe the session and start over.
    Reset,
    /// The player entered their name; continue to `next`.
    Name {
        /// Sanitized name.
        name: String,
        /// Destination node.
        next: String,
    },
    /// A choice was picked.
    Pick {
        /// Index into the node's `choices`.
        index: usize,
        /// Text echoed back to the player.
        echo: String,
        /// The accepted free-text input, on free-input nodes.
        free_input: Option<String>,
    },
}

/// Resolves input against a node, given the player's state.
pub struct InputResolver {
    matcher: Box<dyn KeywordMatcher>,
    name_max_chars: usize,
    free_input_max_chars: usize,
    keyword_length_ratio: f64,
    match_threshold: f64,
}

impl InputResolver {
    /// Create a resolver with the default fuzzy matcher.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_matcher(config, Box::new(FuzzyMatcher))
    }

    /// Create a resolver with a custom keyword matcher.
    pub fn with_matcher(config: &EngineConfig, matcher: Box<dyn KeywordMatcher>) -> Self {
        Self {
            matcher,
            name_max_chars: config.name_max_chars,
            free_input_max_chars: config.free_input_max_chars,
            keyword_length_ratio: config.keyword_length_ratio,
            match_threshold: config.match_threshold,
        }
    }

    /// Pick up new limits from `config`, keeping the matcher.
    pub fn configure(&mut self, config: &EngineConfig) {
        self.name_max_chars = config.name_max_chars;
        self.free_input_max_chars = config.free_input_max_chars;
        self.keyword_length_ratio = config.keyword_length_ratio;
        self.match_threshold = config.match_threshold;
    }

    /// Decide what `raw` means on `node`.
    ///
    /// Terminal nodes reset on any input and the name-entry node takes a
    /// name. When no choice is available only `1` (leave) is understood.
    /// Free-input nodes match keywords; other nodes expect a 1-based number.
    pub fn resolve(
        &self,
        node: &StoryNode,
        raw: &str,
        player: &PlayerState,
        visited: &[String],
        name_entry: bool,
    ) -> Resolution {
        let cleaned = sanitize(raw, usize::MAX);
        if cleaned.is_empty() {
            return Resolution::Ignored;
        }

        if node.is_terminal() {
            return Resolution::Reset;
        }

        if name_entry {
            let name = sanitize(raw, self.name_max_chars);
            return match node.choices.first() {
                Some(first) if !name.is_empty() => Resolution::Name {
                    name,
                    next: first.next_node_id.clone(),
                },
                _ => Resolution::Ignored,
            };
        }

        let available = filter_choices(&node.choices, player, visited);

        if available.is_empty() {
            return match cleaned.parse::<usize>() {
                Ok(1) => Resolution::Reset,
                _ => Resolution::Ignored,
            };
        }

        if node.is_free_input {
            return self.resolve_free_input(node, raw, &available);
        }

        match cleaned.parse::<usize>() {
            Ok(n) if (1..=available.len()).contains(&n) => {
                let choice = available[n - 1];
                Resolution::Pick {
                    index: index_of(node, choice),
                    echo: choice.text.clone(),
                    free_input: None,
                }
            }
            _ => Resolution::Ignored,
        }
    }

    fn resolve_free_input(&self, node: &StoryNode, raw: &str, available: &[&Choice]) -> Resolution {
        let input = sanitize(raw, self.free_input_max_chars);
        if input.is_empty() {
            return Resolution::Ignored;
        }

        let accepted = self
            .best_match(&input, available)
            .filter(|&(choice, score)| self.accepts(&input, choice, score))
            .map(|(choice, _)| choice)
            .or_else(|| {
                available
                    .iter()
                    .copied()
                    .find(|c| c.match_keyword.is_none())
            });

        match accepted {
            Some(choice) => Resolution::Pick {
                index: index_of(node, choice),
                echo: input.clone(),
                free_input: Some(input),
            },
            None => Resolution::Ignored,
        }
    }

    /// The keyword choice scoring best against `input`, if any scores within the threshold.
    pub fn best_match<'a>(&self, input: &str, available: &[&'a Choice]) -> Option<(&'a Choice, f64)> {
        let mut best: Option<(&'a Choice, f64)> = None;
        for &choice in available {
            let Some(keyword) = &choice.match_keyword else {
                continue;
            };
            let score = self.matcher.score(input, keyword);
            if score <= self.match_threshold && best.is_none_or(|(_, s)| score < s) {
                best = Some((choice, score));
            }
        }
        best
    }

    fn accepts(&self, input: &str, choice: &Choice, score: f64) -> bool {
        if choice.exact_match {
            return score <= 0.0;
        }
        let keyword_len = choice
            .match_keyword
            .as_deref()
            .map_or(0, |k| k.chars().count());
        input.chars().count() as f64 >= self.keyword_length_ratio * keyword_len as f64
    }
}

fn index_of(node: &StoryNode, choice: &Choice) -> usize {
    node.choices
        .iter()
        .position(|c| std::ptr::eq(c, choice))
        .unwrap_or_default()
}

/// How a pick plays out, given the choice history including this pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickPlan {
    /// The `"nodeId:choiceId"` history record.
    pub key: String,
    /// How often this choice has been picked, this pick included.
    pub pick_count: usize,
    /// Whether the alternate destination applies.
    pub threshold_hit: bool,
    /// Extra narration shown on the second pick.
    pub repeat_text: Option<String>,
    /// Where the pick leads, before any game-over override.
    pub destination: String,
}

/// Plan a pick of `choice` on `node_id`. `history` must already contain this pick.
pub fn plan_pick(node_id: &str, choice: &Choice, history: &SessionHistory) -> PickPlan {
    let key = choice.pick_key(node_id);
    let pick_count = history.pick_count(&key);

    let alt_target = match (&choice.alt_next_node_id, choice.alt_redirect_threshold) {
        (Some(target), Some(threshold)) if pick_count >= threshold as usize => Some(target),
        _ => None,
    };
    let threshold_hit = alt_target.is_some();

    let repeat_text = choice
        .alt_text_on_choice_repeat
        .clone()
        .filter(|_| pick_count == 2 && !threshold_hit);

    PickPlan {
        destination: alt_target.unwrap_or(&choice.next_node_id).clone(),
        key,
        pick_count,
        threshold_hit,
        repeat_text,
    }
}
