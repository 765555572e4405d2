//! The scrollback shown to the player.

use std::fmt;

use tw_story::{Choice, PlayerState, StoryNode};

use crate::translate::{Translator, keys};

/// One line of scrollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayLine {
    /// Node narration, possibly still being written.
    Narration(String),
    /// A rendered choice, or an empty placeholder on input nodes.
    Choice(String),
    /// The player's input, echoed back.
    Echo(String),
    /// Blank separator between nodes.
    Spacer,
}

impl DisplayLine {
    /// Whether this is a choice line or placeholder.
    pub fn is_choice(&self) -> bool {
        matches!(self, DisplayLine::Choice(_))
    }
}

impl fmt::Display for DisplayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayLine::Narration(text) | DisplayLine::Choice(text) => f.write_str(text),
            DisplayLine::Echo(text) => write!(f, "> {text}"),
            DisplayLine::Spacer => Ok(()),
        }
    }
}

/// Ordered scrollback with a revision counter that bumps on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayBuffer {
    lines: Vec<DisplayLine>,
    revision: u64,
}

impl DisplayBuffer {
    /// An empty buffer at revision 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines, oldest first.
    pub fn lines(&self) -> &[DisplayLine] {
        &self.lines
    }

    /// Bumped on every mutation. Front ends redraw when it changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no line has been pushed since the last clear.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Append a line and return its index.
    pub fn push(&mut self, line: DisplayLine) -> usize {
        self.lines.push(line);
        self.touch();
        self.lines.len() - 1
    }

    /// Append a spacer unless the buffer is empty.
    pub fn push_spacer(&mut self) {
        if !self.lines.is_empty() {
            self.push(DisplayLine::Spacer);
        }
    }

    /// Replace the text of the narration at `index`. Other lines are left alone.
    pub fn set_narration(&mut self, index: usize, text: &str) {
        if let Some(DisplayLine::Narration(current)) = self.lines.get_mut(index)
            && current != text
        {
            text.clone_into(current);
            self.touch();
        }
    }

    /// Remove the trailing block of choice lines.
    pub fn remove_choices(&mut self) {
        let keep = self
            .lines
            .iter()
            .rposition(|l| !l.is_choice())
            .map_or(0, |i| i + 1);
        if keep < self.lines.len() {
            self.lines.truncate(keep);
            self.touch();
        }
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.touch();
    }

    /// Render every line, one per row.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

/// Pick the narration for `node`.
///
/// Knowledge-gated text wins over repeat-visit text, which wins over the
/// base text. `visited` must already end with this visit: the node counts
/// as visited before only if it appears earlier in the list.
pub fn choose_text_to_display<'a>(
    node: &'a StoryNode,
    player: &PlayerState,
    visited: &[String],
) -> &'a str {
    if let (Some(text), Some(knowledge)) = (&node.alt_text_if_knowledge, &node.knowledge_for_alt_text)
        && player.has_knowledge(knowledge)
    {
        return text;
    }

    let earlier = &visited[..visited.len().saturating_sub(1)];
    if let Some(text) = &node.alt_text_if_visited
        && earlier.iter().any(|v| *v == node.id)
    {
        return text;
    }

    &node.text
}

/// Choice lines for a node, given its currently available choices.
///
/// The name-entry node gets one empty placeholder, free-input nodes one per
/// available choice. A node with nothing available offers a single way out.
pub fn render_choices(
    node: &StoryNode,
    available: &[&Choice],
    name_entry: bool,
    translator: &dyn Translator,
) -> Vec<DisplayLine> {
    if name_entry {
        return vec![DisplayLine::Choice(String::new())];
    }
    if available.is_empty() {
        return vec![DisplayLine::Choice(format!(
            "1. {}",
            translator.translate(keys::LEAVE)
        ))];
    }
    if node.is_free_input {
        return vec![DisplayLine::Choice(String::new()); available.len()];
    }
    available
        .iter()
        .enumerate()
        .map(|(i, choice)| DisplayLine::Choice(format!("{}. {}", i + 1, choice.text)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::filter_choices;
    use crate::translate::StaticTranslator;
    use tw_story::Condition;

    fn visited(ids: &[&str]) -> Vec<String> {
        ids.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn buffer_tracks_revisions() {
        let mut buf = DisplayBuffer::new();
        assert_eq!(buf.revision(), 0);
        buf.push_spacer();
        assert!(buf.is_empty());

        let idx = buf.push(DisplayLine::Narration(String::new()));
        buf.set_narration(idx, "Hel");
        buf.set_narration(idx, "Hel");
        assert_eq!(buf.revision(), 2);

        buf.push(DisplayLine::Choice("1. Go".to_string()));
        buf.push(DisplayLine::Choice("2. Stay".to_string()));
        buf.remove_choices();
        buf.push(DisplayLine::Echo("Go".to_string()));
        buf.push_spacer();
        buf.push(DisplayLine::Narration("Next.".to_string()));

        insta::assert_snapshot!(buf.render(), @r"
        Hel
        > Go

        Next.
        ");
    }

    #[test]
    fn remove_choices_only_trailing() {
        let mut buf = DisplayBuffer::new();
        buf.push(DisplayLine::Narration("A".to_string()));
        let before = buf.revision();
        buf.remove_choices();
        assert_eq!(buf.revision(), before);
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn alt_text_priority() {
        let node = StoryNode::new("hall", "A hall.")
            .with_alt_text_if_visited("The hall again.")
            .with_alt_text_if_knowledge("map", "You know this hall.");
        let mut player = PlayerState::default();

        assert_eq!(choose_text_to_display(&node, &player, &visited(&["hall"])), "A hall.");
        assert_eq!(
            choose_text_to_display(&node, &player, &visited(&["hall", "yard", "hall"])),
            "The hall again."
        );

        player.add_knowledge("map");
        assert_eq!(
            choose_text_to_display(&node, &player, &visited(&["hall"])),
            "You know this hall."
        );
    }

    #[test]
    fn visited_text_on_every_later_visit() {
        let node = StoryNode::new("hall", "First.").with_alt_text_if_visited("Again.");
        let player = PlayerState::default();
        let mut history = Vec::new();
        let mut seen = Vec::new();
        for _ in 0..3 {
            history.push("hall".to_string());
            seen.push(choose_text_to_display(&node, &player, &history));
        }
        assert_eq!(seen, vec!["First.", "Again.", "Again."]);
    }

    #[test]
    fn choice_rendering() {
        let translator = StaticTranslator::default();
        let node = StoryNode::new("hall", "")
            .with_choice(Choice::new(1, "North", "n"))
            .with_choice(Choice::new(2, "South", "s"));
        let available: Vec<_> = node.choices.iter().collect();

        let lines = render_choices(&node, &available, false, &translator);
        let text: Vec<_> = lines.iter().map(ToString::to_string).collect();
        assert_eq!(text, vec!["1. North", "2. South"]);

        let lines = render_choices(&node, &available[1..], false, &translator);
        assert_eq!(lines[0].to_string(), "1. South");

        let lines = render_choices(&node, &[], false, &translator);
        assert_eq!(lines, vec![DisplayLine::Choice("1. Leave".to_string())]);

        let lines = render_choices(&node, &available, true, &translator);
        assert_eq!(lines, vec![DisplayLine::Choice(String::new())]);

        let riddle = node.clone().free_input();
        let lines = render_choices(&riddle, &available, false, &translator);
        assert_eq!(lines, vec![DisplayLine::Choice(String::new()); 2]);
    }

    #[test]
    fn free_input_placeholders_follow_available_choices() {
        let translator = StaticTranslator::default();
        let riddle = StoryNode::new("riddle", "?")
            .free_input()
            .with_choice(Choice::new(1, "", "lit").with_condition(Condition::HasItem {
                item: "torch".to_string(),
            }))
            .with_choice(Choice::new(2, "", "riddle"))
            .with_choice(Choice::new(3, "", "riddle"));
        let player = PlayerState::default();
        let available = filter_choices(&riddle.choices, &player, &[]);
        assert_eq!(available.len(), 2);

        let lines = render_choices(&riddle, &available, false, &translator);
        assert_eq!(lines, vec![DisplayLine::Choice(String::new()); 2]);
    }
}
