//! The story session: current position, scrollback, and transitions.
//!
//! A [`Session`] is driven entirely by its caller. Input arrives through
//! [`Session::send_input`], time through [`Session::advance`], and the
//! caller redraws when [`DisplayBuffer::revision`] changes or
//! [`Session::drain_events`] returns something.

use std::mem;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info, warn};
use tw_story::{Choice, PlayerState, StoryGraph, StoryNode};

use crate::condition::filter_choices;
use crate::config::{EngineConfig, Settings};
use crate::display::{DisplayBuffer, DisplayLine, choose_text_to_display, render_choices};
use crate::effect::{self, TerminalAction};
use crate::error::{EngineError, EngineResult};
use crate::history::SessionHistory;
use crate::matcher::KeywordMatcher;
use crate::persistence::{PersistenceGateway, Storage, StorageKey};
use crate::playback::{EffectsPlayer, NoopEffects};
use crate::resolver::{InputResolver, Resolution, plan_pick};
use crate::translate::{StaticTranslator, Translator};
use crate::typewriter::{Typewriter, format_text};

/// Where the session is in its node cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not started.
    Idle,
    /// The typewriter is revealing narration.
    Writing,
    /// Choices are shown and input is accepted.
    AwaitingInput,
    /// Waiting to move on to the node's redirect target.
    AutoRedirecting,
    /// The story was closed by an effect.
    Closed,
}

/// Something front ends may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A node was entered and its narration started.
    NodeEntered {
        /// Node id.
        id: String,
    },
    /// Choices for the node are on screen.
    ChoicesShown {
        /// Node id.
        node: String,
    },
    /// Everything but the settings was wiped.
    Restarted,
    /// The story ended.
    Closed,
}

/// What a line of input did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Nothing. The input didn't mean anything here.
    Ignored,
    /// Input isn't accepted while text is being written or a redirect is pending.
    Busy,
    /// The session moved to another node.
    Advanced {
        /// The node entered.
        node: String,
    },
    /// The session was reset to the start.
    Restarted,
    /// The session ended.
    Closed,
}

#[derive(Debug, Clone)]
struct PendingRedirect {
    target: String,
    remaining: Duration,
}

/// An interactive story session.
pub struct Session {
    graph: Rc<StoryGraph>,
    config: EngineConfig,
    settings: Settings,
    player: PlayerState,
    history: SessionHistory,
    display: DisplayBuffer,
    current: Option<String>,
    phase: Phase,
    writer: Option<Typewriter>,
    narration_line: usize,
    redirect: Option<PendingRedirect>,
    store: PersistenceGateway,
    effects: Box<dyn EffectsPlayer>,
    translator: Box<dyn Translator>,
    resolver: InputResolver,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Create a session over `graph`, saving progress to `storage`.
    ///
    /// Nothing happens until [`start`](Self::start) is called.
    pub fn new(graph: StoryGraph, storage: impl Storage + 'static) -> Self {
        let config = EngineConfig::default();
        Self {
            graph: Rc::new(graph),
            settings: Settings::from_config(&config),
            player: PlayerState::with_health(config.default_health),
            resolver: InputResolver::new(&config),
            config,
            history: SessionHistory::default(),
            display: DisplayBuffer::new(),
            current: None,
            phase: Phase::Idle,
            writer: None,
            narration_line: 0,
            redirect: None,
            store: PersistenceGateway::new(Box::new(storage)),
            effects: Box::new(NoopEffects),
            translator: Box::new(StaticTranslator::default()),
            events: Vec::new(),
        }
    }

    /// Use a custom configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.resolver.configure(&config);
        self.settings = Settings::from_config(&config);
        self.player = PlayerState::with_health(config.default_health);
        self.config = config;
        self
    }

    /// Play effects through `effects`.
    pub fn with_effects(mut self, effects: impl EffectsPlayer + 'static) -> Self {
        self.effects = Box::new(effects);
        self
    }

    /// Translate UI strings through `translator`.
    pub fn with_translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Box::new(translator);
        self
    }

    /// Match free-text input with `matcher`.
    pub fn with_matcher(mut self, matcher: impl KeywordMatcher + 'static) -> Self {
        self.resolver = InputResolver::with_matcher(&self.config, Box::new(matcher));
        self
    }

    /// The story being played.
    pub fn graph(&self) -> &StoryGraph {
        &self.graph
    }

    /// Engine tuning in effect.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Player settings, as loaded or last updated.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current player state.
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// The playthrough so far.
    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Scrollback to draw.
    pub fn display(&self) -> &DisplayBuffer {
        &self.display
    }

    /// Where the session is in its node cycle.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a close effect ended the story.
    pub fn is_closed(&self) -> bool {
        self.phase == Phase::Closed
    }

    /// The node the player is on.
    pub fn current_node(&self) -> Option<&StoryNode> {
        self.current.as_deref().and_then(|id| self.graph.get(id))
    }

    /// Take the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        mem::take(&mut self.events)
    }

    /// Load saved progress and enter the current node.
    ///
    /// With a saved path the session is rebuilt by replaying it; otherwise
    /// the story starts at its first node.
    pub fn start(&mut self) -> EngineResult<()> {
        if let Some(settings) = self.store.load_settings() {
            self.settings = settings;
        }

        let visited = self.store.load_log(StorageKey::VisitedNodes);
        let Some(last) = visited.last().cloned() else {
            info!(story_nodes = self.graph.len(), "starting new session");
            return self.enter_start_node();
        };
        if !self.graph.contains(&last) {
            warn!(node = %last, "saved position no longer exists, starting over");
            return self.clear_all_and_restart();
        }

        if let Some(saved) = self.store.load_player() {
            self.player.name = saved.name;
        }
        self.history = SessionHistory {
            visited_nodes: visited.clone(),
            choice_history: self.store.load_log(StorageKey::ChoiceHistory),
            free_inputs: self.store.load_log(StorageKey::FreeInputsHistory),
        };

        info!(node = %last, steps = visited.len(), "resuming session");
        self.traverse_nodes(&visited);
        self.set_current_node(&last, false)
    }

    /// Rebuild player state and scrollback by replaying `path`.
    ///
    /// Every entry but the last is replayed; the caller enters the last one.
    /// Entries naming unknown nodes are skipped. Recorded picks that did not
    /// move the story, such as a pick that closed it, still count towards
    /// pick totals but are neither echoed nor applied.
    pub fn traverse_nodes(&mut self, path: &[String]) {
        let graph = Rc::clone(&self.graph);
        self.player = self.player.reset_keeping_name(self.config.default_health);
        self.display.clear();
        self.writer = None;
        self.redirect = None;

        let mut replayed = SessionHistory::default();
        let mut pick_cursor = 0;
        let mut free_cursor = 0;

        for (i, id) in path.iter().enumerate().take(path.len().saturating_sub(1)) {
            let Some(node) = graph.get(id) else {
                warn!(node = %id, "skipping unknown node in saved path");
                continue;
            };
            replayed.visited_nodes.push(id.clone());
            self.display.push_spacer();
            let text = choose_text_to_display(node, &self.player, &replayed.visited_nodes);
            self.display.push(DisplayLine::Narration(format_text(text)));

            if node.is_auto_redirect() || node.is_terminal() {
                continue;
            }
            if self.is_name_entry(id) {
                self.display.push(DisplayLine::Echo(self.player.name.clone()));
                continue;
            }

            let next = path[i + 1].as_str();
            let available = filter_choices(&node.choices, &self.player, &replayed.visited_nodes);
            let mut picked = None;
            while let Some(record) = self.history.choice_history.get(pick_cursor) {
                if !is_pick_on(record, id) {
                    break;
                }
                pick_cursor += 1;
                let recorded = available
                    .iter()
                    .copied()
                    .find(|c| c.pick_key(id) == *record);
                if let Some(choice) = recorded.filter(|c| self.explains_step(c, next)) {
                    picked = Some(choice);
                    break;
                }
                debug!(node = %id, %record, "skipping pick that did not lead on");
                replayed.choice_history.push(record.clone());
                if node.is_free_input {
                    free_cursor += 1;
                }
            }
            let Some(choice) = picked.or_else(|| {
                available
                    .iter()
                    .copied()
                    .find(|c| self.explains_step(c, next))
            }) else {
                debug!(node = %id, "no choice explains the next step, replaying text only");
                continue;
            };

            let echo = if node.is_free_input {
                free_cursor += 1;
                self.history
                    .free_inputs
                    .get(free_cursor - 1)
                    .cloned()
                    .unwrap_or_else(|| choice.text.clone())
            } else {
                choice.text.clone()
            };
            replayed.choice_history.push(choice.pick_key(id));
            let plan = plan_pick(id, choice, &replayed);

            self.display.push(DisplayLine::Echo(echo));
            if let Some(text) = plan.repeat_text {
                self.display.push(DisplayLine::Narration(format_text(&text)));
            }
            effect::apply(&choice.effects, &mut self.player);
        }
    }

    /// Whether picking `choice` in the current player state could have led to `next`.
    fn explains_step(&self, choice: &Choice, next: &str) -> bool {
        let mut player = self.player.clone();
        if effect::apply(&choice.effects, &mut player).terminal.is_some() {
            return false;
        }
        if player.is_dead() {
            return player
                .game_over_node
                .as_deref()
                .unwrap_or(&self.config.game_over_node)
                == next;
        }
        choice.leads_to(next)
    }

    /// Enter a node. With `record`, the visit is appended to the history and saved.
    pub fn set_current_node(&mut self, id: &str, record: bool) -> EngineResult<()> {
        let graph = Rc::clone(&self.graph);
        let node = graph.find_node(id)?;

        if record {
            self.history.visited_nodes.push(id.to_string());
            self.store
                .save(StorageKey::VisitedNodes, &self.history.visited_nodes)?;
            self.store.save(StorageKey::CurrentNode, id)?;
        }
        debug!(node = %id, record, "entering node");

        self.current = Some(id.to_string());
        self.redirect = None;
        self.display.push_spacer();

        self.effects.clear_visual_effects();
        if self.settings.sfx_enabled {
            self.effects.play_sound(node.sfx.unwrap_or_default());
        }
        if let Some(vfx) = node.vfx {
            self.effects.play_visual_effect(vfx);
        }

        let text = choose_text_to_display(node, &self.player, &self.history.visited_nodes);
        let writer = Typewriter::new(
            text,
            Duration::from_millis(self.settings.typewriter_speed_ms),
            Duration::from_millis(self.config.line_break_delay_ms),
            self.config.word_mode,
        );
        self.narration_line = self
            .display
            .push(DisplayLine::Narration(writer.text().to_string()));
        let finished = writer.is_finished();
        self.writer = Some(writer);
        self.phase = Phase::Writing;
        self.events.push(SessionEvent::NodeEntered { id: id.to_string() });

        if finished {
            self.finish_writing();
        }
        Ok(())
    }

    /// Handle a line of player input.
    pub fn send_input(&mut self, raw: &str) -> EngineResult<InputOutcome> {
        match self.phase {
            Phase::Writing | Phase::AutoRedirecting => return Ok(InputOutcome::Busy),
            Phase::Idle | Phase::Closed => return Ok(InputOutcome::Ignored),
            Phase::AwaitingInput => {}
        }

        let graph = Rc::clone(&self.graph);
        let Some(node) = self.current.as_deref().and_then(|id| graph.get(id)) else {
            return Ok(InputOutcome::Ignored);
        };

        let name_entry = self.is_name_entry(&node.id);
        let resolution = self.resolver.resolve(
            node,
            raw,
            &self.player,
            &self.history.visited_nodes,
            name_entry,
        );

        match resolution {
            Resolution::Ignored => {
                debug!(node = %node.id, "input ignored");
                Ok(InputOutcome::Ignored)
            }
            Resolution::Reset => {
                self.clear_all_and_restart()?;
                Ok(InputOutcome::Restarted)
            }
            Resolution::Name { name, next } => self.enter_name(name, &next),
            Resolution::Pick {
                index,
                echo,
                free_input,
            } => self.pick(node, &node.choices[index], echo, free_input),
        }
    }

    fn enter_name(&mut self, name: String, next: &str) -> EngineResult<InputOutcome> {
        debug!(%name, "player named");
        self.player.name.clone_from(&name);
        self.store.save(StorageKey::Player, &self.player)?;

        self.display.remove_choices();
        self.display.push(DisplayLine::Echo(name));
        self.set_current_node(next, true)?;
        Ok(InputOutcome::Advanced {
            node: next.to_string(),
        })
    }

    fn pick(
        &mut self,
        node: &StoryNode,
        choice: &Choice,
        echo: String,
        free_input: Option<String>,
    ) -> EngineResult<InputOutcome> {
        self.history.choice_history.push(choice.pick_key(&node.id));
        self.store
            .save(StorageKey::ChoiceHistory, &self.history.choice_history)?;
        if let Some(input) = free_input {
            self.history.free_inputs.push(input);
            self.store
                .save(StorageKey::FreeInputsHistory, &self.history.free_inputs)?;
        }

        let plan = plan_pick(&node.id, choice, &self.history);
        debug!(
            key = %plan.key,
            pick_count = plan.pick_count,
            threshold_hit = plan.threshold_hit,
            "choice picked"
        );

        self.display.remove_choices();
        self.display.push(DisplayLine::Echo(echo));
        if let Some(text) = &plan.repeat_text {
            self.display.push(DisplayLine::Narration(format_text(text)));
        }

        let outcome = effect::apply(&choice.effects, &mut self.player);
        self.store.save(StorageKey::Player, &self.player)?;

        match outcome.terminal {
            Some(TerminalAction::Restart) => {
                self.clear_all_and_restart()?;
                return Ok(InputOutcome::Restarted);
            }
            Some(TerminalAction::Close) => {
                self.close();
                return Ok(InputOutcome::Closed);
            }
            None => {}
        }

        let destination = if self.player.is_dead() {
            self.player
                .game_over_node
                .clone()
                .unwrap_or_else(|| self.config.game_over_node.clone())
        } else {
            plan.destination
        };
        self.set_current_node(&destination, true)?;
        Ok(InputOutcome::Advanced { node: destination })
    }

    /// Feed elapsed time to the typewriter or the pending redirect.
    pub fn advance(&mut self, elapsed: Duration) -> EngineResult<()> {
        match self.phase {
            Phase::Writing => {
                if let Some(writer) = &mut self.writer
                    && writer.advance(elapsed)
                {
                    self.display.set_narration(self.narration_line, writer.text());
                }
                if self.writer.as_ref().is_some_and(Typewriter::is_finished) {
                    self.finish_writing();
                }
            }
            Phase::AutoRedirecting => {
                if let Some(pending) = &mut self.redirect {
                    pending.remaining = pending.remaining.saturating_sub(elapsed);
                    if pending.remaining.is_zero() {
                        self.fire_redirect()?;
                    }
                }
            }
            Phase::Idle | Phase::AwaitingInput | Phase::Closed => {}
        }
        Ok(())
    }

    /// Finish the current narration at once. Redirect delays are not skipped.
    pub fn skip(&mut self) {
        if self.phase != Phase::Writing {
            return;
        }
        if let Some(writer) = &mut self.writer {
            writer.skip();
            self.display.set_narration(self.narration_line, writer.text());
        }
        self.finish_writing();
    }

    /// Skip writing and follow redirects until input is expected.
    pub fn settle(&mut self) -> EngineResult<()> {
        let mut hops = 0;
        loop {
            match self.phase {
                Phase::Writing => self.skip(),
                Phase::AutoRedirecting => {
                    if hops >= self.config.redirect_hop_limit {
                        return Err(EngineError::RedirectLoop {
                            node: self.current.clone().unwrap_or_default(),
                            hops,
                        });
                    }
                    hops += 1;
                    self.fire_redirect()?;
                }
                Phase::Idle | Phase::AwaitingInput | Phase::Closed => return Ok(()),
            }
        }
    }

    /// Time until something changes without input. `None` means wait for input.
    pub fn next_wakeup(&self) -> Option<Duration> {
        match self.phase {
            Phase::Writing => self.writer.as_ref().and_then(Typewriter::time_until_next),
            Phase::AutoRedirecting => self.redirect.as_ref().map(|r| r.remaining),
            Phase::Idle | Phase::AwaitingInput | Phase::Closed => None,
        }
    }

    /// Hold the typewriter, e.g. while a glitch effect plays.
    pub fn pause_writing(&mut self) {
        if let Some(writer) = &mut self.writer {
            writer.pause();
        }
    }

    /// Let the typewriter continue.
    pub fn resume_writing(&mut self) {
        if let Some(writer) = &mut self.writer {
            writer.resume();
        }
    }

    /// Forget all progress except the settings and start over.
    pub fn clear_all_and_restart(&mut self) -> EngineResult<()> {
        self.store.clear_session()?;
        self.player = PlayerState::with_health(self.config.default_health);
        self.history.clear();
        self.display.clear();
        self.writer = None;
        self.redirect = None;
        self.current = None;
        self.events.push(SessionEvent::Restarted);
        info!("session restarted");
        self.enter_start_node()
    }

    /// Save new settings. The speed applies to the narration being written too.
    pub fn update_settings(&mut self, settings: Settings) -> EngineResult<()> {
        self.store.save(StorageKey::Settings, &settings)?;
        if let Some(writer) = &mut self.writer {
            writer.set_speed(Duration::from_millis(settings.typewriter_speed_ms));
        }
        self.settings = settings;
        Ok(())
    }

    fn enter_start_node(&mut self) -> EngineResult<()> {
        let start = self.graph.start_node().id.clone();
        self.set_current_node(&start, true)
    }

    fn is_name_entry(&self, id: &str) -> bool {
        let entry = self
            .config
            .name_entry_node
            .as_deref()
            .unwrap_or(&self.graph.start_node().id);
        id == entry
    }

    fn finish_writing(&mut self) {
        let graph = Rc::clone(&self.graph);
        let Some(node) = self.current.as_deref().and_then(|id| graph.get(id)) else {
            return;
        };

        if let Some(target) = &node.auto_redirect_to {
            let delay = node
                .auto_redirect_delay
                .unwrap_or(self.config.auto_redirect_delay_ms);
            self.redirect = Some(PendingRedirect {
                target: target.clone(),
                remaining: Duration::from_millis(delay),
            });
            self.phase = Phase::AutoRedirecting;
            return;
        }

        let available = filter_choices(&node.choices, &self.player, &self.history.visited_nodes);
        let lines = render_choices(
            node,
            &available,
            self.is_name_entry(&node.id),
            self.translator.as_ref(),
        );
        for line in lines {
            self.display.push(line);
        }
        self.phase = Phase::AwaitingInput;
        self.events.push(SessionEvent::ChoicesShown {
            node: node.id.clone(),
        });
    }

    fn fire_redirect(&mut self) -> EngineResult<()> {
        match self.redirect.take() {
            Some(pending) => {
                debug!(target = %pending.target, "auto-redirect");
                self.set_current_node(&pending.target, true)
            }
            None => Ok(()),
        }
    }

    fn close(&mut self) {
        info!("session closed");
        self.writer = None;
        self.redirect = None;
        self.phase = Phase::Closed;
        self.events.push(SessionEvent::Closed);
    }
}

/// Whether the history record `record` is a pick made on `node_id`.
fn is_pick_on(record: &str, node_id: &str) -> bool {
    record
        .strip_prefix(node_id)
        .is_some_and(|rest| rest.starts_with(':'))
}
