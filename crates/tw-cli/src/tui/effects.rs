//! Screen effects for the terminal player.
//!
//! The session calls into [`ScreenEffects`] on every node change; the
//! player loop reads the shared state back when drawing.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tw_engine::EffectsPlayer;
use tw_story::{Sfx, Vfx};

/// How long a glitch holds the typewriter.
pub const GLITCH_DURATION: Duration = Duration::from_millis(600);
/// How long the screen shakes.
pub const SHAKE_DURATION: Duration = Duration::from_millis(400);
/// How long a sound stays in the status bar.
pub const SOUND_DURATION: Duration = Duration::from_millis(800);
/// Redraw interval while an animation runs.
pub const FRAME: Duration = Duration::from_millis(50);

/// What is currently on screen.
#[derive(Debug, Default)]
pub struct ScreenState {
    /// Narration is dimmed.
    pub dark: bool,
    /// Shake time left.
    pub shake: Option<Duration>,
    /// Glitch time left.
    pub glitch: Option<Duration>,
    /// Sound shown in the status bar and how long it stays.
    pub sound: Option<(Sfx, Duration)>,
    glitch_started: bool,
}

/// Effects player shared between the session and the terminal loop.
#[derive(Debug, Clone, Default)]
pub struct ScreenEffects {
    state: Rc<RefCell<ScreenState>>,
}

impl ScreenEffects {
    /// Borrow what is on screen.
    pub fn state(&self) -> Ref<'_, ScreenState> {
        self.state.borrow()
    }

    /// Whether a glitch began since the last call.
    pub fn take_glitch_start(&self) -> bool {
        std::mem::take(&mut self.state.borrow_mut().glitch_started)
    }

    /// Count down running effects. Returns `true` when a glitch just ended.
    pub fn tick(&self, elapsed: Duration) -> bool {
        let mut state = self.state.borrow_mut();
        state.shake = countdown(state.shake, elapsed);
        state.sound = state
            .sound
            .and_then(|(sfx, left)| countdown(Some(left), elapsed).map(|left| (sfx, left)));
        let was_glitching = state.glitch.is_some();
        state.glitch = countdown(state.glitch, elapsed);
        was_glitching && state.glitch.is_none()
    }

    /// When the screen next needs redrawing for an effect.
    pub fn next_frame(&self) -> Option<Duration> {
        let state = self.state.borrow();
        let animating = [state.shake, state.glitch].into_iter().flatten().min();
        let fading = state.sound.map(|(_, left)| left);
        match (animating, fading) {
            (Some(a), Some(f)) => Some(a.min(FRAME).min(f)),
            (Some(a), None) => Some(a.min(FRAME)),
            (None, f) => f,
        }
    }
}

fn countdown(left: Option<Duration>, elapsed: Duration) -> Option<Duration> {
    left.map(|d| d.saturating_sub(elapsed))
        .filter(|d| !d.is_zero())
}

impl EffectsPlayer for ScreenEffects {
    fn play_sound(&mut self, sfx: Sfx) {
        self.state.borrow_mut().sound = Some((sfx, SOUND_DURATION));
    }

    fn play_visual_effect(&mut self, vfx: Vfx) {
        let mut state = self.state.borrow_mut();
        match vfx {
            Vfx::Shake => state.shake = Some(SHAKE_DURATION),
            Vfx::Dark => state.dark = true,
            Vfx::Glitch => {
                state.glitch = Some(GLITCH_DURATION);
                state.glitch_started = true;
            }
        }
    }

    fn clear_visual_effects(&mut self) {
        let mut state = self.state.borrow_mut();
        state.dark = false;
        state.shake = None;
        state.glitch = None;
        state.glitch_started = false;
    }
}
