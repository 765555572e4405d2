//! Sound and visual effect playback.

use tw_story::{Sfx, Vfx};

/// Plays the effects nodes ask for. Calls are fire-and-forget.
pub trait EffectsPlayer {
    /// Play a sound once.
    fn play_sound(&mut self, sfx: Sfx);
    /// Start a visual effect. It runs until cleared or it ends by itself.
    fn play_visual_effect(&mut self, vfx: Vfx);
    /// Stop every running visual effect.
    fn clear_visual_effects(&mut self);
}

/// Plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEffects;

impl EffectsPlayer for NoopEffects {
    fn play_sound(&mut self, _sfx: Sfx) {}

    fn play_visual_effect(&mut self, _vfx: Vfx) {}

    fn clear_visual_effects(&mut self) {}
}
