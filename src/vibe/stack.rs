use crate::{
    audio::levels::AudioLevels,
    foundation::math::{RandomSource, Rng64},
    vibe::{
        evaluator::{VibeEvaluator, VibeState, spin_degrees},
        model::VibeConfig,
    },
};

/// Audio level feeding `vibe`, if it is audio reactive and a session is live.
pub fn audio_level_for(vibe: &VibeConfig, audio: Option<&dyn AudioLevels>) -> Option<f64> {
    let ar = vibe.audio_reactive.as_ref()?;
    let levels = audio?;
    if !levels.is_active() {
        return None;
    }
    Some(levels.level(ar.band))
}

/// Folds an ordered vibe stack into one [`VibeState`].
///
/// Scale and opacity multiply, translation sums, glow keeps the largest
/// radius, and hue is taken from the last entry with a nonzero hue amplitude
/// together with that entry's fill/stroke flags.
#[derive(Clone, Debug)]
pub struct VibeStackComposer<R = Rng64> {
    evaluator: VibeEvaluator<R>,
}

impl Default for VibeStackComposer<Rng64> {
    fn default() -> Self {
        Self::new(VibeEvaluator::default())
    }
}

impl<R: RandomSource> VibeStackComposer<R> {
    /// Composer backed by `evaluator`.
    pub fn new(evaluator: VibeEvaluator<R>) -> Self {
        Self { evaluator }
    }

    /// Underlying evaluator.
    pub fn evaluator_mut(&mut self) -> &mut VibeEvaluator<R> {
        &mut self.evaluator
    }

    /// Composed state of `stack` at `time` seconds.
    pub fn compose(
        &mut self,
        stack: &[VibeConfig],
        time: f64,
        audio: Option<&dyn AudioLevels>,
    ) -> VibeState {
        let mut state = VibeState::IDENTITY;
        for vibe in stack {
            let level = audio_level_for(vibe, audio);
            let delta = self.evaluator.evaluate(vibe, time, level);

            state.scale *= delta.scale;
            state.translate += delta.translate;
            if delta.hue_rotate.is_some() {
                state.hue_rotate = delta.hue_rotate;
                state.hue_fill = delta.hue_fill;
                state.hue_stroke = delta.hue_stroke;
            }
            if let Some(r) = delta.glow_radius {
                state.glow_radius = Some(state.glow_radius.map_or(r, |cur| cur.max(r)));
            }
            state.opacity *= self.evaluator.flicker_opacity(vibe, level);
        }
        state
    }
}

/// Total spin in degrees contributed by rotation vibes in `stack`.
pub fn stack_spin_degrees(
    stack: &[VibeConfig],
    time: f64,
    audio: Option<&dyn AudioLevels>,
) -> f64 {
    stack
        .iter()
        .map(|v| spin_degrees(v, time, audio_level_for(v, audio)))
        .sum::<f64>()
        .rem_euclid(360.0)
}

#[cfg(test)]
#[path = "../../tests/unit/vibe/stack.rs"]
mod tests;
