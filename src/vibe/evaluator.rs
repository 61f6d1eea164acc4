use crate::{
    foundation::core::Vec2,
    foundation::math::{RandomSource, Rng64},
    vibe::model::{VibeConfig, VibeKind},
};

const PULSE_SCALE_FACTOR: f64 = 0.2;
const FLICKER_BASE_OPACITY: f64 = 0.4;
const FLICKER_SPIKE_PROBABILITY: f64 = 0.02;
const GLOW_SWING: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Composed visual delta of a vibe stack at one instant.
pub struct VibeState {
    /// Multiplicative scale, identity 1.
    pub scale: f64,
    /// Additive translation, identity zero.
    pub translate: Vec2,
    /// Hue rotation in degrees, when any vibe drives hue.
    pub hue_rotate: Option<f64>,
    /// Hue rotation applies to fill paint.
    pub hue_fill: bool,
    /// Hue rotation applies to stroke paint.
    pub hue_stroke: bool,
    /// Glow blur radius, when any glow vibe is active.
    pub glow_radius: Option<f64>,
    /// Multiplicative opacity, identity 1.
    pub opacity: f64,
}

/// Contribution of a single vibe; same shape as the composed state.
pub type VibeDelta = VibeState;

impl VibeState {
    /// The no-op state.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate: Vec2::ZERO,
        hue_rotate: None,
        hue_fill: false,
        hue_stroke: false,
        glow_radius: None,
        opacity: 1.0,
    };

    /// Whether this state leaves the object untouched.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for VibeState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Vibe parameters after defaults and audio modulation.
#[derive(Clone, Copy, Debug)]
struct Params {
    intensity: f64,
    frequency: f64,
    amplitude: f64,
    radius: f64,
    phase: f64,
}

impl Params {
    /// Audio scales one parameter per kind: pulse and flicker modulate
    /// intensity, float and shake amplitude, glow radius, rotation frequency.
    fn resolve(vibe: &VibeConfig, audio: Option<f64>) -> Self {
        let mut p = Self {
            intensity: vibe.intensity(),
            frequency: vibe.frequency(),
            amplitude: vibe.amplitude(),
            radius: vibe.radius(),
            phase: vibe.phase_rad(),
        };
        let (Some(ar), Some(level), Some(kind)) = (&vibe.audio_reactive, audio, vibe.kind) else {
            return p;
        };
        let gain = 1.0 + level * ar.multiplier;
        match kind {
            VibeKind::Pulse | VibeKind::OpacityFlicker => p.intensity *= gain,
            VibeKind::Float | VibeKind::Shake => p.amplitude *= gain,
            VibeKind::Glow => p.radius *= gain,
            VibeKind::Rotation => p.frequency *= gain,
        }
        p
    }

    fn wave(&self, time: f64) -> f64 {
        (time * self.frequency + self.phase).sin()
    }
}

/// Evaluates one vibe at one instant.
///
/// Shake and flicker draw from the owned random source; seed it for
/// reproducible output.
#[derive(Clone, Debug)]
pub struct VibeEvaluator<R = Rng64> {
    rng: R,
}

impl Default for VibeEvaluator<Rng64> {
    fn default() -> Self {
        Self::new(Rng64::from_entropy())
    }
}

impl<R: RandomSource> VibeEvaluator<R> {
    /// Evaluator drawing randomness from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Mutable access to the random source.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Isolated contribution of `vibe` at `time` seconds.
    ///
    /// `audio` is the band level of an active capture session, or `None`.
    /// Rotation and flicker leave the delta untouched; see [`spin_degrees`]
    /// and [`VibeEvaluator::flicker_opacity`].
    pub fn evaluate(&mut self, vibe: &VibeConfig, time: f64, audio: Option<f64>) -> VibeDelta {
        let Some(kind) = vibe.kind else {
            return VibeDelta::IDENTITY;
        };
        let p = Params::resolve(vibe, audio);
        let mut delta = VibeDelta::IDENTITY;

        match kind {
            VibeKind::Pulse => {
                delta.scale = 1.0 + p.wave(time) * p.intensity * PULSE_SCALE_FACTOR;
            }
            VibeKind::Float => {
                delta.translate.y = p.wave(time) * p.amplitude * p.intensity;
            }
            VibeKind::Shake => {
                let amp = p.amplitude * p.intensity;
                delta.translate.x = self.rng.range(-amp, amp);
                delta.translate.y = self.rng.range(-amp, amp);
            }
            VibeKind::Glow => {
                delta.glow_radius =
                    Some((p.radius * p.intensity * (1.0 + GLOW_SWING * p.wave(time))).max(0.0));
            }
            VibeKind::Rotation | VibeKind::OpacityFlicker => {}
        }

        if vibe.hue_amplitude != 0.0 {
            let (fill, stroke) = vibe.target.flags();
            delta.hue_rotate = Some(p.wave(time) * vibe.hue_amplitude);
            delta.hue_fill = fill;
            delta.hue_stroke = stroke;
        }
        delta
    }

    /// Opacity of a flicker vibe: 0.4, spiking by `intensity` (capped at 1)
    /// on 2% of evaluations. Any other kind yields 1.
    pub fn flicker_opacity(&mut self, vibe: &VibeConfig, audio: Option<f64>) -> f64 {
        if vibe.kind != Some(VibeKind::OpacityFlicker) {
            return 1.0;
        }
        let p = Params::resolve(vibe, audio);
        if self.rng.next_f64() < FLICKER_SPIKE_PROBABILITY {
            (FLICKER_BASE_OPACITY + p.intensity).min(1.0)
        } else {
            FLICKER_BASE_OPACITY
        }
    }
}

/// Spin angle in degrees contributed by a rotation vibe at `time`.
///
/// The evaluator leaves rotation out of [`VibeDelta`]; the frame evaluator
/// adds this angle to the object's own rotation instead.
pub fn spin_degrees(vibe: &VibeConfig, time: f64, audio: Option<f64>) -> f64 {
    if vibe.kind != Some(VibeKind::Rotation) {
        return 0.0;
    }
    let p = Params::resolve(vibe, audio);
    (time * p.frequency * p.intensity).to_degrees().rem_euclid(360.0)
}

#[cfg(test)]
#[path = "../../tests/unit/vibe/evaluator.rs"]
mod tests;
