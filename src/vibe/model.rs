use crate::{
    audio::levels::AudioBand,
    foundation::error::{VibeError, VibeResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Procedural effect kinds.
pub enum VibeKind {
    /// Breathing scale.
    Pulse,
    /// Oscillating glow radius.
    Glow,
    /// Vertical bob.
    Float,
    /// Random jitter.
    Shake,
    /// Continuous spin (applied through the object's rotation).
    Rotation,
    /// Random opacity spikes.
    OpacityFlicker,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Which paint a hue rotation applies to.
pub enum HueTarget {
    /// Fill paint only.
    Fill,
    /// Stroke paint only.
    Stroke,
    /// Both paints.
    #[default]
    Both,
}

impl HueTarget {
    /// `(fill, stroke)` applicability flags.
    pub fn flags(self) -> (bool, bool) {
        match self {
            Self::Fill => (true, false),
            Self::Stroke => (false, true),
            Self::Both => (true, true),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Audio modulation attached to a vibe.
pub struct AudioReactiveConfig {
    /// Name of the modulated parameter. Descriptive only; the modulated
    /// parameter is chosen per vibe kind.
    #[serde(default)]
    pub parameter: String,
    /// Frequency band driving the modulation.
    pub band: AudioBand,
    /// Scale applied to the band level.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Smoothing factor in `[0, 1]`.
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

pub(crate) fn default_smoothing() -> f64 {
    0.8
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Effect descriptor. Unset numeric fields fall back to per-kind defaults.
pub struct VibeConfig {
    /// Effect kind; an unset kind evaluates to the identity.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<VibeKind>,
    /// Effect strength.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f64>,
    /// Angular speed; used when `frequency` is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Angular frequency in radians per second.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    /// Displacement amplitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude: Option<f64>,
    /// Glow radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Phase offset in degrees.
    #[serde(default)]
    pub phase_offset: f64,
    /// Hue swing in degrees; zero disables hue rotation.
    #[serde(default)]
    pub hue_amplitude: f64,
    /// Paint targeted by hue rotation.
    #[serde(default)]
    pub target: HueTarget,
    /// Optional audio modulation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_reactive: Option<AudioReactiveConfig>,
}

pub(crate) const DEFAULT_INTENSITY: f64 = 0.5;
pub(crate) const DEFAULT_FREQUENCY: f64 = 1.0;
pub(crate) const DEFAULT_FLOAT_AMPLITUDE: f64 = 10.0;
pub(crate) const DEFAULT_SHAKE_AMPLITUDE: f64 = 5.0;
pub(crate) const DEFAULT_GLOW_RADIUS: f64 = 8.0;

impl VibeConfig {
    /// Config of `kind` with every parameter at its default.
    pub fn new(kind: VibeKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Builder-style intensity setter.
    pub fn with_intensity(mut self, v: f64) -> Self {
        self.intensity = Some(v);
        self
    }

    /// Builder-style frequency setter.
    pub fn with_frequency(mut self, v: f64) -> Self {
        self.frequency = Some(v);
        self
    }

    /// Builder-style amplitude setter.
    pub fn with_amplitude(mut self, v: f64) -> Self {
        self.amplitude = Some(v);
        self
    }

    /// Builder-style hue setter.
    pub fn with_hue(mut self, amplitude_deg: f64, target: HueTarget) -> Self {
        self.hue_amplitude = amplitude_deg;
        self.target = target;
        self
    }

    /// Effective intensity.
    pub fn intensity(&self) -> f64 {
        self.intensity.unwrap_or(DEFAULT_INTENSITY)
    }

    /// Effective angular frequency (`frequency`, else `speed`, else 1).
    pub fn frequency(&self) -> f64 {
        self.frequency.or(self.speed).unwrap_or(DEFAULT_FREQUENCY)
    }

    /// Effective amplitude for the configured kind.
    pub fn amplitude(&self) -> f64 {
        let fallback = match self.kind {
            Some(VibeKind::Shake) => DEFAULT_SHAKE_AMPLITUDE,
            _ => DEFAULT_FLOAT_AMPLITUDE,
        };
        self.amplitude.unwrap_or(fallback)
    }

    /// Effective glow radius.
    pub fn radius(&self) -> f64 {
        self.radius.unwrap_or(DEFAULT_GLOW_RADIUS)
    }

    /// Phase offset in radians.
    pub fn phase_rad(&self) -> f64 {
        self.phase_offset.to_radians()
    }

    /// Reject non-finite parameters and out-of-range smoothing.
    pub fn validate(&self) -> VibeResult<()> {
        for (name, value) in [
            ("intensity", self.intensity),
            ("speed", self.speed),
            ("frequency", self.frequency),
            ("amplitude", self.amplitude),
            ("radius", self.radius),
            ("phaseOffset", Some(self.phase_offset)),
            ("hueAmplitude", Some(self.hue_amplitude)),
        ] {
            if let Some(v) = value
                && !v.is_finite()
            {
                return Err(VibeError::validation(format!(
                    "vibe {name} must be finite"
                )));
            }
        }
        if let Some(ar) = &self.audio_reactive {
            if !ar.multiplier.is_finite() {
                return Err(VibeError::validation(
                    "audioReactive multiplier must be finite",
                ));
            }
            if !(0.0..=1.0).contains(&ar.smoothing) {
                return Err(VibeError::validation(
                    "audioReactive smoothing must be in [0, 1]",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/vibe/model.rs"]
mod tests;
