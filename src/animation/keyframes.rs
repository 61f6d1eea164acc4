use std::collections::BTreeMap;

use crate::{
    animation::ease::Ease,
    foundation::error::{VibeError, VibeResult},
};

/// Linear interpolation between two values of the same type.
pub trait Lerp: Sized {
    /// Value at `t` between `a` (0) and `b` (1).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// Straight 8-bit RGB color parsed from `#rgb` / `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb8 {
    /// Parse `#rgb` or `#rrggbb`; anything else is `None`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        let nibble = |c: u8| -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        };
        let b = hex.as_bytes();
        match b.len() {
            3 => Some(Self {
                r: nibble(b[0])? * 17,
                g: nibble(b[1])? * 17,
                b: nibble(b[2])? * 17,
            }),
            6 => Some(Self {
                r: nibble(b[0])? * 16 + nibble(b[1])?,
                g: nibble(b[2])? * 16 + nibble(b[3])?,
                b: nibble(b[4])? * 16 + nibble(b[5])?,
            }),
            _ => None,
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Lerp for Rgb8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
/// Keyframe payload: a number, or a string such as a color.
pub enum KeyValue {
    /// Numeric value, interpolated.
    Number(f64),
    /// String value; hex colors are blended, anything else steps.
    Text(String),
}

impl KeyValue {
    /// Numeric view of the value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    fn blend(a: &Self, b: &Self, raw_t: f64, eased_t: f64) -> Self {
        match (a, b) {
            (Self::Number(x), Self::Number(y)) => Self::Number(f64::lerp(x, y, eased_t)),
            (Self::Text(x), Self::Text(y)) => {
                match (Rgb8::parse_hex(x), Rgb8::parse_hex(y)) {
                    (Some(cx), Some(cy)) => Self::Text(Rgb8::lerp(&cx, &cy, eased_t).to_hex()),
                    _ => step(a, b, raw_t),
                }
            }
            _ => step(a, b, raw_t),
        }
    }
}

fn step(a: &KeyValue, b: &KeyValue, t: f64) -> KeyValue {
    if t < 0.5 { a.clone() } else { b.clone() }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One keyframe on a property track.
pub struct Keyframe {
    /// Keyframe time (seconds, or `[0, 1]` for normalized tracks).
    pub time: f64,
    /// Value at `time`.
    pub value: KeyValue,
    /// Easing used on the segment that ends at this keyframe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Ease>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Keyframes for one named property.
pub struct PropertyTrack {
    /// Property name (`x`, `y`, `scale`, `rotation`, `opacity`, ...).
    pub property: String,
    /// Keyframes; order on the wire is not significant.
    pub keyframes: Vec<Keyframe>,
}

impl PropertyTrack {
    /// Interpolated value at `t`, or `None` for an empty track.
    ///
    /// A NaN `t` reads the first keyframe.
    pub fn value_at(&self, t: f64) -> Option<KeyValue> {
        let mut keys: Vec<&Keyframe> = self.keyframes.iter().collect();
        if !keys.windows(2).all(|w| w[0].time <= w[1].time) {
            keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        }

        let first = keys.first()?;
        let last = keys[keys.len() - 1];
        if t.is_nan() || t <= first.time {
            return Some(first.value.clone());
        }
        if t >= last.time {
            return Some(last.value.clone());
        }

        let idx = keys.partition_point(|k| k.time <= t);
        let a = keys[idx - 1];
        let b = keys[idx];
        let span = b.time - a.time;
        if span <= 0.0 {
            return Some(a.value.clone());
        }

        let raw = (t - a.time) / span;
        let eased = b.easing.unwrap_or_default().apply(raw);
        Some(KeyValue::blend(&a.value, &b.value, raw, eased))
    }

    /// Check keyframe times and the property name.
    pub fn validate(&self) -> VibeResult<()> {
        if self.property.trim().is_empty() {
            return Err(VibeError::animation("property track name must be non-empty"));
        }
        if self.keyframes.iter().any(|k| !k.time.is_finite()) {
            return Err(VibeError::animation(format!(
                "track '{}' has a non-finite keyframe time",
                self.property
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// How keyframe times of an [`AnimationTrack`] are interpreted.
pub enum TimeBasis {
    /// Normalized when every keyframe time is `<= 1`, seconds otherwise.
    ///
    /// A track whose absolute length is at most one second is read as
    /// normalized under this rule; set an explicit basis for such tracks.
    #[default]
    Auto,
    /// Keyframe times are seconds from the start of the track.
    Seconds,
    /// Keyframe times are fractions of `duration`.
    Normalized,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Property tracks bound to a single scene object.
pub struct AnimationTrack {
    /// Animated scene object.
    pub object_id: String,
    /// Track length in seconds.
    pub duration: f64,
    /// Wrap time modulo `duration` instead of clamping.
    #[serde(rename = "loop", default)]
    pub looping: bool,
    /// Keyframe time interpretation.
    #[serde(default)]
    pub time_basis: TimeBasis,
    /// Property tracks.
    pub tracks: Vec<PropertyTrack>,
}

impl AnimationTrack {
    /// Track-local time after looping or clamping.
    pub fn local_time(&self, t: f64) -> f64 {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return t;
        }
        if self.looping {
            t.rem_euclid(self.duration)
        } else {
            t.clamp(0.0, self.duration)
        }
    }

    /// Whether keyframe times are fractions of `duration`.
    pub fn is_normalized(&self) -> bool {
        match self.time_basis {
            TimeBasis::Seconds => false,
            TimeBasis::Normalized => true,
            TimeBasis::Auto => {
                let mut times = self
                    .tracks
                    .iter()
                    .flat_map(|tr| tr.keyframes.iter().map(|k| k.time))
                    .peekable();
                times.peek().is_some() && times.all(|time| time <= 1.0)
            }
        }
    }

    /// Sample every property track at scene time `t`.
    pub fn sample(&self, t: f64) -> BTreeMap<String, KeyValue> {
        let local = self.local_time(t);
        let lookup = if self.is_normalized() && self.duration > 0.0 {
            local / self.duration
        } else {
            local
        };

        self.tracks
            .iter()
            .filter_map(|tr| Some((tr.property.clone(), tr.value_at(lookup)?)))
            .collect()
    }

    /// Validate duration and tracks.
    pub fn validate(&self) -> VibeResult<()> {
        if self.object_id.trim().is_empty() {
            return Err(VibeError::animation("animation track object_id must be non-empty"));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(VibeError::animation(format!(
                "animation for '{}' must have a finite duration >= 0",
                self.object_id
            )));
        }
        for track in &self.tracks {
            track.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframes.rs"]
mod tests;
