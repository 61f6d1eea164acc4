use crate::foundation::error::{VibeError, VibeResult};

pub use kurbo::{Affine, Point, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// Zero-based frame counter produced by the [`crate::Ticker`].
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Rational frame rate.
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be > 0.
    pub den: u32,
}

impl Fps {
    /// Build a validated frame rate.
    pub fn new(num: u32, den: u32) -> VibeResult<Self> {
        if den == 0 {
            return Err(VibeError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(VibeError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of a single frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert a frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Container dimensions used for anchor resolution.
pub struct Canvas {
    /// Width in scene units.
    pub width: f64,
    /// Height in scene units.
    pub height: f64,
}

impl Canvas {
    /// Validate that both dimensions are finite and positive.
    pub fn validate(&self) -> VibeResult<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(VibeError::validation("canvas width must be finite and > 0"));
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(VibeError::validation(
                "canvas height must be finite and > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
