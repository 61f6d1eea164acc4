use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Frequency band sampled by the audio analyser.
pub enum AudioBand {
    /// Low frequencies.
    Bass,
    /// Middle frequencies.
    Mid,
    /// High frequencies.
    Treble,
}

impl AudioBand {
    /// All bands in storage order.
    pub const ALL: [AudioBand; 3] = [AudioBand::Bass, AudioBand::Mid, AudioBand::Treble];

    fn index(self) -> usize {
        match self {
            Self::Bass => 0,
            Self::Mid => 1,
            Self::Treble => 2,
        }
    }
}

/// Read side of the audio analysis, consumed by vibe composition.
pub trait AudioLevels: Send + Sync {
    /// Whether a capture session is currently feeding levels.
    fn is_active(&self) -> bool;

    /// Smoothed level of `band` in `[0, 1]`; zero when inactive.
    fn level(&self, band: AudioBand) -> f64;
}

/// Shared per-band levels written by the analysis loop and read by the frame loop.
///
/// Reads and writes are relaxed atomics. A reader may observe a value one
/// analysis tick old, and may see bands from different ticks.
#[derive(Debug, Default)]
pub struct BandLevels {
    active: AtomicBool,
    bands: [AtomicU64; 3],
}

impl BandLevels {
    /// Zeroed, inactive levels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last written raw value for `band`, regardless of activity.
    pub fn get(&self, band: AudioBand) -> f64 {
        f64::from_bits(self.bands[band.index()].load(Ordering::Relaxed))
    }

    /// Store a value for `band`.
    pub fn set(&self, band: AudioBand, value: f64) {
        self.bands[band.index()].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Mark the levels as fed by a live session.
    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Relaxed);
    }

    /// Reset every band to zero.
    pub fn clear(&self) {
        for band in AudioBand::ALL {
            self.set(band, 0.0);
        }
    }
}

impl AudioLevels for BandLevels {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    fn level(&self, band: AudioBand) -> f64 {
        if !self.is_active() {
            return 0.0;
        }
        self.get(band)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/levels.rs"]
mod tests;
