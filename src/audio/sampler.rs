use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::JoinHandle,
    time::Duration,
};

use crate::{
    audio::{
        device::{AudioDevice, AudioSession},
        levels::{AudioBand, AudioLevels, BandLevels},
    },
    foundation::error::{VibeError, VibeResult},
    vibe::model::default_smoothing,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Analysis loop settings.
pub struct AudioConfig {
    /// Exponential smoothing factor in `[0, 1]`; higher is slower.
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
    /// FFT size for PCM-backed sessions.
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    /// Delay between analysis ticks in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Lowest frequency counted as bass, in Hz.
    #[serde(default = "default_min_hz")]
    pub min_hz: f64,
    /// Upper edge of the bass band, in Hz.
    #[serde(default = "default_bass_max_hz")]
    pub bass_max_hz: f64,
    /// Upper edge of the mid band, in Hz. Treble runs up to Nyquist.
    #[serde(default = "default_mid_max_hz")]
    pub mid_max_hz: f64,
}

fn default_fft_size() -> usize {
    2048
}

fn default_interval_ms() -> u64 {
    16
}

fn default_min_hz() -> f64 {
    20.0
}

fn default_bass_max_hz() -> f64 {
    250.0
}

fn default_mid_max_hz() -> f64 {
    4_000.0
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            smoothing: default_smoothing(),
            fft_size: default_fft_size(),
            interval_ms: default_interval_ms(),
            min_hz: default_min_hz(),
            bass_max_hz: default_bass_max_hz(),
            mid_max_hz: default_mid_max_hz(),
        }
    }
}

impl AudioConfig {
    /// Validate smoothing range, FFT size and band edges.
    pub fn validate(&self) -> VibeResult<()> {
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(VibeError::validation("audio smoothing must be in [0, 1]"));
        }
        if self.fft_size < 32 || !self.fft_size.is_power_of_two() {
            return Err(VibeError::validation(
                "audio fft_size must be a power of two >= 32",
            ));
        }
        if self.interval_ms == 0 {
            return Err(VibeError::validation("audio interval_ms must be > 0"));
        }
        if !(self.min_hz >= 0.0 && self.min_hz < self.bass_max_hz && self.bass_max_hz < self.mid_max_hz)
        {
            return Err(VibeError::validation(
                "audio band edges must satisfy 0 <= min_hz < bass_max_hz < mid_max_hz",
            ));
        }
        Ok(())
    }

    fn band_range(&self, band: AudioBand) -> (f64, f64) {
        match band {
            AudioBand::Bass => (self.min_hz, self.bass_max_hz),
            AudioBand::Mid => (self.bass_max_hz, self.mid_max_hz),
            AudioBand::Treble => (self.mid_max_hz, f64::INFINITY),
        }
    }
}

/// Mean magnitude of the bins whose centre frequency lies in `[lo_hz, hi_hz)`.
///
/// Bin `i` is centred at `i * sample_rate / (2 * bins.len())`.
pub fn band_energy(bins: &[f32], sample_rate: u32, lo_hz: f64, hi_hz: f64) -> f64 {
    if bins.is_empty() || sample_rate == 0 {
        return 0.0;
    }
    let bin_hz = f64::from(sample_rate) / (2.0 * bins.len() as f64);
    let mut sum = 0.0;
    let mut count = 0usize;
    for (i, &b) in bins.iter().enumerate() {
        let hz = i as f64 * bin_hz;
        if hz >= lo_hz && hz < hi_hz {
            sum += f64::from(b);
            count += 1;
        }
    }
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Turns frequency data into smoothed per-band levels.
#[derive(Clone, Debug)]
pub struct BandAnalyser {
    config: AudioConfig,
    bins: Vec<f32>,
    smoothed: [f64; 3],
}

impl BandAnalyser {
    /// Analyser with zeroed smoothing state.
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            config: config.clone(),
            bins: Vec::new(),
            smoothed: [0.0; 3],
        }
    }

    /// Forget smoothing history.
    pub fn reset(&mut self) {
        self.smoothed = [0.0; 3];
    }

    /// Fold one frequency snapshot into the smoothed levels and return them
    /// in [`AudioBand::ALL`] order.
    pub fn ingest(&mut self, bins: &[f32], sample_rate: u32) -> [f64; 3] {
        let s = self.config.smoothing;
        for (slot, band) in AudioBand::ALL.into_iter().enumerate() {
            let (lo, hi) = self.config.band_range(band);
            let sample = band_energy(bins, sample_rate, lo, hi);
            self.smoothed[slot] = self.smoothed[slot] * s + sample * (1.0 - s);
        }
        self.smoothed
    }

    /// Read one snapshot from `session` and publish the smoothed levels.
    pub fn process(&mut self, session: &mut dyn AudioSession, levels: &BandLevels) -> VibeResult<()> {
        self.bins.resize(session.bin_count(), 0.0);
        session.read_frequency_data(&mut self.bins)?;
        let bins = std::mem::take(&mut self.bins);
        let out = self.ingest(&bins, session.sample_rate());
        self.bins = bins;
        for (band, value) in AudioBand::ALL.into_iter().zip(out) {
            levels.set(band, value);
        }
        Ok(())
    }
}

struct Worker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Samples live audio into shared per-band levels on its own thread.
///
/// The sampler is an explicit handle: construct it with a device, hand
/// [`AudioReactiveSampler::levels`] to the frame evaluator, and start/stop it
/// as capture is wanted. Without a running session every band reads 0.
pub struct AudioReactiveSampler {
    device: Arc<dyn AudioDevice>,
    config: AudioConfig,
    levels: Arc<BandLevels>,
    worker: Option<Worker>,
}

impl AudioReactiveSampler {
    /// Sampler for `device`; nothing is opened until [`Self::start`].
    pub fn new(device: Arc<dyn AudioDevice>, config: AudioConfig) -> Self {
        Self {
            device,
            config,
            levels: Arc::new(BandLevels::new()),
            worker: None,
        }
    }

    /// Shared read side of the levels.
    pub fn levels(&self) -> Arc<BandLevels> {
        Arc::clone(&self.levels)
    }

    /// Whether an analysis loop is running.
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Current level of `band`, zero when not running.
    pub fn frequency_data(&self, band: AudioBand) -> f64 {
        self.levels.level(band)
    }

    /// Open the device and spawn the analysis loop.
    ///
    /// Levels restart from zero. Calling `start` while running is a no-op.
    #[tracing::instrument(skip(self))]
    pub fn start(&mut self) -> VibeResult<()> {
        if self.worker.is_some() {
            return Ok(());
        }
        self.config.validate()?;
        self.levels.set_active(false);
        self.levels.clear();

        let session = self.device.open().map_err(|e| {
            tracing::warn!(error = %e, "audio input unavailable");
            match e {
                VibeError::AudioUnavailable(_) => e,
                other => VibeError::audio_unavailable(other.to_string()),
            }
        })?;

        let stop = Arc::new(AtomicBool::new(false));
        let levels = Arc::clone(&self.levels);
        let interval = Duration::from_millis(self.config.interval_ms);
        let analyser = BandAnalyser::new(&self.config);
        let stop_flag = Arc::clone(&stop);

        levels.set_active(true);
        let handle = std::thread::Builder::new()
            .name("vibescape-audio".to_string())
            .spawn(move || run_analysis(session, analyser, &levels, &stop_flag, interval))
            .map_err(|e| {
                self.levels.set_active(false);
                VibeError::Other(anyhow::Error::new(e).context("spawn audio analysis thread"))
            })?;

        self.worker = Some(Worker { stop, handle });
        Ok(())
    }

    /// Stop the loop, release the session, and zero the levels.
    ///
    /// Returns after the session has been dropped.
    #[tracing::instrument(skip(self))]
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        worker.stop.store(true, Ordering::Relaxed);
        if worker.handle.join().is_err() {
            tracing::warn!("audio analysis thread panicked");
        }
        self.levels.set_active(false);
        self.levels.clear();
    }
}

impl Drop for AudioReactiveSampler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_analysis(
    mut session: Box<dyn AudioSession>,
    mut analyser: BandAnalyser,
    levels: &BandLevels,
    stop: &AtomicBool,
    interval: Duration,
) {
    while !stop.load(Ordering::Relaxed) {
        if let Err(e) = analyser.process(session.as_mut(), levels) {
            tracing::debug!(error = %e, "audio analysis tick failed");
        }
        std::thread::sleep(interval);
    }
    drop(session);
}

#[cfg(test)]
#[path = "../../tests/unit/audio/sampler.rs"]
mod tests;
