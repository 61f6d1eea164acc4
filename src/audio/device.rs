use std::sync::Arc;

use realfft::{RealFftPlanner, RealToComplex, num_complex::Complex32};

use crate::foundation::error::{VibeError, VibeResult};

const MIN_DECIBELS: f32 = -100.0;
const MAX_DECIBELS: f32 = -30.0;

/// An open capture session. Dropping it releases the underlying device.
pub trait AudioSession: Send {
    /// Capture sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Number of frequency bins produced per read.
    fn bin_count(&self) -> usize;

    /// Fill `out` (length [`AudioSession::bin_count`]) with magnitudes in `[0, 1]`.
    fn read_frequency_data(&mut self, out: &mut [f32]) -> VibeResult<()>;
}

/// Something that can open a capture session (microphone, loopback, file).
pub trait AudioDevice: Send + Sync {
    /// Open a session, failing with [`VibeError::AudioUnavailable`] when
    /// permission is denied or no input exists.
    fn open(&self) -> VibeResult<Box<dyn AudioSession>>;
}

/// Raw mono PCM provider.
pub trait PcmSource: Send {
    /// Sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Copy up to `out.len()` of the most recent samples into `out`,
    /// returning how many were written.
    fn read_samples(&mut self, out: &mut [f32]) -> usize;
}

struct FftResources {
    plan: Arc<dyn RealToComplex<f32>>,
    input: Vec<f32>,
    spectrum: Vec<Complex32>,
    scratch: Vec<Complex32>,
    window: Vec<f32>,
}

/// Adapts a [`PcmSource`] into an [`AudioSession`] with a Hann-windowed FFT.
///
/// Magnitudes are mapped from decibels in `[-100, -30]` onto `[0, 1]`.
pub struct PcmSession<S> {
    source: S,
    fft_size: usize,
    history: Vec<f32>,
    block: Vec<f32>,
    fft: FftResources,
}

impl<S: PcmSource> PcmSession<S> {
    /// Session analysing `fft_size` samples per read (power of two, >= 32).
    pub fn new(source: S, fft_size: usize) -> VibeResult<Self> {
        if fft_size < 32 || !fft_size.is_power_of_two() {
            return Err(VibeError::validation(
                "fft_size must be a power of two >= 32",
            ));
        }
        let plan = RealFftPlanner::<f32>::new().plan_fft_forward(fft_size);
        let fft = FftResources {
            input: plan.make_input_vec(),
            spectrum: plan.make_output_vec(),
            scratch: plan.make_scratch_vec(),
            window: (0..fft_size).map(|i| hann_value(i, fft_size)).collect(),
            plan,
        };
        Ok(Self {
            source,
            fft_size,
            history: vec![0.0; fft_size],
            block: vec![0.0; fft_size],
            fft,
        })
    }

    fn pull(&mut self) {
        let n = self.source.read_samples(&mut self.block).min(self.fft_size);
        if n == 0 {
            return;
        }
        self.history.rotate_left(n);
        let start = self.fft_size - n;
        self.history[start..].copy_from_slice(&self.block[..n]);
    }
}

impl<S: PcmSource> AudioSession for PcmSession<S> {
    fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    fn read_frequency_data(&mut self, out: &mut [f32]) -> VibeResult<()> {
        self.pull();
        let fft = &mut self.fft;
        for ((dst, &s), &w) in fft.input.iter_mut().zip(&self.history).zip(&fft.window) {
            *dst = s * w;
        }
        fft.plan
            .process_with_scratch(&mut fft.input, &mut fft.spectrum, &mut fft.scratch)
            .map_err(|e| VibeError::Other(anyhow::anyhow!("fft failed: {e}")))?;

        let norm = self.fft_size as f32;
        for (dst, bin) in out.iter_mut().zip(&fft.spectrum) {
            let mag = bin.norm() / norm;
            let db = 20.0 * mag.max(1e-12).log10();
            *dst = ((db - MIN_DECIBELS) / (MAX_DECIBELS - MIN_DECIBELS)).clamp(0.0, 1.0);
        }
        Ok(())
    }
}

fn hann_value(index: usize, len: usize) -> f32 {
    if len <= 1 {
        return 1.0;
    }
    let x = index as f32 / (len - 1) as f32;
    0.5 - 0.5 * (std::f32::consts::TAU * x).cos()
}

#[cfg(test)]
#[path = "../../tests/unit/audio/device.rs"]
mod tests;
