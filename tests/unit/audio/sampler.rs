use super::*;

use std::sync::atomic::AtomicUsize;

#[derive(Default)]
struct Counters {
    opened: AtomicUsize,
    released: AtomicUsize,
}

struct FakeSession {
    counters: Arc<Counters>,
    value: f32,
}

impl AudioSession for FakeSession {
    fn sample_rate(&self) -> u32 {
        48_000
    }

    fn bin_count(&self) -> usize {
        1024
    }

    fn read_frequency_data(&mut self, out: &mut [f32]) -> VibeResult<()> {
        out.fill(self.value);
        Ok(())
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

struct FakeDevice {
    counters: Arc<Counters>,
    deny: bool,
}

impl AudioDevice for FakeDevice {
    fn open(&self) -> VibeResult<Box<dyn AudioSession>> {
        if self.deny {
            return Err(VibeError::validation("permission denied"));
        }
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            counters: Arc::clone(&self.counters),
            value: 1.0,
        }))
    }
}

fn sampler(deny: bool) -> (AudioReactiveSampler, Arc<Counters>) {
    let counters = Arc::new(Counters::default());
    let device = Arc::new(FakeDevice {
        counters: Arc::clone(&counters),
        deny,
    });
    let config = AudioConfig {
        interval_ms: 1,
        smoothing: 0.0,
        ..AudioConfig::default()
    };
    (AudioReactiveSampler::new(device, config), counters)
}

fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..2_000 {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    false
}

#[test]
fn band_energy_averages_bins_in_range() {
    // 4 bins at 48 kHz: centres 0, 6000, 12000, 18000 Hz.
    let bins = [0.2, 0.4, 0.6, 0.8];
    assert_eq!(band_energy(&bins, 48_000, 0.0, 1.0), 0.2_f32 as f64);
    let mid = band_energy(&bins, 48_000, 5_000.0, 13_000.0);
    assert!((mid - 0.5).abs() < 1e-6);
    assert_eq!(band_energy(&bins, 48_000, 1.0, 2.0), 0.0);
    assert_eq!(band_energy(&[], 48_000, 0.0, 100.0), 0.0);
}

#[test]
fn analyser_smooths_towards_input() {
    let config = AudioConfig {
        smoothing: 0.5,
        ..AudioConfig::default()
    };
    let mut analyser = BandAnalyser::new(&config);
    let bins = vec![1.0; 1024];
    let first = analyser.ingest(&bins, 48_000);
    assert!((first[0] - 0.5).abs() < 1e-9);
    let second = analyser.ingest(&bins, 48_000);
    assert!((second[0] - 0.75).abs() < 1e-9);
    analyser.reset();
    let again = analyser.ingest(&bins, 48_000);
    assert!((again[0] - 0.5).abs() < 1e-9);
}

#[test]
fn config_validation() {
    assert!(AudioConfig::default().validate().is_ok());
    let bad = AudioConfig {
        smoothing: 1.5,
        ..AudioConfig::default()
    };
    assert!(bad.validate().is_err());
    let bad = AudioConfig {
        fft_size: 1000,
        ..AudioConfig::default()
    };
    assert!(bad.validate().is_err());
    let bad = AudioConfig {
        bass_max_hz: 5_000.0,
        ..AudioConfig::default()
    };
    assert!(bad.validate().is_err());
}

#[test]
fn config_defaults_from_empty_json() {
    let cfg: AudioConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, AudioConfig::default());
}

#[test]
fn levels_are_zero_before_start() {
    let (s, _) = sampler(false);
    for band in AudioBand::ALL {
        assert_eq!(s.frequency_data(band), 0.0);
    }
    assert!(!s.is_running());
}

#[test]
fn start_publishes_levels_and_stop_releases_session() {
    let (mut s, counters) = sampler(false);
    s.start().unwrap();
    assert!(s.is_running());
    assert!(wait_for(|| s.frequency_data(AudioBand::Bass) > 0.9));

    s.stop();
    assert!(!s.is_running());
    assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
    assert_eq!(counters.released.load(Ordering::SeqCst), 1);
    for band in AudioBand::ALL {
        assert_eq!(s.frequency_data(band), 0.0);
    }
}

#[test]
fn start_is_idempotent() {
    let (mut s, counters) = sampler(false);
    s.start().unwrap();
    s.start().unwrap();
    assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
    s.stop();
    s.stop();
    assert_eq!(counters.released.load(Ordering::SeqCst), 1);
}

#[test]
fn denied_device_is_audio_unavailable() {
    let (mut s, _) = sampler(true);
    let err = s.start().unwrap_err();
    assert!(matches!(err, VibeError::AudioUnavailable(_)));
    assert!(!s.is_running());
    assert_eq!(s.frequency_data(AudioBand::Mid), 0.0);
}

#[test]
fn drop_releases_session() {
    let (mut s, counters) = sampler(false);
    s.start().unwrap();
    drop(s);
    assert_eq!(counters.released.load(Ordering::SeqCst), 1);
}

#[test]
fn restart_opens_a_fresh_session() {
    let (mut s, counters) = sampler(false);
    s.start().unwrap();
    s.stop();
    s.start().unwrap();
    s.stop();
    assert_eq!(counters.opened.load(Ordering::SeqCst), 2);
    assert_eq!(counters.released.load(Ordering::SeqCst), 2);
}
