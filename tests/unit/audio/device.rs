use super::*;

struct Sine {
    hz: f32,
    rate: u32,
    t: u64,
}

impl PcmSource for Sine {
    fn sample_rate(&self) -> u32 {
        self.rate
    }

    fn read_samples(&mut self, out: &mut [f32]) -> usize {
        for s in out.iter_mut() {
            let secs = self.t as f32 / self.rate as f32;
            *s = (std::f32::consts::TAU * self.hz * secs).sin();
            self.t += 1;
        }
        out.len()
    }
}

struct Silence;

impl PcmSource for Silence {
    fn sample_rate(&self) -> u32 {
        48_000
    }

    fn read_samples(&mut self, out: &mut [f32]) -> usize {
        out.fill(0.0);
        out.len()
    }
}

#[test]
fn rejects_bad_fft_sizes() {
    assert!(PcmSession::new(Silence, 100).is_err());
    assert!(PcmSession::new(Silence, 16).is_err());
    assert!(PcmSession::new(Silence, 1024).is_ok());
}

#[test]
fn silence_maps_to_zero() {
    let mut session = PcmSession::new(Silence, 512).unwrap();
    let mut bins = vec![1.0; session.bin_count()];
    session.read_frequency_data(&mut bins).unwrap();
    assert!(bins.iter().all(|&b| b == 0.0));
}

#[test]
fn tone_peaks_near_its_bin() {
    let rate = 48_000;
    let size = 1024;
    let mut session = PcmSession::new(
        Sine {
            hz: 1_500.0,
            rate,
            t: 0,
        },
        size,
    )
    .unwrap();
    let mut bins = vec![0.0; session.bin_count()];
    session.read_frequency_data(&mut bins).unwrap();

    let peak = bins
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap();
    let expected = (1_500.0 * size as f32 / rate as f32).round() as usize;
    assert!(peak.abs_diff(expected) <= 1, "peak={peak} expected={expected}");
    assert!(bins[peak] > 0.5);
}
