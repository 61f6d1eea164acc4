use super::*;
use crate::{
    audio::levels::AudioBand,
    vibe::model::{AudioReactiveConfig, HueTarget},
};
use std::f64::consts::{FRAC_PI_2, PI};

struct Fixed(f64);

impl RandomSource for Fixed {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}

fn eval() -> VibeEvaluator<Rng64> {
    VibeEvaluator::new(Rng64::new(7))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn unset_kind_is_identity() {
    let vibe = VibeConfig {
        hue_amplitude: 30.0,
        ..VibeConfig::default()
    };
    assert!(eval().evaluate(&vibe, 1.0, None).is_identity());
}

#[test]
fn pulse_scale_follows_sine() {
    let vibe = VibeConfig::new(VibeKind::Pulse).with_frequency(1.0);
    let mut e = eval();
    assert_eq!(e.evaluate(&vibe, 0.0, None).scale, 1.0);
    assert!(close(e.evaluate(&vibe, FRAC_PI_2, None).scale, 1.1));
}

#[test]
fn pulse_falls_back_to_speed() {
    let vibe = VibeConfig {
        speed: Some(2.0),
        ..VibeConfig::new(VibeKind::Pulse)
    };
    let d = eval().evaluate(&vibe, PI / 4.0, None);
    assert!(close(d.scale, 1.1));
}

#[test]
fn float_moves_vertically() {
    let vibe = VibeConfig::new(VibeKind::Float)
        .with_amplitude(10.0)
        .with_frequency(1.0)
        .with_intensity(1.0);
    let d = eval().evaluate(&vibe, FRAC_PI_2, None);
    assert!(close(d.translate.y, 10.0));
    assert_eq!(d.translate.x, 0.0);
    assert_eq!(d.scale, 1.0);
}

#[test]
fn phase_offset_is_degrees() {
    let vibe = VibeConfig {
        phase_offset: 90.0,
        ..VibeConfig::new(VibeKind::Float).with_intensity(1.0)
    };
    let d = eval().evaluate(&vibe, 0.0, None);
    assert!(close(d.translate.y, 10.0));
}

#[test]
fn shake_stays_within_amplitude() {
    let vibe = VibeConfig::new(VibeKind::Shake).with_intensity(1.0);
    let mut e = eval();
    for i in 0..200 {
        let d = e.evaluate(&vibe, f64::from(i), None);
        assert!(d.translate.x.abs() <= 5.0);
        assert!(d.translate.y.abs() <= 5.0);
    }
}

#[test]
fn shake_uses_injected_source() {
    let vibe = VibeConfig::new(VibeKind::Shake).with_intensity(1.0);
    let mut e = VibeEvaluator::new(Fixed(1.0));
    let d = e.evaluate(&vibe, 0.0, None);
    assert!(close(d.translate.x, 5.0));
    assert!(close(d.translate.y, 5.0));
}

#[test]
fn rotation_contributes_only_through_spin() {
    let vibe = VibeConfig::new(VibeKind::Rotation)
        .with_frequency(1.0)
        .with_intensity(1.0);
    assert!(eval().evaluate(&vibe, 1.0, None).is_identity());
    assert!(close(spin_degrees(&vibe, FRAC_PI_2, None), 90.0));
    assert_eq!(spin_degrees(&VibeConfig::new(VibeKind::Pulse), 1.0, None), 0.0);
}

#[test]
fn glow_radius_oscillates_around_base() {
    let vibe = VibeConfig::new(VibeKind::Glow).with_intensity(1.0);
    let d = eval().evaluate(&vibe, 0.0, None);
    assert_eq!(d.glow_radius, Some(8.0));
}

#[test]
fn hue_respects_target_flags() {
    let vibe = VibeConfig::new(VibeKind::Float).with_hue(40.0, HueTarget::Stroke);
    let d = eval().evaluate(&vibe, FRAC_PI_2, None);
    assert!(close(d.hue_rotate.unwrap(), 40.0));
    assert!(d.hue_stroke);
    assert!(!d.hue_fill);
}

#[test]
fn audio_scales_modulated_parameter() {
    let mut vibe = VibeConfig::new(VibeKind::Float)
        .with_intensity(1.0)
        .with_amplitude(10.0);
    vibe.audio_reactive = Some(AudioReactiveConfig {
        parameter: "amplitude".to_string(),
        band: AudioBand::Bass,
        multiplier: 2.0,
        smoothing: 0.8,
    });
    let quiet = eval().evaluate(&vibe, FRAC_PI_2, None);
    let loud = eval().evaluate(&vibe, FRAC_PI_2, Some(0.5));
    assert!(close(quiet.translate.y, 10.0));
    assert!(close(loud.translate.y, 20.0));
}

#[test]
fn audio_ignored_without_config() {
    let vibe = VibeConfig::new(VibeKind::Float).with_intensity(1.0);
    let d = eval().evaluate(&vibe, FRAC_PI_2, Some(1.0));
    assert!(close(d.translate.y, 10.0));
}

#[test]
fn flicker_spikes_when_draw_is_low() {
    let vibe = VibeConfig::new(VibeKind::OpacityFlicker).with_intensity(0.8);
    assert!(close(VibeEvaluator::new(Fixed(0.0)).flicker_opacity(&vibe, None), 1.0));
    assert!(close(VibeEvaluator::new(Fixed(0.5)).flicker_opacity(&vibe, None), 0.4));
    assert_eq!(
        VibeEvaluator::new(Fixed(0.0)).flicker_opacity(&VibeConfig::new(VibeKind::Pulse), None),
        1.0
    );
}

#[test]
fn flicker_spike_rate_is_about_two_percent() {
    let vibe = VibeConfig::new(VibeKind::OpacityFlicker).with_intensity(0.5);
    let mut e = VibeEvaluator::new(Rng64::new(42));
    let spikes = (0..1000)
        .filter(|_| e.flicker_opacity(&vibe, None) > 0.4)
        .count();
    assert!((5..=40).contains(&spikes), "spikes = {spikes}");
}
