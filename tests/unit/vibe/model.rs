use super::*;

#[test]
fn parses_editor_wire_format() {
    let json = r#"{
        "type": "opacity_flicker",
        "intensity": 0.7,
        "phaseOffset": 45,
        "hueAmplitude": 20,
        "target": "stroke",
        "audioReactive": { "parameter": "intensity", "band": "treble" }
    }"#;
    let v: VibeConfig = serde_json::from_str(json).unwrap();
    assert_eq!(v.kind, Some(VibeKind::OpacityFlicker));
    assert_eq!(v.intensity(), 0.7);
    assert_eq!(v.target, HueTarget::Stroke);
    let ar = v.audio_reactive.unwrap();
    assert_eq!(ar.band, AudioBand::Treble);
    assert_eq!(ar.multiplier, 1.0);
    assert_eq!(ar.smoothing, 0.8);
}

#[test]
fn missing_type_parses_as_unset() {
    let v: VibeConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(v.kind, None);
    assert_eq!(v.target, HueTarget::Both);
}

#[test]
fn defaults_depend_on_kind() {
    assert_eq!(VibeConfig::new(VibeKind::Float).amplitude(), 10.0);
    assert_eq!(VibeConfig::new(VibeKind::Shake).amplitude(), 5.0);
    assert_eq!(VibeConfig::new(VibeKind::Glow).radius(), 8.0);
    assert_eq!(VibeConfig::new(VibeKind::Pulse).intensity(), 0.5);
}

#[test]
fn frequency_prefers_frequency_over_speed() {
    let v = VibeConfig {
        speed: Some(3.0),
        frequency: Some(2.0),
        ..VibeConfig::new(VibeKind::Pulse)
    };
    assert_eq!(v.frequency(), 2.0);
    let v = VibeConfig {
        speed: Some(3.0),
        ..VibeConfig::new(VibeKind::Pulse)
    };
    assert_eq!(v.frequency(), 3.0);
}

#[test]
fn validate_rejects_bad_smoothing() {
    let mut v = VibeConfig::new(VibeKind::Pulse);
    v.audio_reactive = Some(AudioReactiveConfig {
        parameter: String::new(),
        band: AudioBand::Bass,
        multiplier: 1.0,
        smoothing: 1.5,
    });
    assert!(v.validate().is_err());
    v.audio_reactive = None;
    v.intensity = Some(f64::INFINITY);
    assert!(v.validate().is_err());
}
