use super::*;

#[test]
fn empty_object_uses_defaults() {
    let cfg = EngineConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, EngineConfig::default());
    assert_eq!(cfg.seed, None);
    assert_eq!(cfg.audio.fft_size, 2048);
}

#[test]
fn seeded_keeps_default_audio() {
    let cfg = EngineConfig::seeded(42);
    assert_eq!(cfg.seed, Some(42));
    assert_eq!(cfg.audio, AudioConfig::default());
}

#[test]
fn parses_seed_and_audio_overrides() {
    let cfg =
        EngineConfig::from_json_str(r#"{"seed": 7, "audio": {"smoothing": 0.5}}"#).unwrap();
    assert_eq!(cfg.seed, Some(7));
    assert_eq!(cfg.audio.smoothing, 0.5);
    assert_eq!(cfg.audio.interval_ms, 16);
}

#[test]
fn rejects_invalid_audio() {
    assert!(EngineConfig::from_json_str(r#"{"audio": {"smoothing": 1.5}}"#).is_err());
    assert!(EngineConfig::from_json_str(r#"{"seed": "x"}"#).is_err());
}
