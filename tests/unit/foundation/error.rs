use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        VibeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        VibeError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        VibeError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        VibeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        VibeError::audio_unavailable("no device")
            .to_string()
            .contains("audio unavailable:")
    );
}

#[test]
fn cycle_names_both_objects() {
    let msg = VibeError::cycle("a", "b").to_string();
    assert!(msg.contains("'a'"));
    assert!(msg.contains("'b'"));
}

#[test]
fn condition_reports_offset() {
    let msg = VibeError::condition(7, "unexpected '('").to_string();
    assert!(msg.contains("byte 7"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: VibeError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, VibeError::Serde(_)));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = VibeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
