use super::*;

fn key(time: f64, value: f64, easing: Option<Ease>) -> Keyframe {
    Keyframe {
        time,
        value: KeyValue::Number(value),
        easing,
    }
}

fn text_key(time: f64, value: &str) -> Keyframe {
    Keyframe {
        time,
        value: KeyValue::Text(value.to_string()),
        easing: None,
    }
}

fn track(property: &str, keyframes: Vec<Keyframe>) -> PropertyTrack {
    PropertyTrack {
        property: property.to_string(),
        keyframes,
    }
}

#[test]
fn empty_track_has_no_value() {
    assert_eq!(track("x", vec![]).value_at(0.5), None);
}

#[test]
fn clamps_outside_key_range() {
    let tr = track("x", vec![key(1.0, 10.0, None), key(2.0, 20.0, None)]);
    assert_eq!(tr.value_at(0.0), Some(KeyValue::Number(10.0)));
    assert_eq!(tr.value_at(5.0), Some(KeyValue::Number(20.0)));
}

#[test]
fn linear_midpoint_is_mean() {
    let tr = track("x", vec![key(0.0, 4.0, None), key(2.0, 10.0, None)]);
    assert_eq!(tr.value_at(1.0), Some(KeyValue::Number(7.0)));
}

#[test]
fn unsorted_keys_are_sorted_on_read() {
    let tr = track("x", vec![key(2.0, 10.0, None), key(0.0, 0.0, None)]);
    assert_eq!(tr.value_at(1.0), Some(KeyValue::Number(5.0)));
}

#[test]
fn ending_keyframe_easing_applies() {
    let tr = track(
        "x",
        vec![key(0.0, 0.0, Some(Ease::EaseOut)), key(1.0, 1.0, Some(Ease::EaseIn))],
    );
    let v = tr.value_at(0.5).and_then(|v| v.as_number()).unwrap();
    assert!((v - 0.25).abs() < 1e-12);
}

#[test]
fn plain_strings_step_at_half() {
    let tr = track("label", vec![text_key(0.0, "idle"), text_key(1.0, "busy")]);
    assert_eq!(tr.value_at(0.49), Some(KeyValue::Text("idle".to_string())));
    assert_eq!(tr.value_at(0.5), Some(KeyValue::Text("busy".to_string())));
}

#[test]
fn hex_colors_are_blended() {
    let tr = track("fill", vec![text_key(0.0, "#000"), text_key(1.0, "#ffffff")]);
    assert_eq!(tr.value_at(0.5), Some(KeyValue::Text("#808080".to_string())));
}

#[test]
fn mixed_kinds_step() {
    let tr = track("x", vec![key(0.0, 1.0, None), text_key(1.0, "auto")]);
    assert_eq!(tr.value_at(0.25), Some(KeyValue::Number(1.0)));
    assert_eq!(tr.value_at(0.75), Some(KeyValue::Text("auto".to_string())));
}

fn anim(duration: f64, looping: bool, basis: TimeBasis, keys: Vec<Keyframe>) -> AnimationTrack {
    AnimationTrack {
        object_id: "o".to_string(),
        duration,
        looping,
        time_basis: basis,
        tracks: vec![track("x", keys)],
    }
}

#[test]
fn looping_wraps_time() {
    let a = anim(
        2.0,
        true,
        TimeBasis::Seconds,
        vec![key(0.0, 0.0, None), key(2.0, 20.0, None)],
    );
    assert_eq!(a.sample(3.0).get("x"), Some(&KeyValue::Number(10.0)));
    assert!((a.local_time(-0.5) - 1.5).abs() < 1e-12);
}

#[test]
fn non_looping_clamps_time() {
    let a = anim(
        2.0,
        false,
        TimeBasis::Seconds,
        vec![key(0.0, 0.0, None), key(2.0, 20.0, None)],
    );
    assert_eq!(a.sample(10.0).get("x"), Some(&KeyValue::Number(20.0)));
}

#[test]
fn auto_basis_detects_normalized_keys() {
    let a = anim(
        4.0,
        false,
        TimeBasis::Auto,
        vec![key(0.0, 0.0, None), key(1.0, 100.0, None)],
    );
    assert!(a.is_normalized());
    assert_eq!(a.sample(2.0).get("x"), Some(&KeyValue::Number(50.0)));
}

#[test]
fn explicit_seconds_basis_overrides_heuristic() {
    let a = anim(
        4.0,
        false,
        TimeBasis::Seconds,
        vec![key(0.0, 0.0, None), key(1.0, 100.0, None)],
    );
    assert!(!a.is_normalized());
    assert_eq!(a.sample(0.5).get("x"), Some(&KeyValue::Number(50.0)));
}

#[test]
fn loop_flag_uses_loop_on_the_wire() {
    let json = r#"{"objectId":"o","duration":1.0,"loop":true,"tracks":[]}"#;
    let a: AnimationTrack = serde_json::from_str(json).unwrap();
    assert!(a.looping);
    assert_eq!(a.time_basis, TimeBasis::Auto);
}

#[test]
fn validate_rejects_negative_duration() {
    let a = anim(-1.0, false, TimeBasis::Auto, vec![]);
    assert!(a.validate().is_err());
}

#[test]
fn non_finite_time_reads_an_end_keyframe() {
    let tr = track("x", vec![key(0.0, 1.0, None), key(1.0, 3.0, None)]);
    assert_eq!(tr.value_at(f64::NAN), Some(KeyValue::Number(1.0)));
    assert_eq!(tr.value_at(f64::NEG_INFINITY), Some(KeyValue::Number(1.0)));
    assert_eq!(tr.value_at(f64::INFINITY), Some(KeyValue::Number(3.0)));
}
