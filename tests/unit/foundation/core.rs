use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_frame_duration() {
    let fps = Fps::new(60, 1).unwrap();
    assert!((fps.frame_duration_secs() - 1.0 / 60.0).abs() < 1e-12);
    assert!((fps.frames_to_secs(120) - 2.0).abs() < 1e-12);
}

#[test]
fn canvas_validation() {
    assert!(
        Canvas {
            width: 800.0,
            height: 600.0
        }
        .validate()
        .is_ok()
    );
    assert!(
        Canvas {
            width: 0.0,
            height: 600.0
        }
        .validate()
        .is_err()
    );
    assert!(
        Canvas {
            width: 800.0,
            height: f64::NAN
        }
        .validate()
        .is_err()
    );
}
