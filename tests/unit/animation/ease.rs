use super::*;

const ALL: [Ease; 5] = [
    Ease::Linear,
    Ease::Ease,
    Ease::EaseIn,
    Ease::EaseOut,
    Ease::EaseInOut,
];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::EaseIn.apply(-1.0), 0.0);
    assert_eq!(Ease::EaseOut.apply(2.0), 1.0);
}

#[test]
fn wire_names_are_kebab_case() {
    let e: Ease = serde_json::from_str("\"ease-in-out\"").unwrap();
    assert_eq!(e, Ease::EaseInOut);
    assert_eq!(serde_json::to_string(&Ease::EaseIn).unwrap(), "\"ease-in\"");
}
