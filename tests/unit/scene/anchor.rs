use super::*;
use crate::scene::model::ObjectTarget;

fn object(x: f64, y: f64, anchor: Option<AnchorConfig>) -> SceneObject {
    let mut o = SceneObject::new("o", ObjectTarget::Asset("a".into()));
    o.x = x;
    o.y = y;
    o.anchor = anchor;
    o
}

#[test]
fn no_anchor_keeps_literal_position() {
    let o = object(12.0, 34.0, None);
    assert_eq!(
        AnchorPositioner::position(&o, Some(800.0), Some(600.0)),
        Point::new(12.0, 34.0)
    );
}

#[test]
fn missing_dimension_keeps_literal_position() {
    let a = AnchorConfig::new(HorizontalAnchor::Center, VerticalAnchor::Middle);
    let o = object(10.0, 20.0, Some(a));
    assert_eq!(
        AnchorPositioner::position(&o, None, Some(600.0)),
        Point::new(10.0, 20.0)
    );
    assert_eq!(
        AnchorPositioner::position(&o, Some(800.0), None),
        Point::new(10.0, 20.0)
    );
}

#[test]
fn center_middle_offsets_from_midpoint() {
    let a = AnchorConfig::new(HorizontalAnchor::Center, VerticalAnchor::Middle);
    let o = object(10.0, -20.0, Some(a));
    assert_eq!(
        AnchorPositioner::position(&o, Some(800.0), Some(600.0)),
        Point::new(410.0, 280.0)
    );
}

#[test]
fn right_bottom_measure_inward() {
    let a = AnchorConfig::new(HorizontalAnchor::Right, VerticalAnchor::Bottom);
    let o = object(10.0, 20.0, Some(a));
    assert_eq!(
        AnchorPositioner::position(&o, Some(800.0), Some(600.0)),
        Point::new(790.0, 580.0)
    );
}

#[test]
fn left_top_is_literal() {
    let o = object(3.0, 4.0, Some(AnchorConfig::default()));
    assert_eq!(
        AnchorPositioner::position(&o, Some(100.0), Some(100.0)),
        Point::new(3.0, 4.0)
    );
}

#[test]
fn parses_camel_case_edges() {
    let a: AnchorConfig = serde_json::from_str(r#"{"x":"center","y":"bottom"}"#).unwrap();
    assert_eq!(a, AnchorConfig::new(HorizontalAnchor::Center, VerticalAnchor::Bottom));
}
