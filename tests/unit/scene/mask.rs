use super::*;
use crate::{
    foundation::core::Canvas,
    scene::model::{Asset, AssetNode, ObjectTarget, Primitive},
};

fn shape_asset(id: &str) -> Asset {
    Asset {
        id: id.into(),
        name: String::new(),
        width: None,
        height: None,
        nodes: vec![AssetNode::Shape(Drawable {
            primitive: Primitive::Rect {
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height: 10.0,
            },
            fill: Some("#123456".into()),
            stroke: None,
            stroke_width: None,
        })],
    }
}

fn graph() -> SceneGraph {
    let mut g = SceneGraph::new(Canvas {
        width: 100.0,
        height: 100.0,
    });
    g.upsert_asset(shape_asset("rect")).unwrap();
    g.upsert_asset(Asset {
        id: "empty".into(),
        name: String::new(),
        width: None,
        height: None,
        nodes: vec![],
    })
    .unwrap();
    g.add_layer("l", "Layer").unwrap();
    for (id, asset) in [("target", "rect"), ("shape", "rect"), ("blank", "empty")] {
        g.insert_object("l", SceneObject::new(id, ObjectTarget::Asset(asset.into())))
            .unwrap();
    }
    g
}

#[test]
fn bind_clip_path_keeps_fill() {
    let mut g = graph();
    let mut binder = MaskBinder::new();
    let bound = binder
        .bind(&mut g, "target", "shape", MaskKind::ClipPath)
        .unwrap();
    assert_eq!(bound.id, "mask-target");
    assert_eq!(bound.shape.fill.as_deref(), Some("#123456"));
    assert_eq!(
        g.object("target").unwrap().mask,
        Some(MaskRef {
            object_id: "shape".into(),
            kind: MaskKind::ClipPath
        })
    );
    assert_eq!(binder.definition("mask-target"), Some(&bound));
}

#[test]
fn bind_mask_forces_white_fill() {
    let mut g = graph();
    let bound = MaskBinder::new()
        .bind(&mut g, "target", "shape", MaskKind::Mask)
        .unwrap();
    assert_eq!(bound.shape.fill.as_deref(), Some("#ffffff"));
    // Source asset is untouched.
    let src = g.assets["rect"].first_drawable().unwrap();
    assert_eq!(src.fill.as_deref(), Some("#123456"));
}

#[test]
fn bind_errors() {
    let mut g = graph();
    let mut binder = MaskBinder::new();
    assert!(binder.bind(&mut g, "target", "target", MaskKind::Mask).is_err());
    assert!(binder.bind(&mut g, "ghost", "shape", MaskKind::Mask).is_err());
    assert!(binder.bind(&mut g, "target", "blank", MaskKind::Mask).is_err());
    assert!(g.object("target").unwrap().mask.is_none());
}

#[test]
fn resolve_follows_graph_and_absorbs_broken_refs() {
    let mut g = graph();
    let mut binder = MaskBinder::new();
    binder
        .bind(&mut g, "target", "shape", MaskKind::ClipPath)
        .unwrap();
    let target = g.object("target").unwrap().clone();
    assert!(MaskBinder::resolve(&g, &target).is_some());

    g.objects.remove("shape");
    assert!(MaskBinder::resolve(&g, &target).is_none());
}

#[test]
fn unbind_leaves_definition_until_reaped() {
    let mut g = graph();
    let mut binder = MaskBinder::new();
    binder
        .bind(&mut g, "target", "shape", MaskKind::Mask)
        .unwrap();
    binder.unbind(&mut g, "target").unwrap();
    assert!(g.object("target").unwrap().mask.is_none());
    assert!(binder.definition("mask-target").is_some());

    assert_eq!(binder.reap_orphans(&g), 1);
    assert!(binder.definition("mask-target").is_none());
    assert_eq!(binder.definitions().count(), 0);
}

#[test]
fn reap_keeps_live_definitions() {
    let mut g = graph();
    let mut binder = MaskBinder::new();
    binder
        .bind(&mut g, "target", "shape", MaskKind::Mask)
        .unwrap();
    assert_eq!(binder.reap_orphans(&g), 0);
    assert_eq!(binder.definitions().count(), 1);
}
