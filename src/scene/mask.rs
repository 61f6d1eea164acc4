use std::collections::BTreeMap;

use crate::{
    foundation::error::{VibeError, VibeResult},
    scene::{
        graph::SceneGraph,
        model::{Drawable, MaskKind, MaskRef, SceneObject},
    },
};

const MASK_FILL: &str = "#ffffff";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Clip or mask definition derived from another object's shape.
pub struct BoundMask {
    /// Definition id, `mask-<target>`.
    pub id: String,
    /// Clip or mask.
    pub kind: MaskKind,
    /// Masked object.
    pub target_id: String,
    /// Object providing the shape.
    pub source_id: String,
    /// Cloned shape. For [`MaskKind::Mask`] its fill is white.
    pub shape: Drawable,
}

/// Binds objects to clip/mask definitions keyed by target id.
#[derive(Clone, Debug, Default)]
pub struct MaskBinder {
    definitions: BTreeMap<String, BoundMask>,
}

impl MaskBinder {
    /// Binder with no definitions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Definition id for `target_id`.
    pub fn mask_id(target_id: &str) -> String {
        format!("mask-{target_id}")
    }

    /// Definition by id.
    pub fn definition(&self, id: &str) -> Option<&BoundMask> {
        self.definitions.get(id)
    }

    /// All definitions, ordered by id.
    pub fn definitions(&self) -> impl Iterator<Item = &BoundMask> {
        self.definitions.values()
    }

    /// Mask `target_id` with the first drawable of `mask_object_id`.
    pub fn bind(
        &mut self,
        graph: &mut SceneGraph,
        target_id: &str,
        mask_object_id: &str,
        kind: MaskKind,
    ) -> VibeResult<BoundMask> {
        if target_id == mask_object_id {
            return Err(VibeError::validation(format!(
                "object '{target_id}' cannot mask itself"
            )));
        }
        let target = graph
            .object(target_id)
            .ok_or_else(|| VibeError::not_found(format!("object '{target_id}'")))?;
        let source = graph
            .object(mask_object_id)
            .ok_or_else(|| VibeError::not_found(format!("mask object '{mask_object_id}'")))?;
        let shape = Self::source_shape(graph, source).ok_or_else(|| {
            VibeError::not_found(format!("mask object '{mask_object_id}' has no drawable shape"))
        })?;
        let bound = Self::build(&target.id, mask_object_id, kind, shape.clone());

        graph.set_mask(
            target_id,
            Some(MaskRef {
                object_id: mask_object_id.to_owned(),
                kind,
            }),
        )?;
        self.definitions.insert(bound.id.clone(), bound.clone());
        Ok(bound)
    }

    /// Binding for `target` as the graph stands, or `None` when it has no
    /// mask reference or the reference no longer resolves to a shape.
    pub fn resolve(graph: &SceneGraph, target: &SceneObject) -> Option<BoundMask> {
        let mask = target.mask.as_ref()?;
        let Some(source) = graph.object(&mask.object_id) else {
            tracing::debug!(object = %target.id, mask = %mask.object_id, "broken mask reference");
            return None;
        };
        let shape = Self::source_shape(graph, source)?;
        Some(Self::build(&target.id, &mask.object_id, mask.kind, shape.clone()))
    }

    /// Clear the mask reference of `target_id`. The definition is kept until
    /// [`MaskBinder::reap_orphans`].
    pub fn unbind(&mut self, graph: &mut SceneGraph, target_id: &str) -> VibeResult<()> {
        graph.set_mask(target_id, None)
    }

    /// Drop definitions whose target no longer references their source.
    /// Returns how many were removed.
    pub fn reap_orphans(&mut self, graph: &SceneGraph) -> usize {
        let before = self.definitions.len();
        self.definitions.retain(|_, def| {
            graph
                .object(&def.target_id)
                .and_then(|o| o.mask.as_ref())
                .is_some_and(|m| m.object_id == def.source_id)
        });
        before - self.definitions.len()
    }

    fn source_shape<'a>(graph: &'a SceneGraph, source: &SceneObject) -> Option<&'a Drawable> {
        graph.asset_for(&source.target)?.first_drawable()
    }

    fn build(target_id: &str, source_id: &str, kind: MaskKind, mut shape: Drawable) -> BoundMask {
        if kind == MaskKind::Mask {
            shape.fill = Some(MASK_FILL.to_owned());
        }
        BoundMask {
            id: Self::mask_id(target_id),
            kind,
            target_id: target_id.to_owned(),
            source_id: source_id.to_owned(),
            shape,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/mask.rs"]
mod tests;
