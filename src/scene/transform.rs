use crate::{
    foundation::core::{Affine, Point, Vec2},
    scene::{graph::SceneGraph, model::SceneObject},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Position, uniform scale and rotation (degrees) of an object.
pub struct Transform {
    /// X position.
    pub x: f64,
    /// Y position.
    pub y: f64,
    /// Uniform scale.
    pub scale: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

/// A transform expressed in scene coordinates.
pub type GlobalTransform = Transform;

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Origin, unit scale, no rotation.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        rotation: 0.0,
    };

    /// Transform at `(x, y)` with unit scale.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::IDENTITY
        }
    }

    /// Translation component.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Map a point from this transform's local space into its parent space.
    pub fn apply_to(&self, local: Vec2) -> Vec2 {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let rotated = Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos);
        rotated * self.scale + Vec2::new(self.x, self.y)
    }

    /// Equivalent `translate * rotate * scale` affine.
    pub fn to_affine(&self) -> Affine {
        Affine::translate((self.x, self.y))
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale(self.scale)
    }
}

/// Composes ancestor transforms into a global transform.
pub struct TransformResolver;

impl TransformResolver {
    /// Global transform of `object` from stored locals.
    pub fn resolve(object: &SceneObject, graph: &SceneGraph) -> GlobalTransform {
        Self::resolve_with(object, graph, |o| o.local())
    }

    /// Global transform of `object`, reading each local through `local`.
    ///
    /// The walk stops at the first missing parent. Parent chains are acyclic
    /// when built through the graph mutation API; a hand-built cycle ends the
    /// walk after visiting every object once.
    pub fn resolve_with(
        object: &SceneObject,
        graph: &SceneGraph,
        local: impl Fn(&SceneObject) -> Transform,
    ) -> GlobalTransform {
        let mut out = local(object);
        let mut parent_id = object.parent_id.as_deref();
        let mut hops = 0usize;

        while let Some(pid) = parent_id {
            let Some(parent) = graph.objects.get(pid) else {
                tracing::debug!(object = %object.id, parent = pid, "broken parent reference");
                break;
            };
            hops += 1;
            if hops > graph.objects.len() {
                tracing::debug!(object = %object.id, "parent chain does not terminate");
                break;
            }

            let p = local(parent);
            let pos = p.apply_to(Vec2::new(out.x, out.y));
            out.x = pos.x;
            out.y = pos.y;
            out.scale *= p.scale;
            out.rotation += p.rotation;
            parent_id = parent.parent_id.as_deref();
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/transform.rs"]
mod tests;
