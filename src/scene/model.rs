use crate::{
    foundation::error::{VibeError, VibeResult},
    interaction::{events::ComponentEvent, machine::StateMachine},
    scene::{anchor::AnchorConfig, transform::Transform},
    vibe::model::VibeConfig,
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// What a scene object places: a plain asset or a component instance.
pub enum ObjectTarget {
    /// Asset id.
    Asset(String),
    /// Component id.
    Component(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Definition kind produced by a mask binding.
pub enum MaskKind {
    /// Hard clip to the mask shape.
    ClipPath,
    /// Luminance mask; the shape is painted white.
    Mask,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Reference from a masked object to the object providing the mask shape.
pub struct MaskRef {
    /// Scene object whose shape is used.
    pub object_id: String,
    /// Clip or mask.
    pub kind: MaskKind,
}

fn default_scale() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A placed instance of an asset or component.
pub struct SceneObject {
    /// Unique object id.
    pub id: String,
    /// Referenced asset or component.
    pub target: ObjectTarget,
    /// Local x.
    #[serde(default)]
    pub x: f64,
    /// Local y.
    #[serde(default)]
    pub y: f64,
    /// Uniform local scale.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Local rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Stacking order within the layer.
    #[serde(default)]
    pub z: i32,
    /// Parent object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Anchor overriding the global position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<AnchorConfig>,
    /// Mask binding reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<MaskRef>,
    #[serde(default = "default_true")]
    /// Hidden objects are skipped by frame evaluation.
    pub visible: bool,
    #[serde(default)]
    /// Locked objects reject transform edits.
    pub locked: bool,
    /// Name of the component state this instance currently shows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_state: Option<String>,
    /// Group membership.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

impl SceneObject {
    /// Object at the origin with unit scale.
    pub fn new(id: impl Into<String>, target: ObjectTarget) -> Self {
        Self {
            id: id.into(),
            target,
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            z: 0,
            parent_id: None,
            anchor: None,
            mask: None,
            visible: true,
            locked: false,
            active_state: None,
            group_id: None,
        }
    }

    /// Builder: local transform.
    pub fn with_transform(mut self, local: Transform) -> Self {
        self.set_local(local);
        self
    }

    /// Builder: parent id.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Local transform as stored.
    pub fn local(&self) -> Transform {
        Transform {
            x: self.x,
            y: self.y,
            scale: self.scale,
            rotation: self.rotation,
        }
    }

    pub(crate) fn set_local(&mut self, local: Transform) {
        self.x = local.x;
        self.y = local.y;
        self.scale = local.scale;
        self.rotation = local.rotation;
    }

    /// Component id, when this object instantiates a component.
    pub fn component_id(&self) -> Option<&str> {
        match &self.target {
            ObjectTarget::Component(id) => Some(id),
            ObjectTarget::Asset(_) => None,
        }
    }

    pub(crate) fn validate(&self) -> VibeResult<()> {
        if self.id.trim().is_empty() {
            return Err(VibeError::validation("object id must be non-empty"));
        }
        let finite = [self.x, self.y, self.scale, self.rotation]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(VibeError::validation(format!(
                "object '{}' has a non-finite transform",
                self.id
            )));
        }
        if self.parent_id.as_deref() == Some(self.id.as_str()) {
            return Err(VibeError::cycle(&self.id, &self.id));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Ordered owner of scene objects.
pub struct SceneLayer {
    /// Unique layer id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    /// Hidden layers are skipped by frame evaluation.
    pub visible: bool,
    /// Ids of the objects owned by this layer.
    #[serde(default)]
    pub objects: Vec<String>,
}

impl SceneLayer {
    /// Empty visible layer.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visible: true,
            objects: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Selection group. Purely organizational; it does not affect transforms.
pub struct Group {
    /// Unique group id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Member object ids.
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
/// Vector primitive. Path data is carried opaquely.
pub enum Primitive {
    /// SVG path data.
    Path {
        /// Path `d` attribute.
        d: String,
    },
    /// Axis-aligned rectangle.
    Rect {
        /// Left.
        x: f64,
        /// Top.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
    /// Circle.
    Circle {
        /// Centre x.
        cx: f64,
        /// Centre y.
        cy: f64,
        /// Radius.
        r: f64,
    },
    /// Ellipse.
    Ellipse {
        /// Centre x.
        cx: f64,
        /// Centre y.
        cy: f64,
        /// Horizontal radius.
        rx: f64,
        /// Vertical radius.
        ry: f64,
    },
    /// Closed polygon.
    Polygon {
        /// Vertices.
        points: Vec<[f64; 2]>,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A painted primitive.
pub struct Drawable {
    /// Geometry.
    pub primitive: Primitive,
    /// Fill paint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Stroke paint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    /// Stroke width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
/// Node of an asset's vector tree.
pub enum AssetNode {
    /// Nested nodes.
    Group {
        /// Children in paint order.
        #[serde(default)]
        children: Vec<AssetNode>,
    },
    /// Painted primitive.
    Shape(Drawable),
    /// Text run.
    Text {
        /// Text content.
        text: String,
        /// Fill paint.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Vector asset from the library.
pub struct Asset {
    /// Unique asset id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Intrinsic width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Intrinsic height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Vector tree.
    #[serde(default)]
    pub nodes: Vec<AssetNode>,
}

impl Asset {
    /// First drawable primitive in depth-first paint order.
    pub fn first_drawable(&self) -> Option<&Drawable> {
        fn walk(nodes: &[AssetNode]) -> Option<&Drawable> {
            nodes.iter().find_map(|n| match n {
                AssetNode::Shape(d) => Some(d),
                AssetNode::Group { children } => walk(children),
                AssetNode::Text { .. } => None,
            })
        }
        walk(&self.nodes)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Nested child of a component.
pub enum ChildRef {
    /// Nested component id.
    Component(String),
    /// Nested asset id.
    Asset(String),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Filter forwarded untouched to the rendering sink.
pub struct FilterSpec {
    /// Filter kind, e.g. `blur` or `drop-shadow`.
    pub kind: String,
    /// Kind-specific parameters.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", from = "ComponentWire")]
/// Reusable wrapper around a base asset.
///
/// Scene objects reference components by id; edits here are seen by every
/// instance.
pub struct Component {
    /// Unique component id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Asset drawn for this component.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_asset_id: Option<String>,
    /// Ordered vibe stack.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vibe_stack: Vec<VibeConfig>,
    /// Nested components and assets.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChildRef>,
    /// Filters for the rendering sink.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterSpec>,
    /// Interaction bindings.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<ComponentEvent>,
    /// Interactive modes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_machine: Option<StateMachine>,
}

/// On-disk component shape, which may still carry a single `vibe`.
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComponentWire {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    base_asset_id: Option<String>,
    #[serde(default)]
    vibe: Option<VibeConfig>,
    #[serde(default)]
    vibe_stack: Option<Vec<VibeConfig>>,
    #[serde(default)]
    children: Vec<ChildRef>,
    #[serde(default)]
    filters: Vec<FilterSpec>,
    #[serde(default)]
    events: Vec<ComponentEvent>,
    #[serde(default)]
    state_machine: Option<StateMachine>,
}

impl From<ComponentWire> for Component {
    fn from(w: ComponentWire) -> Self {
        Self {
            vibe_stack: promote_vibe(w.vibe, w.vibe_stack),
            id: w.id,
            name: w.name,
            base_asset_id: w.base_asset_id,
            children: w.children,
            filters: w.filters,
            events: w.events,
            state_machine: w.state_machine,
        }
    }
}

/// Merge the legacy single vibe into stack form. A non-empty stack wins.
pub fn promote_vibe(vibe: Option<VibeConfig>, stack: Option<Vec<VibeConfig>>) -> Vec<VibeConfig> {
    match (stack, vibe) {
        (Some(stack), _) if !stack.is_empty() => stack,
        (_, Some(v)) => vec![v],
        (stack, None) => stack.unwrap_or_default(),
    }
}

impl Component {
    /// Component over `base_asset_id` with no vibes.
    pub fn new(id: impl Into<String>, base_asset_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            base_asset_id: Some(base_asset_id.into()),
            ..Self::default()
        }
    }

    /// Builder: vibe stack.
    pub fn with_vibes(mut self, stack: Vec<VibeConfig>) -> Self {
        self.vibe_stack = stack;
        self
    }

    /// Vibe stack shown in `state`, falling back to the component stack.
    pub fn stack_for_state(&self, state: Option<&str>) -> &[VibeConfig] {
        let override_stack = state.and_then(|name| {
            let sm = self.state_machine.as_ref()?;
            sm.state_by_name(name)?.vibe_stack.as_deref()
        });
        override_stack.unwrap_or(&self.vibe_stack)
    }

    pub(crate) fn validate(&self) -> VibeResult<()> {
        if self.id.trim().is_empty() {
            return Err(VibeError::validation("component id must be non-empty"));
        }
        for vibe in &self.vibe_stack {
            vibe.validate()?;
        }
        for event in &self.events {
            event.validate()?;
        }
        if let Some(sm) = &self.state_machine {
            sm.validate().map_err(|e| match e {
                VibeError::Validation(msg) => {
                    VibeError::validation(format!("component '{}': {msg}", self.id))
                }
                other => other,
            })?;
        }
        for f in &self.filters {
            if f.kind.trim().is_empty() {
                return Err(VibeError::validation(format!(
                    "component '{}' has a filter with an empty kind",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
