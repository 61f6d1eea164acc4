use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use crate::{
    animation::keyframes::AnimationTrack,
    foundation::{
        core::Canvas,
        error::{VibeError, VibeResult},
    },
    scene::{
        model::{Asset, ChildRef, Component, Group, MaskRef, ObjectTarget, SceneLayer, SceneObject},
        transform::Transform,
    },
    vibe::model::VibeConfig,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Arena of layers, objects and library entries addressed by stable ids.
///
/// Every successful mutation bumps `generation`. Failed mutations leave the
/// graph untouched.
pub struct SceneGraph {
    /// Mutation counter.
    #[serde(default)]
    pub generation: u64,
    /// Root container.
    pub canvas: Canvas,
    /// Layers in paint order.
    #[serde(default)]
    pub layers: Vec<SceneLayer>,
    /// Objects by id.
    #[serde(default)]
    pub objects: BTreeMap<String, SceneObject>,
    /// Groups by id.
    #[serde(default)]
    pub groups: BTreeMap<String, Group>,
    /// Asset library.
    #[serde(default)]
    pub assets: BTreeMap<String, Asset>,
    /// Component library.
    #[serde(default)]
    pub components: BTreeMap<String, Component>,
    /// Keyframe animation bound to objects.
    #[serde(default)]
    pub timeline: Vec<AnimationTrack>,
}

impl SceneGraph {
    /// Empty graph over `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            generation: 0,
            canvas,
            layers: Vec::new(),
            objects: BTreeMap::new(),
            groups: BTreeMap::new(),
            assets: BTreeMap::new(),
            components: BTreeMap::new(),
            timeline: Vec::new(),
        }
    }

    /// Parse and validate a JSON scene.
    pub fn from_json_str(s: &str) -> VibeResult<Self> {
        let graph: Self = serde_json::from_str(s)?;
        graph.validate()?;
        Ok(graph)
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> VibeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Object by id.
    pub fn object(&self, id: &str) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Layer by id.
    pub fn layer(&self, id: &str) -> Option<&SceneLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Layer owning `object_id`.
    pub fn layer_of(&self, object_id: &str) -> Option<&SceneLayer> {
        self.layers
            .iter()
            .find(|l| l.objects.iter().any(|o| o == object_id))
    }

    /// Component instantiated by `object`.
    pub fn component_of(&self, object: &SceneObject) -> Option<&Component> {
        self.components.get(object.component_id()?)
    }

    /// Asset drawn for `target`; components resolve through their base asset.
    pub fn asset_for(&self, target: &ObjectTarget) -> Option<&Asset> {
        match target {
            ObjectTarget::Asset(id) => self.assets.get(id),
            ObjectTarget::Component(id) => {
                let base = self.components.get(id)?.base_asset_id.as_deref()?;
                self.assets.get(base)
            }
        }
    }

    /// Direct children of `id`.
    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a SceneObject> + 'a {
        self.objects
            .values()
            .filter(move |o| o.parent_id.as_deref() == Some(id))
    }

    /// Whether `ancestor` appears on the parent chain of `descendant`.
    pub fn is_ancestor(&self, ancestor: &str, descendant: &str) -> bool {
        let mut cur = self.objects.get(descendant).and_then(|o| o.parent_id.as_deref());
        let mut hops = 0usize;
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            hops += 1;
            if hops > self.objects.len() {
                return false;
            }
            cur = self.objects.get(id).and_then(|o| o.parent_id.as_deref());
        }
        false
    }

    fn bump(&mut self) {
        self.generation += 1;
    }

    fn object_mut(&mut self, id: &str) -> VibeResult<&mut SceneObject> {
        self.objects
            .get_mut(id)
            .ok_or_else(|| VibeError::not_found(format!("object '{id}'")))
    }

    /// Append an empty layer.
    pub fn add_layer(&mut self, id: impl Into<String>, name: impl Into<String>) -> VibeResult<()> {
        let layer = SceneLayer::new(id, name);
        if self.layer(&layer.id).is_some() {
            return Err(VibeError::validation(format!(
                "layer '{}' already exists",
                layer.id
            )));
        }
        self.layers.push(layer);
        self.bump();
        Ok(())
    }

    /// Insert `object` at the top of `layer_id`.
    pub fn insert_object(&mut self, layer_id: &str, object: SceneObject) -> VibeResult<()> {
        object.validate()?;
        if self.objects.contains_key(&object.id) {
            return Err(VibeError::validation(format!(
                "object '{}' already exists",
                object.id
            )));
        }
        if let Some(pid) = &object.parent_id
            && !self.objects.contains_key(pid)
        {
            return Err(VibeError::not_found(format!("parent object '{pid}'")));
        }
        let layer = self
            .layers
            .iter_mut()
            .find(|l| l.id == layer_id)
            .ok_or_else(|| VibeError::not_found(format!("layer '{layer_id}'")))?;
        layer.objects.push(object.id.clone());
        if let Some(gid) = &object.group_id
            && let Some(group) = self.groups.get_mut(gid)
        {
            group.members.push(object.id.clone());
        }
        self.objects.insert(object.id.clone(), object);
        self.bump();
        Ok(())
    }

    /// Remove an object and every reference to it.
    ///
    /// Children are detached (they keep their local transform), the object
    /// leaves its group, and masks sourced from it are cleared.
    pub fn remove_object(&mut self, id: &str) -> VibeResult<SceneObject> {
        let removed = self
            .objects
            .remove(id)
            .ok_or_else(|| VibeError::not_found(format!("object '{id}'")))?;

        for layer in &mut self.layers {
            layer.objects.retain(|o| o != id);
        }
        for group in self.groups.values_mut() {
            group.members.retain(|m| m != id);
        }
        for obj in self.objects.values_mut() {
            if obj.parent_id.as_deref() == Some(id) {
                obj.parent_id = None;
            }
            if obj.mask.as_ref().is_some_and(|m| m.object_id == id) {
                obj.mask = None;
            }
        }
        self.timeline.retain(|t| t.object_id != id);
        self.bump();
        Ok(removed)
    }

    /// Reparent `child` under `parent`, or detach it with `None`.
    ///
    /// Rejects self-parenting and parenting under a descendant with
    /// [`VibeError::Cycle`] before anything is changed.
    pub fn set_parent(&mut self, child: &str, parent: Option<&str>) -> VibeResult<()> {
        if !self.objects.contains_key(child) {
            return Err(VibeError::not_found(format!("object '{child}'")));
        }
        if let Some(p) = parent {
            if !self.objects.contains_key(p) {
                return Err(VibeError::not_found(format!("parent object '{p}'")));
            }
            if p == child || self.is_ancestor(child, p) {
                return Err(VibeError::cycle(child, p));
            }
        }
        self.object_mut(child)?.parent_id = parent.map(str::to_owned);
        self.bump();
        Ok(())
    }

    /// Replace the local transform of an unlocked object.
    pub fn set_transform(&mut self, id: &str, local: Transform) -> VibeResult<()> {
        let finite = [local.x, local.y, local.scale, local.rotation]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(VibeError::validation("transform values must be finite"));
        }
        let obj = self.object_mut(id)?;
        if obj.locked {
            return Err(VibeError::locked(format!("object '{id}'")));
        }
        obj.set_local(local);
        self.bump();
        Ok(())
    }

    /// Show or hide an object.
    pub fn set_visible(&mut self, id: &str, visible: bool) -> VibeResult<()> {
        self.object_mut(id)?.visible = visible;
        self.bump();
        Ok(())
    }

    /// Lock or unlock an object's transform.
    pub fn set_locked(&mut self, id: &str, locked: bool) -> VibeResult<()> {
        self.object_mut(id)?.locked = locked;
        self.bump();
        Ok(())
    }

    /// Set the state name an object shows.
    pub fn set_active_state(&mut self, id: &str, state: Option<String>) -> VibeResult<()> {
        self.object_mut(id)?.active_state = state;
        self.bump();
        Ok(())
    }

    pub(crate) fn set_mask(&mut self, id: &str, mask: Option<MaskRef>) -> VibeResult<()> {
        self.object_mut(id)?.mask = mask;
        self.bump();
        Ok(())
    }

    /// Create a group from `members`, moving them out of any previous group.
    pub fn group_objects(
        &mut self,
        group_id: impl Into<String>,
        name: impl Into<String>,
        members: &[&str],
    ) -> VibeResult<()> {
        let group_id = group_id.into();
        if self.groups.contains_key(&group_id) {
            return Err(VibeError::validation(format!(
                "group '{group_id}' already exists"
            )));
        }
        if members.is_empty() {
            return Err(VibeError::validation("a group needs at least one member"));
        }
        if let Some(missing) = members.iter().find(|m| !self.objects.contains_key(**m)) {
            return Err(VibeError::not_found(format!("object '{missing}'")));
        }

        let moved: BTreeSet<&str> = members.iter().copied().collect();
        for group in self.groups.values_mut() {
            group.members.retain(|m| !moved.contains(m.as_str()));
        }
        for m in &moved {
            if let Some(obj) = self.objects.get_mut(*m) {
                obj.group_id = Some(group_id.clone());
            }
        }
        self.groups.insert(
            group_id.clone(),
            Group {
                id: group_id,
                name: name.into(),
                members: moved.into_iter().map(str::to_owned).collect(),
            },
        );
        self.bump();
        Ok(())
    }

    /// Dissolve a group; members stay in place.
    pub fn ungroup(&mut self, group_id: &str) -> VibeResult<Group> {
        let group = self
            .groups
            .remove(group_id)
            .ok_or_else(|| VibeError::not_found(format!("group '{group_id}'")))?;
        for m in &group.members {
            if let Some(obj) = self.objects.get_mut(m)
                && obj.group_id.as_deref() == Some(group_id)
            {
                obj.group_id = None;
            }
        }
        self.bump();
        Ok(group)
    }

    /// Insert or replace an asset.
    pub fn upsert_asset(&mut self, asset: Asset) -> VibeResult<()> {
        if asset.id.trim().is_empty() {
            return Err(VibeError::validation("asset id must be non-empty"));
        }
        self.assets.insert(asset.id.clone(), asset);
        self.bump();
        Ok(())
    }

    /// Insert or replace a component, rejecting nesting cycles.
    pub fn upsert_component(&mut self, component: Component) -> VibeResult<()> {
        component.validate()?;
        if let Some(at) = self.nesting_cycle(Some(&component)) {
            return Err(VibeError::cycle(&component.id, at));
        }
        self.components.insert(component.id.clone(), component);
        self.bump();
        Ok(())
    }

    /// Replace a component's vibe stack. Every instance sees the change.
    pub fn set_vibe_stack(&mut self, component_id: &str, stack: Vec<VibeConfig>) -> VibeResult<()> {
        for vibe in &stack {
            vibe.validate()?;
        }
        let component = self
            .components
            .get_mut(component_id)
            .ok_or_else(|| VibeError::not_found(format!("component '{component_id}'")))?;
        component.vibe_stack = stack;
        self.bump();
        Ok(())
    }

    /// First component reached twice while walking nested children, with
    /// `pending` standing in for the stored component of the same id.
    fn nesting_cycle(&self, pending: Option<&Component>) -> Option<String> {
        fn lookup<'a>(
            graph: &'a SceneGraph,
            pending: Option<&'a Component>,
            id: &str,
        ) -> Option<&'a Component> {
            match pending {
                Some(c) if c.id == id => Some(c),
                _ => graph.components.get(id),
            }
        }

        fn visit<'a>(
            graph: &'a SceneGraph,
            pending: Option<&'a Component>,
            id: &'a str,
            path: &mut Vec<&'a str>,
            done: &mut BTreeSet<&'a str>,
        ) -> Option<String> {
            if path.contains(&id) {
                return Some(id.to_owned());
            }
            if done.contains(id) {
                return None;
            }
            let component = lookup(graph, pending, id)?;
            path.push(id);
            for child in &component.children {
                if let ChildRef::Component(cid) = child
                    && let Some(hit) = visit(graph, pending, cid, path, done)
                {
                    return Some(hit);
                }
            }
            path.pop();
            done.insert(id);
            None
        }

        let mut done = BTreeSet::new();
        let roots = self
            .components
            .keys()
            .map(String::as_str)
            .chain(pending.map(|c| c.id.as_str()));
        for root in roots {
            let mut path = Vec::new();
            if let Some(hit) = visit(self, pending, root, &mut path, &mut done) {
                return Some(hit);
            }
        }
        None
    }

    /// Check structural invariants.
    ///
    /// Dangling parent, mask and target references are allowed; evaluation
    /// absorbs them.
    pub fn validate(&self) -> VibeResult<()> {
        self.canvas.validate()?;

        let mut layer_ids = BTreeSet::new();
        let mut owner: BTreeMap<&str, &str> = BTreeMap::new();
        for layer in &self.layers {
            if !layer_ids.insert(layer.id.as_str()) {
                return Err(VibeError::validation(format!(
                    "duplicate layer id '{}'",
                    layer.id
                )));
            }
            for oid in &layer.objects {
                if !self.objects.contains_key(oid) {
                    return Err(VibeError::validation(format!(
                        "layer '{}' lists missing object '{oid}'",
                        layer.id
                    )));
                }
                if let Some(prev) = owner.insert(oid, &layer.id) {
                    return Err(VibeError::validation(format!(
                        "object '{oid}' is owned by both '{prev}' and '{}'",
                        layer.id
                    )));
                }
            }
        }

        for (key, obj) in &self.objects {
            if key != &obj.id {
                return Err(VibeError::validation(format!(
                    "object key '{key}' does not match id '{}'",
                    obj.id
                )));
            }
            obj.validate()?;
            if !owner.contains_key(key.as_str()) {
                return Err(VibeError::validation(format!(
                    "object '{key}' is not owned by any layer"
                )));
            }
            if let Some(pid) = &obj.parent_id
                && self.is_ancestor(key, pid)
            {
                return Err(VibeError::cycle(key, pid));
            }
        }

        for (key, group) in &self.groups {
            if key != &group.id {
                return Err(VibeError::validation(format!(
                    "group key '{key}' does not match id '{}'",
                    group.id
                )));
            }
        }
        for (key, asset) in &self.assets {
            if key != &asset.id {
                return Err(VibeError::validation(format!(
                    "asset key '{key}' does not match id '{}'",
                    asset.id
                )));
            }
        }
        for (key, component) in &self.components {
            if key != &component.id {
                return Err(VibeError::validation(format!(
                    "component key '{key}' does not match id '{}'",
                    component.id
                )));
            }
            component.validate()?;
        }
        if let Some(at) = self.nesting_cycle(None) {
            return Err(VibeError::validation(format!(
                "component nesting cycle through '{at}'"
            )));
        }

        for track in &self.timeline {
            track.validate()?;
        }
        Ok(())
    }
}

/// Snapshot/next discipline for frame evaluation.
///
/// Frames read an immutable [`SceneGraph`] snapshot; edits go to a pending
/// copy that replaces the snapshot on [`SceneStore::commit`].
#[derive(Clone, Debug)]
pub struct SceneStore {
    current: Arc<SceneGraph>,
    next: Option<SceneGraph>,
}

impl SceneStore {
    /// Store publishing `graph` as the first snapshot.
    pub fn new(graph: SceneGraph) -> Self {
        Self {
            current: Arc::new(graph),
            next: None,
        }
    }

    /// Graph to evaluate this frame.
    pub fn snapshot(&self) -> Arc<SceneGraph> {
        Arc::clone(&self.current)
    }

    /// Pending graph, if any edits were made since the last commit.
    pub fn pending(&self) -> Option<&SceneGraph> {
        self.next.as_ref()
    }

    /// Apply `f` to the pending graph, creating it from the snapshot on first use.
    pub fn edit<T>(&mut self, f: impl FnOnce(&mut SceneGraph) -> VibeResult<T>) -> VibeResult<T> {
        let current = &self.current;
        let next = self.next.get_or_insert_with(|| SceneGraph::clone(current));
        f(next)
    }

    /// Publish pending edits. Returns whether a new snapshot was published.
    pub fn commit(&mut self) -> bool {
        match self.next.take() {
            Some(next) => {
                self.current = Arc::new(next);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
