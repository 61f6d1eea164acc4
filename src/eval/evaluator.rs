use std::{collections::BTreeMap, sync::Arc};

use crate::{
    animation::keyframes::KeyValue,
    audio::levels::AudioLevels,
    eval::{config::EngineConfig, ticker::FrameTick},
    foundation::{
        core::{Affine, FrameIndex},
        error::{VibeError, VibeResult},
        math::{Fnv1a64, Rng64, stable_hash64},
    },
    scene::{
        anchor::AnchorPositioner,
        graph::SceneGraph,
        mask::{BoundMask, MaskBinder},
        model::{FilterSpec, SceneObject},
        transform::{GlobalTransform, Transform, TransformResolver},
    },
    vibe::{
        color::{ColorModulation, ColorModulator},
        evaluator::{VibeEvaluator, VibeState},
        stack::{VibeStackComposer, stack_spin_degrees},
    },
};

type Samples = BTreeMap<String, KeyValue>;

#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// Every visible object of one frame, in paint order.
pub struct EvaluatedFrame {
    /// Frame index, when evaluated from a [`FrameTick`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<FrameIndex>,
    /// Evaluation time in seconds.
    pub time_s: f64,
    /// Generation of the evaluated snapshot.
    pub generation: u64,
    /// Evaluated objects sorted by layer order, z, then id.
    pub objects: Vec<EvaluatedObject>,
}

impl EvaluatedFrame {
    /// Evaluated object by id.
    pub fn object(&self, id: &str) -> Option<&EvaluatedObject> {
        self.objects.iter().find(|o| o.object_id == id)
    }
}

#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// Visual state of one object for the rendering sink.
pub struct EvaluatedObject {
    /// Object id.
    pub object_id: String,
    /// Owning layer.
    pub layer_id: String,
    /// Stacking order within the layer.
    pub z: i32,
    /// Hierarchy, anchor and spin resolved; vibes not applied.
    pub global_transform: GlobalTransform,
    /// `global_transform` with the vibe scale and translation folded in.
    pub affine: Affine,
    /// Composed vibe stack.
    pub vibe_state: VibeState,
    /// Hue filter placement.
    pub color: ColorModulation,
    /// Mask binding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<BoundMask>,
    /// Final opacity in `[0, 1]`.
    pub opacity: f64,
    /// Component filters passed through.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterSpec>,
    /// Active component state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_state: Option<String>,
}

/// Per-frame evaluator from a scene snapshot to renderable object state.
///
/// With a seed every frame is a pure function of the graph and time. Audio
/// levels are read without synchronization and may lag by one analysis tick.
pub struct FrameEvaluator {
    config: EngineConfig,
    audio: Option<Arc<dyn AudioLevels>>,
    entropy: Rng64,
}

impl FrameEvaluator {
    /// Evaluator reading optional shared audio levels.
    pub fn new(config: EngineConfig, audio: Option<Arc<dyn AudioLevels>>) -> Self {
        Self {
            config,
            audio,
            entropy: Rng64::from_entropy(),
        }
    }

    /// Engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[tracing::instrument(skip(self, graph, tick), fields(frame = tick.frame.0))]
    /// Evaluate the frame produced by a [`crate::Ticker`].
    pub fn eval_tick(&mut self, graph: &SceneGraph, tick: FrameTick) -> VibeResult<EvaluatedFrame> {
        let mut out = self.eval_frame(graph, tick.time_s)?;
        out.frame = Some(tick.frame);
        Ok(out)
    }

    #[tracing::instrument(skip(self, graph), fields(generation = graph.generation))]
    /// Evaluate every visible object of `graph` at `time` seconds.
    pub fn eval_frame(&mut self, graph: &SceneGraph, time: f64) -> VibeResult<EvaluatedFrame> {
        if !time.is_finite() {
            return Err(VibeError::evaluation("frame time must be finite"));
        }

        let mut samples: BTreeMap<&str, Samples> = BTreeMap::new();
        for track in &graph.timeline {
            samples
                .entry(track.object_id.as_str())
                .or_default()
                .extend(track.sample(time));
        }

        let mut keyed: Vec<((usize, i32, String), EvaluatedObject)> = Vec::new();
        for (layer_index, layer) in graph.layers.iter().enumerate() {
            if !layer.visible {
                continue;
            }
            for oid in &layer.objects {
                let Some(obj) = graph.object(oid) else {
                    tracing::debug!(layer = %layer.id, object = %oid, "layer lists missing object");
                    continue;
                };
                if !obj.visible {
                    continue;
                }
                let node = self.eval_object(graph, obj, &layer.id, time, &samples);
                keyed.push(((layer_index, obj.z, obj.id.clone()), node));
            }
        }

        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(EvaluatedFrame {
            frame: None,
            time_s: time,
            generation: graph.generation,
            objects: keyed.into_iter().map(|(_, n)| n).collect(),
        })
    }

    fn eval_object(
        &mut self,
        graph: &SceneGraph,
        obj: &SceneObject,
        layer_id: &str,
        time: f64,
        samples: &BTreeMap<&str, Samples>,
    ) -> EvaluatedObject {
        let local_of = |o: &SceneObject| animated_local(o, samples.get(o.id.as_str()));

        let local = local_of(obj);
        let mut global = TransformResolver::resolve_with(obj, graph, local_of);
        if obj.anchor.is_some() {
            let pos = AnchorPositioner::position_xy(
                obj.anchor,
                local.x,
                local.y,
                Some(graph.canvas.width),
                Some(graph.canvas.height),
            );
            global.x = pos.x;
            global.y = pos.y;
        }

        let component = graph.component_of(obj);
        if component.is_none()
            && let Some(cid) = obj.component_id()
        {
            tracing::debug!(object = %obj.id, component = cid, "broken component reference");
        }
        let stack = component
            .map(|c| c.stack_for_state(obj.active_state.as_deref()))
            .unwrap_or_default();

        let rng = self.object_rng(&obj.id, time);
        let audio = self.audio.as_deref();
        let mut composer = VibeStackComposer::new(VibeEvaluator::new(rng));
        let vibe_state = composer.compose(stack, time, audio);
        global.rotation += stack_spin_degrees(stack, time, audio);

        let base_opacity = samples
            .get(obj.id.as_str())
            .and_then(|s| s.get("opacity"))
            .and_then(KeyValue::as_number)
            .unwrap_or(1.0);

        let affine = Affine::translate(vibe_state.translate)
            * global.to_affine()
            * Affine::scale(vibe_state.scale);

        EvaluatedObject {
            object_id: obj.id.clone(),
            layer_id: layer_id.to_owned(),
            z: obj.z,
            global_transform: global,
            affine,
            color: ColorModulator::modulate(&vibe_state),
            mask: MaskBinder::resolve(graph, obj),
            opacity: (base_opacity * vibe_state.opacity).clamp(0.0, 1.0),
            vibe_state,
            filters: component.map(|c| c.filters.clone()).unwrap_or_default(),
            active_state: obj.active_state.clone(),
        }
    }

    fn object_rng(&mut self, object_id: &str, time: f64) -> Rng64 {
        match self.config.seed {
            Some(seed) => {
                let mut h = Fnv1a64::new(stable_hash64(seed, object_id));
                h.write_u64(time.to_bits());
                Rng64::new(h.finish())
            }
            None => Rng64::new(self.entropy.next_u64()),
        }
    }
}

fn animated_local(obj: &SceneObject, samples: Option<&Samples>) -> Transform {
    let mut t = obj.local();
    for (prop, value) in samples.into_iter().flatten() {
        let Some(v) = value.as_number() else {
            continue;
        };
        match prop.as_str() {
            "x" => t.x = v,
            "y" => t.y = v,
            "scale" => t.scale = v,
            "rotation" => t.rotation = v,
            _ => {}
        }
    }
    t
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
