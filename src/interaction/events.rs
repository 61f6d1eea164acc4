use std::collections::{BTreeMap, BTreeSet};

use serde_json::json;

use crate::{
    foundation::{
        core::Point,
        error::{VibeError, VibeResult},
    },
    interaction::{machine::StateAction, runtime::StateMachineRuntime},
    scene::{
        anchor::AnchorPositioner,
        graph::{SceneGraph, SceneStore},
        model::SceneObject,
        transform::TransformResolver,
    },
    vibe::model::VibeKind,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
/// What starts a component event.
pub enum EventTrigger {
    /// Pointer click on the object.
    OnClick,
    /// Pointer enters the object.
    OnHover,
    /// Elapsed timer scheduled by the embedder.
    OnTimer {
        /// Delay in milliseconds.
        #[serde(rename = "durationMs")]
        duration_ms: u64,
    },
    /// Pointer comes within `distance` of the object's position.
    OnProximity {
        /// Radius in scene units.
        distance: f64,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
/// What a component event does.
pub enum EventAction {
    /// Start a one-shot vibe.
    PlayVibe {
        /// Vibe kind.
        vibe: VibeKind,
    },
    /// Move the instance to a named state.
    SwitchState {
        /// State name.
        state: String,
    },
    /// Emit a named signal.
    EmitSignal {
        /// Signal name.
        signal: String,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Trigger/action binding on a component.
pub struct ComponentEvent {
    /// Trigger.
    pub trigger: EventTrigger,
    /// Action.
    pub action: EventAction,
}

impl ComponentEvent {
    /// Check trigger and action parameters.
    pub fn validate(&self) -> VibeResult<()> {
        match self.trigger {
            EventTrigger::OnTimer { duration_ms: 0 } => {
                return Err(VibeError::validation("onTimer durationMs must be > 0"));
            }
            EventTrigger::OnProximity { distance } if !distance.is_finite() || distance < 0.0 => {
                return Err(VibeError::validation(
                    "onProximity distance must be finite and >= 0",
                ));
            }
            _ => {}
        }
        match &self.action {
            EventAction::SwitchState { state: name } | EventAction::EmitSignal { signal: name }
                if name.trim().is_empty() =>
            {
                Err(VibeError::validation("event action name must be non-empty"))
            }
            _ => Ok(()),
        }
    }

    fn event_name(&self) -> &'static str {
        match self.trigger {
            EventTrigger::OnClick => "click",
            EventTrigger::OnHover => "hover",
            EventTrigger::OnTimer { .. } => "timer",
            EventTrigger::OnProximity { .. } => "proximity",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Raw input delivered by the embedder.
pub enum InteractionInput {
    /// Click on an object (hit testing belongs to the rendering sink).
    Click {
        /// Clicked object.
        object_id: String,
    },
    /// Pointer entered an object.
    Hover {
        /// Hovered object.
        object_id: String,
    },
    /// A timer from [`InteractionHost::timer_schedules`] fired.
    TimerElapsed {
        /// Object owning the timer.
        object_id: String,
        /// Index into the component's events.
        event_index: usize,
    },
    /// Pointer position in scene coordinates.
    PointerMoved {
        /// X.
        x: f64,
        /// Y.
        y: f64,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
/// Result of dispatching an input.
pub enum Outcome {
    /// The instance now shows `state`.
    StateChanged {
        /// Object id.
        #[serde(rename = "objectId")]
        object_id: String,
        /// Active state name.
        state: String,
    },
    /// A vibe should be played on the object.
    PlayVibe {
        /// Object id.
        #[serde(rename = "objectId")]
        object_id: String,
        /// Vibe kind.
        vibe: VibeKind,
    },
    /// A signal was emitted.
    Signal {
        /// Object id.
        #[serde(rename = "objectId")]
        object_id: String,
        /// Signal name.
        signal: String,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// Timer the embedder must schedule and clear on removal.
pub struct TimerSchedule {
    /// Object owning the timer.
    pub object_id: String,
    /// Index into the component's events.
    pub event_index: usize,
    /// Delay in milliseconds.
    pub duration_ms: u64,
}

/// Runtime of one instance plus what it was built from.
#[derive(Debug)]
struct HostedRuntime {
    component_id: String,
    seen_state: Option<String>,
    runtime: StateMachineRuntime,
}

/// Routes inputs to component events and per-instance state machines.
///
/// Runtimes are created on first use for each object whose component has a
/// state machine, and rebuilt when the object's component or that
/// component's machine changes. An `active_state` written into the graph by
/// anyone else is re-entered before the next transition. The host owns no
/// timers.
#[derive(Debug, Default)]
pub struct InteractionHost {
    runtimes: BTreeMap<String, HostedRuntime>,
    near: BTreeSet<(String, usize)>,
}

impl InteractionHost {
    /// Host with no runtimes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime of `object_id`, if one has been created.
    pub fn runtime(&self, object_id: &str) -> Option<&StateMachineRuntime> {
        self.runtimes.get(object_id).map(|h| &h.runtime)
    }

    /// Drop every runtime and proximity memory.
    pub fn reset(&mut self) {
        self.runtimes.clear();
        self.near.clear();
    }

    /// Timers required by the visible instances of `graph`.
    pub fn timer_schedules(&self, graph: &SceneGraph) -> Vec<TimerSchedule> {
        let mut out = Vec::new();
        for obj in graph.objects.values().filter(|o| o.visible) {
            let Some(component) = graph.component_of(obj) else {
                continue;
            };
            for (event_index, ev) in component.events.iter().enumerate() {
                if let EventTrigger::OnTimer { duration_ms } = ev.trigger {
                    out.push(TimerSchedule {
                        object_id: obj.id.clone(),
                        event_index,
                        duration_ms,
                    });
                }
            }
        }
        out
    }

    /// Route one input through matching component events.
    pub fn dispatch(&mut self, graph: &SceneGraph, input: &InteractionInput) -> Vec<Outcome> {
        let mut hits: Vec<(&SceneObject, usize)> = Vec::new();
        match input {
            InteractionInput::Click { object_id } | InteractionInput::Hover { object_id } => {
                let want_click = matches!(input, InteractionInput::Click { .. });
                if let Some(obj) = graph.object(object_id)
                    && let Some(component) = graph.component_of(obj)
                {
                    for (i, ev) in component.events.iter().enumerate() {
                        let matched = match ev.trigger {
                            EventTrigger::OnClick => want_click,
                            EventTrigger::OnHover => !want_click,
                            _ => false,
                        };
                        if matched {
                            hits.push((obj, i));
                        }
                    }
                }
            }
            InteractionInput::TimerElapsed {
                object_id,
                event_index,
            } => {
                if let Some(obj) = graph.object(object_id)
                    && let Some(component) = graph.component_of(obj)
                    && let Some(ev) = component.events.get(*event_index)
                    && matches!(ev.trigger, EventTrigger::OnTimer { .. })
                {
                    hits.push((obj, *event_index));
                }
            }
            InteractionInput::PointerMoved { x, y } => {
                for obj in graph.objects.values().filter(|o| o.visible) {
                    let Some(component) = graph.component_of(obj) else {
                        continue;
                    };
                    for (i, ev) in component.events.iter().enumerate() {
                        let EventTrigger::OnProximity { distance } = ev.trigger else {
                            continue;
                        };
                        let pos = placed_position(graph, obj);
                        let inside = (pos.x - x).hypot(pos.y - y) <= distance;
                        let key = (obj.id.clone(), i);
                        // Fire on entering the radius only.
                        if inside {
                            if self.near.insert(key) {
                                hits.push((obj, i));
                            }
                        } else {
                            self.near.remove(&key);
                        }
                    }
                }
            }
        }

        let mut out = Vec::new();
        for (obj, i) in hits {
            let Some(ev) = graph.component_of(obj).and_then(|c| c.events.get(i)) else {
                continue;
            };
            self.run_action(graph, obj, ev, input, &mut out);
        }
        out
    }

    fn run_action(
        &mut self,
        graph: &SceneGraph,
        obj: &SceneObject,
        ev: &ComponentEvent,
        input: &InteractionInput,
        out: &mut Vec<Outcome>,
    ) {
        match &ev.action {
            EventAction::PlayVibe { vibe } => out.push(Outcome::PlayVibe {
                object_id: obj.id.clone(),
                vibe: *vibe,
            }),
            EventAction::EmitSignal { signal } => out.push(Outcome::Signal {
                object_id: obj.id.clone(),
                signal: signal.clone(),
            }),
            EventAction::SwitchState { state } => {
                let Some(runtime) = self.runtime_for(graph, obj) else {
                    out.push(Outcome::StateChanged {
                        object_id: obj.id.clone(),
                        state: state.clone(),
                    });
                    return;
                };
                let ctx = event_context(obj, ev, input);
                if !runtime.fire(state, Some(&ctx)) && !runtime.enter(state) {
                    tracing::debug!(object = %obj.id, state = %state, "no transition or state for switchState");
                    return;
                }
                out.push(Outcome::StateChanged {
                    object_id: obj.id.clone(),
                    state: runtime.current().name.clone(),
                });
                for action in runtime.last_actions() {
                    out.push(match action {
                        StateAction::PlayVibe { vibe } => Outcome::PlayVibe {
                            object_id: obj.id.clone(),
                            vibe: *vibe,
                        },
                        StateAction::EmitSignal { signal } => Outcome::Signal {
                            object_id: obj.id.clone(),
                            signal: signal.clone(),
                        },
                    });
                }
            }
        }
    }

    fn runtime_for(&mut self, graph: &SceneGraph, obj: &SceneObject) -> Option<&mut StateMachineRuntime> {
        let Some((component_id, machine)) = graph
            .component_of(obj)
            .and_then(|c| Some((c.id.as_str(), c.state_machine.as_ref()?)))
        else {
            self.runtimes.remove(&obj.id);
            return None;
        };

        let stale = self.runtimes.get(&obj.id).is_none_or(|h| {
            h.component_id != component_id || h.runtime.machine() != machine
        });
        if stale {
            let mut runtime = match StateMachineRuntime::new(machine) {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::debug!(object = %obj.id, error = %e, "state machine rejected");
                    self.runtimes.remove(&obj.id);
                    return None;
                }
            };
            if let Some(active) = &obj.active_state {
                runtime.enter(active);
            }
            self.runtimes.insert(
                obj.id.clone(),
                HostedRuntime {
                    component_id: component_id.to_owned(),
                    seen_state: obj.active_state.clone(),
                    runtime,
                },
            );
        }

        let hosted = self.runtimes.get_mut(&obj.id)?;
        if hosted.seen_state != obj.active_state {
            hosted.seen_state = obj.active_state.clone();
            match &obj.active_state {
                Some(active) if *active != hosted.runtime.current().name => {
                    hosted.runtime.enter(active);
                }
                Some(_) => {}
                None => hosted.runtime.reset(),
            }
        }
        Some(&mut hosted.runtime)
    }

    /// Write state changes into the store's pending graph.
    ///
    /// Outcomes for objects that no longer exist are skipped.
    pub fn apply(&self, outcomes: &[Outcome], store: &mut SceneStore) -> VibeResult<()> {
        for outcome in outcomes {
            let Outcome::StateChanged { object_id, state } = outcome else {
                continue;
            };
            store.edit(|next| match next.set_active_state(object_id, Some(state.clone())) {
                Err(VibeError::NotFound(_)) => Ok(()),
                other => other,
            })?;
        }
        Ok(())
    }
}

fn placed_position(graph: &SceneGraph, obj: &SceneObject) -> Point {
    if obj.anchor.is_some() {
        AnchorPositioner::position(obj, Some(graph.canvas.width), Some(graph.canvas.height))
    } else {
        TransformResolver::resolve(obj, graph).position()
    }
}

fn event_context(obj: &SceneObject, ev: &ComponentEvent, input: &InteractionInput) -> serde_json::Value {
    let mut ctx = json!({
        "event": ev.event_name(),
        "objectId": obj.id,
        "state": obj.active_state,
    });
    if let InteractionInput::PointerMoved { x, y } = input {
        ctx["pointer"] = json!({ "x": x, "y": y });
    }
    ctx
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/events.rs"]
mod tests;
