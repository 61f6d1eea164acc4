use std::collections::BTreeSet;

use crate::{
    foundation::error::{VibeError, VibeResult},
    interaction::condition::Condition,
    vibe::model::{VibeConfig, VibeKind},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
/// Side effect reported when a state is entered.
pub enum StateAction {
    /// Start a one-shot vibe.
    PlayVibe {
        /// Vibe kind to play.
        vibe: VibeKind,
    },
    /// Emit a named signal to the embedder.
    EmitSignal {
        /// Signal name.
        signal: String,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A named interactive mode.
pub struct State {
    /// Unique state id.
    pub id: String,
    /// Display name, also used as the object's active state.
    pub name: String,
    /// Actions reported on entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<StateAction>,
    /// Vibe stack shown while this state is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibe_stack: Option<Vec<VibeConfig>>,
}

impl State {
    /// State without actions or vibe override.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            actions: Vec::new(),
            vibe_stack: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Edge between two states.
pub struct Transition {
    /// Unique transition id.
    pub id: String,
    /// Source state id.
    pub from: String,
    /// Target state id.
    pub to: String,
    /// Event name; `None` matches any event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Guard over the event context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Transition {
    /// Unguarded transition fired by `event`.
    pub fn on(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        event: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            event: Some(event.into()),
            condition: None,
        }
    }

    /// Builder: guard condition.
    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Finite-state model of a component's interactive modes.
pub struct StateMachine {
    /// States in list order.
    #[serde(default)]
    pub states: Vec<State>,
    /// Transitions in priority order.
    #[serde(default)]
    pub transitions: Vec<Transition>,
    /// Entry state id; `None` only when there are no states.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<String>,
}

impl StateMachine {
    /// State by id.
    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    /// State by display name.
    pub fn state_by_name(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|s| s.name == name)
    }

    /// Append a state. The first state added becomes the initial state.
    pub fn add_state(&mut self, state: State) -> VibeResult<()> {
        if self.state(&state.id).is_some() {
            return Err(VibeError::validation(format!(
                "state '{}' already exists",
                state.id
            )));
        }
        for vibe in state.vibe_stack.iter().flatten() {
            vibe.validate()?;
        }
        if self.initial_state.is_none() {
            self.initial_state = Some(state.id.clone());
        }
        self.states.push(state);
        Ok(())
    }

    /// Remove a state and every transition touching it.
    ///
    /// Removing the initial state makes the first remaining state initial,
    /// or leaves no initial state when none remain.
    pub fn remove_state(&mut self, id: &str) -> VibeResult<State> {
        let idx = self
            .states
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| VibeError::not_found(format!("state '{id}'")))?;
        let removed = self.states.remove(idx);
        self.transitions.retain(|t| t.from != id && t.to != id);
        if self.initial_state.as_deref() == Some(id) {
            self.initial_state = self.states.first().map(|s| s.id.clone());
        }
        Ok(removed)
    }

    /// Append a transition after checking its endpoints and condition.
    pub fn add_transition(&mut self, transition: Transition) -> VibeResult<()> {
        if self.transitions.iter().any(|t| t.id == transition.id) {
            return Err(VibeError::validation(format!(
                "transition '{}' already exists",
                transition.id
            )));
        }
        self.check_transition(&transition)?;
        self.transitions.push(transition);
        Ok(())
    }

    /// Remove a transition by id.
    pub fn remove_transition(&mut self, id: &str) -> VibeResult<Transition> {
        let idx = self
            .transitions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| VibeError::not_found(format!("transition '{id}'")))?;
        Ok(self.transitions.remove(idx))
    }

    /// Change the entry state.
    pub fn set_initial(&mut self, id: &str) -> VibeResult<()> {
        if self.state(id).is_none() {
            return Err(VibeError::not_found(format!("state '{id}'")));
        }
        self.initial_state = Some(id.to_owned());
        Ok(())
    }

    fn check_transition(&self, t: &Transition) -> VibeResult<()> {
        for end in [&t.from, &t.to] {
            if self.state(end).is_none() {
                return Err(VibeError::validation(format!(
                    "transition '{}' references missing state '{end}'",
                    t.id
                )));
            }
        }
        if let Some(src) = &t.condition {
            Condition::parse(src)?;
        }
        Ok(())
    }

    /// Check ids, the initial state, transition endpoints and conditions.
    pub fn validate(&self) -> VibeResult<()> {
        let mut ids = BTreeSet::new();
        for s in &self.states {
            if !ids.insert(s.id.as_str()) {
                return Err(VibeError::validation(format!("duplicate state id '{}'", s.id)));
            }
            for vibe in s.vibe_stack.iter().flatten() {
                vibe.validate()?;
            }
        }
        match (&self.initial_state, self.states.is_empty()) {
            (None, true) => {}
            (None, false) => {
                return Err(VibeError::validation("state machine has no initial state"));
            }
            (Some(id), _) if self.state(id).is_none() => {
                return Err(VibeError::validation(format!(
                    "initial state '{id}' does not exist"
                )));
            }
            (Some(_), _) => {}
        }

        let mut tids = BTreeSet::new();
        for t in &self.transitions {
            if !tids.insert(t.id.as_str()) {
                return Err(VibeError::validation(format!(
                    "duplicate transition id '{}'",
                    t.id
                )));
            }
            self.check_transition(t)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/machine.rs"]
mod tests;
