use serde_json::Value;

use crate::{
    foundation::error::{VibeError, VibeResult},
    interaction::{
        condition::Condition,
        machine::{State, StateAction, StateMachine},
    },
};

/// Executes a [`StateMachine`] against discrete events.
///
/// When several transitions leave the current state for the same event, the
/// first one in list order whose condition holds is taken.
#[derive(Clone, Debug)]
pub struct StateMachineRuntime {
    machine: StateMachine,
    conditions: Vec<Option<Condition>>,
    initial: usize,
    current: usize,
    last_actions: Vec<StateAction>,
}

impl StateMachineRuntime {
    /// Validate `machine`, compile its conditions and enter the initial state.
    pub fn new(machine: &StateMachine) -> VibeResult<Self> {
        machine.validate()?;
        let initial_id = machine
            .initial_state
            .as_deref()
            .ok_or_else(|| VibeError::validation("state machine has no states"))?;
        let initial = machine
            .states
            .iter()
            .position(|s| s.id == initial_id)
            .ok_or_else(|| VibeError::not_found(format!("state '{initial_id}'")))?;
        let conditions = machine
            .transitions
            .iter()
            .map(|t| t.condition.as_deref().map(Condition::parse).transpose())
            .collect::<VibeResult<Vec<_>>>()?;

        Ok(Self {
            machine: machine.clone(),
            conditions,
            initial,
            current: initial,
            last_actions: Vec::new(),
        })
    }

    /// Machine being executed.
    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    /// Current state.
    pub fn current(&self) -> &State {
        &self.machine.states[self.current]
    }

    /// Actions of the state entered by the last successful transition.
    pub fn last_actions(&self) -> &[StateAction] {
        &self.last_actions
    }

    /// Apply the first transition from the current state matching `event`
    /// whose condition holds for `context`. Returns whether one was taken.
    pub fn fire(&mut self, event: &str, context: Option<&Value>) -> bool {
        let empty = Value::Null;
        let ctx = context.unwrap_or(&empty);
        let from = &self.machine.states[self.current].id;

        let hit = self
            .machine
            .transitions
            .iter()
            .zip(&self.conditions)
            .find(|&(t, cond)| {
                t.from == *from
                    && t.event.as_deref().is_none_or(|e| e == event)
                    && cond.as_ref().is_none_or(|c| c.evaluate(ctx))
            })
            .map(|(t, _)| t.to.clone());

        let Some(to) = hit else {
            return false;
        };
        match self.machine.states.iter().position(|s| s.id == to) {
            Some(idx) => {
                self.enter_index(idx);
                true
            }
            None => false,
        }
    }

    /// Jump straight to the state with this name (or id), bypassing
    /// transitions. Returns whether such a state exists.
    pub fn enter(&mut self, name: &str) -> bool {
        let idx = self
            .machine
            .states
            .iter()
            .position(|s| s.name == name)
            .or_else(|| self.machine.states.iter().position(|s| s.id == name));
        match idx {
            Some(idx) => {
                self.enter_index(idx);
                true
            }
            None => false,
        }
    }

    /// Return to the initial state and forget the last actions.
    pub fn reset(&mut self) {
        self.current = self.initial;
        self.last_actions.clear();
    }

    fn enter_index(&mut self, idx: usize) {
        self.current = idx;
        self.last_actions = self.machine.states[idx].actions.clone();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/runtime.rs"]
mod tests;
