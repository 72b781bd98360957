//! Workflow definitions and the input shapes they are built from.
//!
//! A [`Definition`] is the immutable template an instance runs against. It is
//! only ever produced from a [`DefinitionSpec`] that passed validation, and no
//! operation mutates it afterwards.

use super::action::Action;
use super::state::State;
use crate::store::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable template of states and the actions connecting them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub states: Vec<State>,
    pub actions: Vec<Action>,
    pub created_at: DateTime<Utc>,
}

impl Definition {
    /// Build a candidate definition from a normalized spec.
    ///
    /// The result has not been validated; callers run
    /// [`validate_definition`](crate::validation::validate_definition) before
    /// publishing it.
    pub fn from_spec(id: impl Into<String>, spec: DefinitionSpec, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: spec.name,
            description: spec.description.unwrap_or_default(),
            states: spec.states.into_iter().map(StateSpec::into_state).collect(),
            actions: spec.actions.into_iter().map(ActionSpec::into_action).collect(),
            created_at,
        }
    }

    /// Look up a state by id. Returns the first match if ids are duplicated.
    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    /// Look up an action by id. Returns the first match if ids are duplicated.
    pub fn action(&self, id: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// The unique initial state, or `None` unless exactly one state is initial.
    pub fn initial_state(&self) -> Option<&State> {
        let mut initials = self.states.iter().filter(|s| s.is_initial);
        match (initials.next(), initials.next()) {
            (Some(state), None) => Some(state),
            _ => None,
        }
    }

    pub fn final_states(&self) -> impl Iterator<Item = &State> {
        self.states.iter().filter(|s| s.is_final)
    }
}

impl Entity for Definition {
    fn id(&self) -> &str {
        &self.id
    }

    fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn default_enabled() -> bool {
    true
}

/// Request shape for creating a definition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionSpec {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub states: Vec<StateSpec>,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

/// Request shape for one state of a [`DefinitionSpec`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_initial: bool,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub description: String,
}

/// Request shape for one action of a [`DefinitionSpec`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSpec {
    pub id: String,
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub from_states: Vec<String>,
    pub to_state: String,
    #[serde(default)]
    pub description: String,
}

impl DefinitionSpec {
    /// Trim every text field.
    ///
    /// Source-state lists are also de-duplicated, keeping first occurrence, so
    /// they behave as sets.
    pub fn normalize(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.map(|d| d.trim().to_string()),
            states: self.states.into_iter().map(StateSpec::normalize).collect(),
            actions: self.actions.into_iter().map(ActionSpec::normalize).collect(),
        }
    }
}

impl StateSpec {
    fn normalize(self) -> Self {
        Self {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            ..self
        }
    }

    fn into_state(self) -> State {
        State {
            id: self.id,
            name: self.name,
            is_initial: self.is_initial,
            is_final: self.is_final,
            enabled: self.enabled,
            description: self.description,
        }
    }
}

impl ActionSpec {
    fn normalize(self) -> Self {
        let mut from_states: Vec<String> = Vec::with_capacity(self.from_states.len());
        for state in self.from_states {
            let state = state.trim().to_string();
            if !from_states.contains(&state) {
                from_states.push(state);
            }
        }

        Self {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            from_states,
            to_state: self.to_state.trim().to_string(),
            description: self.description.trim().to_string(),
            ..self
        }
    }

    fn into_action(self) -> Action {
        Action {
            id: self.id,
            name: self.name,
            enabled: self.enabled,
            from_states: self.from_states,
            to_state: self.to_state,
            description: self.description,
        }
    }
}

impl From<State> for StateSpec {
    fn from(state: State) -> Self {
        Self {
            id: state.id,
            name: state.name,
            is_initial: state.is_initial,
            is_final: state.is_final,
            enabled: state.enabled,
            description: state.description,
        }
    }
}

impl From<Action> for ActionSpec {
    fn from(action: Action) -> Self {
        Self {
            id: action.id,
            name: action.name,
            enabled: action.enabled,
            from_states: action.from_states,
            to_state: action.to_state,
            description: action.description,
        }
    }
}
