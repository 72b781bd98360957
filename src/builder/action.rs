//! Builder for a single action.

use crate::builder::error::BuildError;
use crate::core::ActionSpec;

/// Fluent builder for an [`ActionSpec`].
#[derive(Clone, Debug)]
pub struct ActionBuilder {
    id: String,
    name: String,
    from_states: Vec<String>,
    to_state: Option<String>,
    enabled: bool,
    description: String,
}

impl ActionBuilder {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            from_states: Vec::new(),
            to_state: None,
            enabled: true,
            description: String::new(),
        }
    }

    /// Add a state the action may be executed from. Can be called repeatedly.
    pub fn from(mut self, state: impl Into<String>) -> Self {
        self.from_states.push(state.into());
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.to_state = Some(state.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Build the action spec.
    ///
    /// An action without source states still builds; the validator reports
    /// it alongside every other problem of the definition.
    pub fn build(self) -> Result<ActionSpec, BuildError> {
        if self.id.trim().is_empty() {
            return Err(BuildError::MissingActionId);
        }
        let to_state = self
            .to_state
            .ok_or_else(|| BuildError::MissingTargetState(self.id.clone()))?;

        Ok(ActionSpec {
            id: self.id,
            name: self.name,
            enabled: self.enabled,
            from_states: self.from_states,
            to_state,
            description: self.description,
        })
    }
}
