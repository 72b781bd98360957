//! Builder for a single state.

use crate::builder::error::BuildError;
use crate::core::StateSpec;

/// Fluent builder for a [`StateSpec`].
///
/// States start enabled, neither initial nor final.
#[derive(Clone, Debug)]
pub struct StateBuilder {
    spec: StateSpec,
}

impl StateBuilder {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            spec: StateSpec {
                id: id.into(),
                name: name.into(),
                is_initial: false,
                is_final: false,
                enabled: true,
                description: String::new(),
            },
        }
    }

    /// Mark as the entry point of the workflow.
    pub fn initial(mut self) -> Self {
        self.spec.is_initial = true;
        self
    }

    /// Mark as final. No action executes from a final state.
    pub fn terminal(mut self) -> Self {
        self.spec.is_final = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.spec.enabled = false;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.spec.description = description.into();
        self
    }

    pub fn build(self) -> Result<StateSpec, BuildError> {
        if self.spec.id.trim().is_empty() {
            return Err(BuildError::MissingStateId);
        }
        Ok(self.spec)
    }
}
