//! Builder for a whole definition spec.

use crate::builder::action::ActionBuilder;
use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::core::DefinitionSpec;

/// Fluent builder for a [`DefinitionSpec`].
///
/// States and actions keep the order they were added in, which is also the
/// order diagnostics refer to them by position.
#[derive(Clone, Debug)]
pub struct DefinitionBuilder {
    name: String,
    description: Option<String>,
    states: Vec<StateBuilder>,
    actions: Vec<ActionBuilder>,
}

impl DefinitionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            states: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn state(mut self, state: StateBuilder) -> Self {
        self.states.push(state);
        self
    }

    pub fn action(mut self, action: ActionBuilder) -> Self {
        self.actions.push(action);
        self
    }

    /// Build every piece, stopping at the first malformed one.
    pub fn build(self) -> Result<DefinitionSpec, BuildError> {
        let states = self
            .states
            .into_iter()
            .map(StateBuilder::build)
            .collect::<Result<Vec<_>, _>>()?;
        let actions = self
            .actions
            .into_iter()
            .map(ActionBuilder::build)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DefinitionSpec {
            name: self.name,
            description: self.description,
            states,
            actions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Definition;
    use crate::validation::validate_definition;
    use chrono::Utc;

    #[test]
    fn builds_a_valid_definition() {
        let spec = DefinitionBuilder::new("Review")
            .describe("two step review")
            .state(StateBuilder::new("draft", "Draft").initial())
            .state(StateBuilder::new("review", "Review"))
            .state(StateBuilder::new("done", "Done").terminal())
            .action(ActionBuilder::new("submit", "Submit").from("draft").to("review"))
            .action(ActionBuilder::new("approve", "Approve").from("review").to("done"))
            .build()
            .unwrap();

        assert_eq!(spec.description.as_deref(), Some("two step review"));
        assert_eq!(spec.states.len(), 3);
        assert_eq!(spec.actions[1].id, "approve");

        let def = Definition::from_spec("d-1", spec, Utc::now());
        assert!(validate_definition(&def).valid);
    }

    #[test]
    fn graph_problems_are_left_to_validation() {
        let spec = DefinitionBuilder::new("Broken")
            .state(StateBuilder::new("a", "A").initial())
            .state(StateBuilder::new("b", "B").initial())
            .build();

        assert!(spec.is_ok());
    }

    #[test]
    fn first_malformed_piece_fails_the_build() {
        let result = DefinitionBuilder::new("Broken")
            .state(StateBuilder::new("a", "A").initial())
            .action(ActionBuilder::new("go", "Go").from("a"))
            .state(StateBuilder::new("", "Nameless"))
            .build();

        assert_eq!(result, Err(BuildError::MissingStateId));
    }
}
