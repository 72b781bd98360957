//! Actions: named transitions between states.

use serde::{Deserialize, Serialize};

/// A named edge from a set of permitted source states to one target state.
///
/// # Example
///
/// ```rust
/// use waypoint::core::Action;
///
/// let submit = Action::new("submit", "Submit", ["draft", "rework"], "review");
///
/// assert!(submit.leaves("draft"));
/// assert!(submit.leaves("rework"));
/// assert!(!submit.leaves("review"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub from_states: Vec<String>,
    pub to_state: String,
    #[serde(default)]
    pub description: String,
}

impl Action {
    /// Create an enabled action.
    pub fn new<I, S>(
        id: impl Into<String>,
        name: impl Into<String>,
        from_states: I,
        to_state: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            enabled: true,
            from_states: from_states.into_iter().map(Into::into).collect(),
            to_state: to_state.into(),
            description: String::new(),
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether `state_id` is one of this action's source states.
    pub fn leaves(&self, state_id: &str) -> bool {
        self.from_states.iter().any(|s| s == state_id)
    }

    /// Whether the action can fire from its own target state.
    pub fn is_self_loop(&self) -> bool {
        self.leaves(&self.to_state)
    }
}
