//! States of a workflow definition.
//!
//! A state is a node in a definition's graph. Its flags decide where an
//! instance starts (`is_initial`), where it stops (`is_final`) and whether it
//! may currently be entered or left (`enabled`).

use serde::{Deserialize, Serialize};

/// A single node of a workflow definition.
///
/// # Example
///
/// ```rust
/// use waypoint::core::State;
///
/// let draft = State::new("draft", "Draft").initial();
/// let done = State::new("done", "Done").terminal();
///
/// assert!(draft.is_initial);
/// assert!(done.is_final);
/// assert!(draft.enabled && done.enabled);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub id: String,
    pub name: String,
    pub is_initial: bool,
    pub is_final: bool,
    pub enabled: bool,
    #[serde(default)]
    pub description: String,
}

impl State {
    /// Create an enabled, non-initial, non-final state.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_initial: false,
            is_final: false,
            enabled: true,
            description: String::new(),
        }
    }

    /// Mark this state as the entry point.
    pub fn initial(mut self) -> Self {
        self.is_initial = true;
        self
    }

    /// Mark this state as final.
    pub fn terminal(mut self) -> Self {
        self.is_final = true;
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
}
