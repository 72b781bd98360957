//! Running instances and their transition history.
//!
//! An instance is advanced by producing a new value rather than mutating in
//! place: [`Instance::advance`] returns the next instance and leaves the
//! original untouched, so a failed persist never leaves a half-applied
//! transition behind.

use crate::store::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single executed action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// The action that was executed
    pub action_id: String,
    /// The state the instance was in before the action
    pub from_state_id: String,
    /// The state the action moved the instance to
    pub to_state_id: String,
    /// When the action was executed
    pub timestamp: DateTime<Utc>,
}

/// One running execution of a definition.
///
/// Fields are read-only outside the crate. The only way to move an instance
/// forward is the engine's action execution, which keeps `history` a
/// contiguous trail from the initial state to `current_state_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    id: String,
    definition_id: String,
    current_state_id: String,
    created_at: DateTime<Utc>,
    history: Vec<HistoryEntry>,
}

impl Instance {
    /// Create an instance positioned at `initial_state_id` with no history.
    ///
    /// The id stays empty until the store assigns one.
    pub(crate) fn new(
        definition_id: impl Into<String>,
        initial_state_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: String::new(),
            definition_id: definition_id.into(),
            current_state_id: initial_state_id.into(),
            created_at,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn definition_id(&self) -> &str {
        &self.definition_id
    }

    pub fn current_state_id(&self) -> &str {
        &self.current_state_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// All executed actions, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Return the instance after executing `action_id` into `to_state_id`.
    ///
    /// The entry's timestamp is clamped so it never precedes the previous
    /// entry, keeping history timestamps non-decreasing even if the wall
    /// clock steps backwards.
    pub(crate) fn advance(
        &self,
        action_id: impl Into<String>,
        to_state_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let timestamp = match self.history.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        let to_state_id = to_state_id.into();

        let mut history = self.history.clone();
        history.push(HistoryEntry {
            action_id: action_id.into(),
            from_state_id: self.current_state_id.clone(),
            to_state_id: to_state_id.clone(),
            timestamp,
        });

        Self {
            id: self.id.clone(),
            definition_id: self.definition_id.clone(),
            current_state_id: to_state_id,
            created_at: self.created_at,
            history,
        }
    }

    /// State ids visited, in order: the starting state, then the target of
    /// every entry.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.history.len() + 1);
        match self.history.first() {
            Some(first) => path.push(first.from_state_id.as_str()),
            None => path.push(self.current_state_id.as_str()),
        }
        for entry in &self.history {
            path.push(entry.to_state_id.as_str());
        }
        path
    }

    /// Time between the first and last executed action.
    ///
    /// Returns `None` if no action has been executed yet.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.history.first(), self.history.last()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }
}

impl Entity for Instance {
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
