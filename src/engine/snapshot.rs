//! Export and import of an in-memory engine.

use super::{Engine, EngineConfig};
use crate::core::{Definition, Instance};
use crate::store::snapshot::{check_version, decode, encode};
use crate::store::{MemoryStore, Snapshot, SnapshotError, SnapshotFormat};
use crate::validation::validate_definition;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Consistent copy of both stores of an in-memory engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub definitions: Snapshot<Definition>,
    pub instances: Snapshot<Instance>,
}

impl EngineSnapshot {
    pub fn encode(&self, format: SnapshotFormat) -> Result<Vec<u8>, SnapshotError> {
        encode(self, format)
    }

    pub fn decode(bytes: &[u8], format: SnapshotFormat) -> Result<Self, SnapshotError> {
        let snapshot: Self = decode(bytes, format)?;
        check_version(snapshot.definitions.version)?;
        check_version(snapshot.instances.version)?;
        Ok(snapshot)
    }

    /// Reject snapshots that `create_definition`, `start_instance` and
    /// `execute_action` could never have produced.
    fn check_consistency(&self) -> Result<(), SnapshotError> {
        let mut definitions: HashMap<&str, &Definition> = HashMap::new();
        let mut names: HashMap<String, &str> = HashMap::new();

        for def in &self.definitions.entries {
            let report = validate_definition(def);
            if !report.valid {
                return Err(SnapshotError::ValidationFailed(format!(
                    "definition '{}' is invalid: {}",
                    def.id,
                    report.error_messages().join("; ")
                )));
            }
            if let Some(other) = names.insert(def.name.to_lowercase(), def.id.as_str()) {
                return Err(SnapshotError::ValidationFailed(format!(
                    "definitions '{other}' and '{}' share the name '{}'",
                    def.id, def.name
                )));
            }
            definitions.insert(def.id.as_str(), def);
        }

        for instance in &self.instances.entries {
            let Some(def) = definitions.get(instance.definition_id()) else {
                return Err(SnapshotError::ValidationFailed(format!(
                    "instance '{}' references unknown definition '{}'",
                    instance.id(),
                    instance.definition_id()
                )));
            };
            check_trail(def, instance)?;
        }

        Ok(())
    }
}

/// The history of `instance` must lead from the initial state of `def` to its
/// current state, one executed action at a time, with timestamps in order.
fn check_trail(def: &Definition, instance: &Instance) -> Result<(), SnapshotError> {
    let broken = |detail: String| {
        SnapshotError::ValidationFailed(format!("instance '{}' {detail}", instance.id()))
    };

    let Some(initial) = def.initial_state() else {
        return Err(broken(format!(
            "belongs to definition '{}' which has no unique initial state",
            def.id
        )));
    };

    let mut position = initial.id.as_str();
    let mut previous = None;
    for (index, entry) in instance.history().iter().enumerate() {
        let Some(action) = def.action(&entry.action_id) else {
            return Err(broken(format!(
                "history entry {index} references unknown action '{}'",
                entry.action_id
            )));
        };
        if entry.from_state_id != position {
            return Err(broken(format!(
                "history entry {index} starts at '{}' but the instance was at '{position}'",
                entry.from_state_id
            )));
        }
        if !action.leaves(&entry.from_state_id) || action.to_state != entry.to_state_id {
            return Err(broken(format!(
                "history entry {index} does not follow action '{}'",
                action.id
            )));
        }
        if previous.is_some_and(|at| entry.timestamp < at) {
            return Err(broken(format!(
                "history entry {index} is older than the entry before it"
            )));
        }
        position = entry.to_state_id.as_str();
        previous = Some(entry.timestamp);
    }

    if position != instance.current_state_id() {
        return Err(broken(format!(
            "is in state '{}' but its history ends at '{position}'",
            instance.current_state_id()
        )));
    }

    Ok(())
}

impl Engine<MemoryStore<Definition>, MemoryStore<Instance>> {
    /// Capture both stores.
    ///
    /// Taken inside the mutation lock, so no transition is half-visible
    /// across the two stores.
    pub fn snapshot(&self) -> EngineSnapshot {
        let _guard = self.mutation.lock();
        EngineSnapshot {
            definitions: self.definitions.snapshot(),
            instances: self.instances.snapshot(),
        }
    }

    /// Snapshot encoded with the configured format.
    pub fn export(&self) -> Result<Vec<u8>, SnapshotError> {
        self.snapshot().encode(self.config.snapshot_format)
    }

    /// Rebuild an engine from a snapshot.
    ///
    /// Every definition is validated again, names must be unique ignoring
    /// case, and every instance history must be a contiguous trail from the
    /// initial state to the current state.
    pub fn restore(snapshot: EngineSnapshot, config: EngineConfig) -> Result<Self, SnapshotError> {
        snapshot.check_consistency()?;
        let definitions = MemoryStore::restore(snapshot.definitions)?;
        let instances = MemoryStore::restore(snapshot.instances)?;

        tracing::info!(
            definitions = definitions.len(),
            instances = instances.len(),
            "restored engine from snapshot"
        );
        Ok(Self::new(definitions, instances, config))
    }

    /// Decode bytes produced by [`Engine::export`] with the same format.
    pub fn import(bytes: &[u8], config: EngineConfig) -> Result<Self, SnapshotError> {
        let snapshot = EngineSnapshot::decode(bytes, config.snapshot_format)?;
        Self::restore(snapshot, config)
    }
}
