//! Read models for instances.
//!
//! A view resolves the ids stored on an instance to the display names of its
//! definition. History entries that point at an action or state the
//! definition no longer resolves are left out of the view rather than
//! failing it.

use crate::core::{Definition, HistoryEntry, Instance};
use crate::engine::{Engine, EngineError};
use crate::store::Store;
use crate::validation::available_actions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display form of an instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceView {
    pub id: String,
    pub definition_id: String,
    pub definition_name: String,
    pub current_state_id: String,
    pub current_state_name: String,
    pub is_final: bool,
    pub created_at: DateTime<Utc>,
    pub history: Vec<HistoryEntryView>,
    /// Actions that can be executed from the current state
    pub available_actions: Vec<ActionRef>,
}

/// Display form of one history entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryView {
    pub action_id: String,
    pub action_name: String,
    pub from_state_id: String,
    pub from_state_name: String,
    pub to_state_id: String,
    pub to_state_name: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRef {
    pub id: String,
    pub name: String,
}

/// Build the view of `instance` against its definition.
///
/// Returns `None` if the current state cannot be resolved.
pub fn project(def: &Definition, instance: &Instance) -> Option<InstanceView> {
    let current = def.state(instance.current_state_id())?;

    Some(InstanceView {
        id: instance.id().to_string(),
        definition_id: def.id.clone(),
        definition_name: def.name.clone(),
        current_state_id: current.id.clone(),
        current_state_name: current.name.clone(),
        is_final: current.is_final,
        created_at: instance.created_at(),
        history: instance
            .history()
            .iter()
            .filter_map(|entry| project_entry(def, entry))
            .collect(),
        available_actions: available_actions(def, instance)
            .into_iter()
            .map(|action| ActionRef {
                id: action.id.clone(),
                name: action.name.clone(),
            })
            .collect(),
    })
}

fn project_entry(def: &Definition, entry: &HistoryEntry) -> Option<HistoryEntryView> {
    let action = def.action(&entry.action_id)?;
    let from = def.state(&entry.from_state_id)?;
    let to = def.state(&entry.to_state_id)?;

    Some(HistoryEntryView {
        action_id: action.id.clone(),
        action_name: action.name.clone(),
        from_state_id: from.id.clone(),
        from_state_name: from.name.clone(),
        to_state_id: to.id.clone(),
        to_state_name: to.name.clone(),
        timestamp: entry.timestamp,
    })
}

impl<D, I> Engine<D, I>
where
    D: Store<Definition>,
    I: Store<Instance>,
{
    /// View of one instance with ids resolved to display names.
    pub fn get_instance_view(&self, instance_id: &str) -> Result<InstanceView, EngineError> {
        let instance = self.get_instance(instance_id)?;
        let def = self.get_definition(instance.definition_id())?;

        project(&def, &instance)
            .ok_or_else(|| EngineError::state_not_found(instance.current_state_id()))
    }

    /// Views of every instance, oldest first.
    ///
    /// Instances whose definition or current state cannot be resolved are
    /// skipped.
    pub fn list_instance_views(&self) -> Result<Vec<InstanceView>, EngineError> {
        // Instances first: definitions are never removed, so every instance
        // read here finds its definition in the later listing.
        let instances = self.list_instances()?;
        let definitions: HashMap<String, Definition> = self
            .list_definitions()?
            .into_iter()
            .map(|def| (def.id.clone(), def))
            .collect();

        let views = instances
            .into_iter()
            .filter_map(|instance| {
                let view = definitions
                    .get(instance.definition_id())
                    .and_then(|def| project(def, &instance));
                if view.is_none() {
                    tracing::warn!(
                        instance_id = instance.id(),
                        definition_id = instance.definition_id(),
                        "skipping instance that cannot be projected"
                    );
                }
                view
            })
            .collect();

        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, DefinitionSpec, State};
    use crate::engine::EngineConfig;
    use crate::store::{Entity, MemoryStore, StoreError};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn review() -> Definition {
        let spec = DefinitionSpec {
            name: "Document Review".to_string(),
            description: None,
            states: vec![
                State::new("draft", "Draft").initial().into(),
                State::new("review", "In Review").into(),
                State::new("approved", "Approved").terminal().into(),
            ],
            actions: vec![
                Action::new("submit", "Submit", ["draft"], "review").into(),
                Action::new("approve", "Approve", ["review"], "approved").into(),
            ],
        };
        Definition::from_spec("def-1", spec, Utc::now())
    }

    fn submitted() -> Instance {
        Instance::new("def-1", "draft", Utc::now()).advance("submit", "review", Utc::now())
    }

    #[test]
    fn view_resolves_display_names() {
        let view = project(&review(), &submitted()).unwrap();

        assert_eq!(view.definition_name, "Document Review");
        assert_eq!(view.current_state_id, "review");
        assert_eq!(view.current_state_name, "In Review");
        assert!(!view.is_final);

        let entry = &view.history[0];
        assert_eq!(entry.action_name, "Submit");
        assert_eq!(entry.from_state_name, "Draft");
        assert_eq!(entry.to_state_name, "In Review");
    }

    #[test]
    fn view_lists_available_actions() {
        let view = project(&review(), &submitted()).unwrap();

        assert_eq!(
            view.available_actions,
            vec![ActionRef {
                id: "approve".to_string(),
                name: "Approve".to_string()
            }]
        );
    }

    #[test]
    fn unresolvable_entries_are_omitted() {
        let mut def = review();
        let instance = submitted().advance("approve", "approved", Utc::now());
        def.actions.retain(|a| a.id != "submit");

        let view = project(&def, &instance).unwrap();

        assert_eq!(view.history.len(), 1);
        assert_eq!(view.history[0].action_id, "approve");
        assert!(view.is_final);
        assert!(view.available_actions.is_empty());
    }

    /// Store that records which collection was listed, in order.
    struct Recording<T: Entity> {
        inner: MemoryStore<T>,
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl<T: Entity> Store<T> for Recording<T> {
        fn get(&self, id: &str) -> Result<Option<T>, StoreError> {
            self.inner.get(id)
        }

        fn get_all(&self) -> Result<Vec<T>, StoreError> {
            self.log.lock().push(self.label);
            self.inner.get_all()
        }

        fn put(&self, id: Option<String>, entity: T) -> Result<T, StoreError> {
            self.inner.put(id, entity)
        }
    }

    #[test]
    fn listing_views_reads_instances_before_definitions() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let definitions = Recording {
            inner: MemoryStore::<Definition>::new(),
            label: "definitions",
            log: Arc::clone(&log),
        };
        let instances = Recording {
            inner: MemoryStore::<Instance>::new(),
            label: "instances",
            log: Arc::clone(&log),
        };
        let engine = Engine::new(definitions, instances, EngineConfig::default());
        let spec = DefinitionSpec {
            name: "Ticket".to_string(),
            description: None,
            states: vec![
                State::new("open", "Open").initial().into(),
                State::new("closed", "Closed").terminal().into(),
            ],
            actions: vec![Action::new("close", "Close", ["open"], "closed").into()],
        };
        let def = engine.create_definition(spec).unwrap();
        engine.start_instance(&def.id).unwrap();
        log.lock().clear();

        let views = engine.list_instance_views().unwrap();

        assert_eq!(views.len(), 1);
        assert_eq!(*log.lock(), vec!["instances", "definitions"]);
    }

    #[test]
    fn unresolvable_current_state_yields_no_view() {
        let mut def = review();
        def.states.retain(|s| s.id != "review");

        assert!(project(&def, &submitted()).is_none());
    }
}
