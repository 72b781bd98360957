//! The workflow engine.
//!
//! The engine is the imperative shell around the pure validation core. It
//! loads entities from its stores, asks [`crate::validation`] whether an
//! operation is allowed, and publishes the result.
//!
//! # Concurrency
//!
//! Every mutating operation (`create_definition`, `start_instance`,
//! `execute_action`) runs inside one engine-wide critical section, so at most
//! one mutation is in flight at a time across all definitions and instances.
//! That makes cross-entity rules such as unique definition names race-free
//! without any store transactions. Reads skip the lock and go straight to the
//! store, which only ever holds fully built entities.
//!
//! # Example
//!
//! ```rust
//! use waypoint::builder::{ActionBuilder, DefinitionBuilder, StateBuilder};
//! use waypoint::engine::Engine;
//!
//! let engine = Engine::in_memory();
//!
//! let spec = DefinitionBuilder::new("Document Review")
//!     .state(StateBuilder::new("draft", "Draft").initial())
//!     .state(StateBuilder::new("approved", "Approved").terminal())
//!     .action(ActionBuilder::new("approve", "Approve").from("draft").to("approved"))
//!     .build()
//!     .unwrap();
//!
//! let definition = engine.create_definition(spec).unwrap();
//! let instance = engine.start_instance(&definition.id).unwrap();
//! assert_eq!(instance.current_state_id(), "draft");
//!
//! let instance = engine.execute_action(instance.id(), "approve").unwrap();
//! assert_eq!(instance.current_state_id(), "approved");
//! assert_eq!(instance.history().len(), 1);
//!
//! assert!(engine.execute_action(instance.id(), "approve").is_err());
//! ```

mod config;
mod error;
mod snapshot;

pub use config::{ConfigError, EngineConfig};
pub use error::{EngineError, EntityKind};
pub use snapshot::EngineSnapshot;

use crate::core::{Definition, DefinitionSpec, Instance};
use crate::store::{sort_by_creation, MemoryStore, Store, StoreError};
use crate::validation::{validate_action_execution, validate_definition, ValidationReport};
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

/// Validates and runs workflow definitions over pluggable stores.
///
/// The engine is `Send + Sync` whenever its stores are; share it across
/// threads behind an `Arc`.
pub struct Engine<D = MemoryStore<Definition>, I = MemoryStore<Instance>>
where
    D: Store<Definition>,
    I: Store<Instance>,
{
    definitions: D,
    instances: I,
    config: EngineConfig,
    mutation: Mutex<()>,
}

impl Engine {
    /// Engine over fresh in-memory stores with the default configuration.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), MemoryStore::new(), EngineConfig::default())
    }
}

fn store_failure(err: StoreError) -> EngineError {
    tracing::error!(error = %err, "store operation failed");
    EngineError::Operation
}

impl<D, I> Engine<D, I>
where
    D: Store<Definition>,
    I: Store<Instance>,
{
    pub fn new(definitions: D, instances: I, config: EngineConfig) -> Self {
        Self {
            definitions,
            instances,
            config,
            mutation: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn log_warnings(&self, report: &ValidationReport, definition: &str) {
        if !self.config.log_warnings {
            return;
        }
        for warning in report.warnings() {
            tracing::warn!(definition, message = %warning.message, "definition warning");
        }
    }

    /// Validate and persist a new definition.
    ///
    /// Text fields are trimmed first. Fails if another definition already
    /// has the same name, compared case-insensitively, or if validation
    /// reports any error. Warnings do not block creation.
    #[tracing::instrument(
        name = "create_definition",
        skip(self, spec),
        fields(name = %spec.name.trim())
    )]
    pub fn create_definition(&self, spec: DefinitionSpec) -> Result<Definition, EngineError> {
        let spec = spec.normalize();
        let _guard = self.mutation.lock();

        let wanted = spec.name.to_lowercase();
        let taken = self
            .definitions
            .get_all()
            .map_err(store_failure)?
            .iter()
            .any(|existing| existing.name.to_lowercase() == wanted);
        if taken && !spec.name.is_empty() {
            tracing::debug!("rejected duplicate definition name");
            return Err(EngineError::Validation(vec![format!(
                "a definition named '{}' already exists",
                spec.name
            )]));
        }

        let candidate = Definition::from_spec(Uuid::new_v4().to_string(), spec, Utc::now());
        let report = validate_definition(&candidate);
        self.log_warnings(&report, &candidate.id);
        if !report.valid {
            let errors = report.error_messages();
            tracing::debug!(?errors, "rejected invalid definition");
            return Err(EngineError::Validation(errors));
        }

        let id = candidate.id.clone();
        let stored = self
            .definitions
            .put(Some(id), candidate)
            .map_err(store_failure)?;

        tracing::info!(
            definition_id = %stored.id,
            states = stored.states.len(),
            actions = stored.actions.len(),
            "created definition"
        );
        Ok(stored)
    }

    pub fn get_definition(&self, id: &str) -> Result<Definition, EngineError> {
        self.definitions
            .get(id)
            .map_err(store_failure)?
            .ok_or_else(|| EngineError::definition_not_found(id))
    }

    /// All definitions, oldest first.
    pub fn list_definitions(&self) -> Result<Vec<Definition>, EngineError> {
        let mut definitions = self.definitions.get_all().map_err(store_failure)?;
        sort_by_creation(&mut definitions);
        Ok(definitions)
    }

    /// Start a new instance of a definition at its initial state.
    #[tracing::instrument(name = "start_instance", skip(self))]
    pub fn start_instance(&self, definition_id: &str) -> Result<Instance, EngineError> {
        let _guard = self.mutation.lock();

        let def = self.get_definition(definition_id)?;

        if self.config.revalidate_on_start {
            let report = validate_definition(&def);
            if !report.valid {
                let errors = report.error_messages();
                tracing::debug!(?errors, "stored definition failed validation");
                return Err(EngineError::Validation(errors));
            }
        }

        let Some(initial) = def.initial_state() else {
            return Err(EngineError::Validation(vec![format!(
                "definition '{}' has no unique initial state",
                def.id
            )]));
        };
        if !initial.enabled {
            return Err(EngineError::Validation(vec![format!(
                "initial state '{}' is disabled",
                initial.id
            )]));
        }

        let instance = Instance::new(def.id.as_str(), initial.id.as_str(), Utc::now());
        let stored = self.instances.put(None, instance).map_err(store_failure)?;

        tracing::info!(
            instance_id = stored.id(),
            state = stored.current_state_id(),
            "started instance"
        );
        Ok(stored)
    }

    pub fn get_instance(&self, id: &str) -> Result<Instance, EngineError> {
        self.instances
            .get(id)
            .map_err(store_failure)?
            .ok_or_else(|| EngineError::instance_not_found(id))
    }

    /// All instances, oldest first.
    pub fn list_instances(&self) -> Result<Vec<Instance>, EngineError> {
        let mut instances = self.instances.get_all().map_err(store_failure)?;
        sort_by_creation(&mut instances);
        Ok(instances)
    }

    /// Execute an action on an instance and record it in the history.
    ///
    /// Only the requested transition is validated; the definition itself
    /// was validated when it was created and cannot change since. On any
    /// failure the stored instance is left untouched.
    #[tracing::instrument(name = "execute_action", skip(self))]
    pub fn execute_action(&self, instance_id: &str, action_id: &str) -> Result<Instance, EngineError> {
        let _guard = self.mutation.lock();

        let instance = self.get_instance(instance_id)?;
        let def = self.get_definition(instance.definition_id())?;

        let report = validate_action_execution(&def, &instance, action_id);
        if !report.valid {
            let errors = report.error_messages();
            tracing::debug!(?errors, "rejected action");
            return Err(EngineError::Validation(errors));
        }

        let Some(action) = def.action(action_id) else {
            return Err(EngineError::Validation(vec![format!(
                "action '{action_id}' not found"
            )]));
        };
        let target = match def.state(&action.to_state) {
            Some(target) if target.enabled => target,
            Some(target) => {
                return Err(EngineError::Validation(vec![format!(
                    "target state '{}' is disabled",
                    target.id
                )]))
            }
            None => {
                return Err(EngineError::Validation(vec![format!(
                    "target state '{}' not found",
                    action.to_state
                )]))
            }
        };

        let next = instance.advance(action.id.as_str(), target.id.as_str(), Utc::now());
        let stored = self
            .instances
            .put(Some(instance.id().to_string()), next)
            .map_err(store_failure)?;

        tracing::info!(
            from = instance.current_state_id(),
            to = stored.current_state_id(),
            history = stored.history().len(),
            "executed action"
        );
        Ok(stored)
    }
}
