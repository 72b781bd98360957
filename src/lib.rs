//! Waypoint: a validated finite-state workflow engine
//!
//! Waypoint keeps the "pure core, imperative shell" split. Validation of
//! definitions and transitions is a set of pure functions over plain data,
//! while the [`engine::Engine`] owns storage, locking and logging.
//!
//! # Core Concepts
//!
//! - **Definition**: an immutable template of states and the actions between them
//! - **Instance**: one run of a definition with its full transition history
//! - **Diagnostic**: a validation finding, either a blocking error or a warning
//! - **View**: an instance with ids resolved to display names
//!
//! # Example
//!
//! ```rust
//! use waypoint::builder::{ActionBuilder, DefinitionBuilder, StateBuilder};
//! use waypoint::Engine;
//!
//! let engine = Engine::in_memory();
//! let spec = DefinitionBuilder::new("Document Review")
//!     .state(StateBuilder::new("draft", "Draft").initial())
//!     .state(StateBuilder::new("review", "In Review"))
//!     .state(StateBuilder::new("approved", "Approved").terminal())
//!     .action(ActionBuilder::new("submit", "Submit").from("draft").to("review"))
//!     .action(ActionBuilder::new("approve", "Approve").from("review").to("approved"))
//!     .build()
//!     .unwrap();
//!
//! let definition = engine.create_definition(spec).unwrap();
//! let instance = engine.start_instance(&definition.id).unwrap();
//! engine.execute_action(instance.id(), "submit").unwrap();
//!
//! let view = engine.get_instance_view(instance.id()).unwrap();
//! assert_eq!(view.current_state_name, "In Review");
//! assert_eq!(view.available_actions[0].name, "Approve");
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod projection;
pub mod store;
pub mod telemetry;
pub mod validation;

// Re-export commonly used types
pub use core::{Action, Definition, DefinitionSpec, HistoryEntry, Instance, State};
pub use engine::{Engine, EngineConfig, EngineError};
pub use projection::InstanceView;
pub use validation::{Diagnostic, Severity, ValidationReport};
