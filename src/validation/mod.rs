//! Validation of definitions and pending transitions.
//!
//! Validation is pure: every function here inspects its inputs and returns a
//! [`ValidationReport`] without touching storage.
//!
//! Checks accumulate through Stillwater's `Validation` type, so a single pass
//! reports every problem instead of stopping at the first. The exception is a
//! missing referenced entity, after which the remaining checks have no
//! subject and are skipped.
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use waypoint::core::{Action, Definition, DefinitionSpec, State};
//! use waypoint::validation::{validate_definition, Severity};
//!
//! let spec = DefinitionSpec {
//!     name: "Broken".to_string(),
//!     description: None,
//!     states: vec![
//!         State::new("a", "A").initial().into(),
//!         State::new("b", "B").initial().into(),
//!     ],
//!     actions: vec![Action::new("go", "Go", ["a"], "c").into()],
//! };
//! let def = Definition::from_spec("def-1", spec, Utc::now());
//!
//! let report = validate_definition(&def);
//! assert!(!report.valid);
//! assert_eq!(report.errors().count(), 2);
//! assert!(report.diagnostics.iter().all(|d| d.severity == Severity::Error));
//! ```

mod definition;
mod diagnostic;
mod execution;
mod graph;

pub use definition::validate_definition;
pub use diagnostic::{Check, Diagnostic, Severity, ValidationReport};
pub use execution::{available_actions, validate_action_execution};
