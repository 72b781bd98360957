//! Core workflow data model.
//!
//! This module contains the entities the engine works with:
//! - States and actions, the nodes and edges of a workflow graph
//! - Definitions, the immutable templates built from a [`DefinitionSpec`]
//! - Instances, one running execution with its append-only history
//!
//! Nothing in this module performs I/O or validation; those live in
//! [`crate::store`] and [`crate::validation`].

mod action;
mod definition;
mod instance;
mod state;

pub use action::Action;
pub use definition::{ActionSpec, Definition, DefinitionSpec, StateSpec};
pub use instance::{HistoryEntry, Instance};
pub use state::State;
