//! Build errors for definition, state and action builders.

use thiserror::Error;

/// Errors that can occur when assembling a definition spec.
///
/// Builders only check the shape of each piece. Whether the pieces form a
/// valid graph is decided by
/// [`validate_definition`](crate::validation::validate_definition).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("State id not specified. Pass a non-empty id to StateBuilder::new")]
    MissingStateId,

    #[error("Action id not specified. Pass a non-empty id to ActionBuilder::new")]
    MissingActionId,

    #[error("Action '{0}' has no target state. Call .to(state)")]
    MissingTargetState(String),
}
