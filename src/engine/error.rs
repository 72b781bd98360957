//! Errors returned by engine operations.

use std::fmt;
use thiserror::Error;

/// Kind of entity a lookup failed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Definition,
    Instance,
    State,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Definition => f.write_str("definition"),
            Self::Instance => f.write_str("instance"),
            Self::State => f.write_str("state"),
        }
    }
}

/// Failure of an engine operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// One or more blocking diagnostics
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A referenced entity does not exist
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },

    /// Unexpected internal failure. Details are logged, never returned.
    #[error("internal error while processing the request")]
    Operation,
}

impl EngineError {
    pub(crate) fn definition_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: EntityKind::Definition,
            id: id.to_string(),
        }
    }

    pub(crate) fn instance_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: EntityKind::Instance,
            id: id.to_string(),
        }
    }

    pub(crate) fn state_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: EntityKind::State,
            id: id.to_string(),
        }
    }

    /// Human-readable messages describing the failure.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_returned_verbatim() {
        let err = EngineError::Validation(vec!["a".to_string(), "b".to_string()]);

        assert_eq!(err.messages(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "validation failed: a; b");
    }

    #[test]
    fn not_found_names_kind_and_id() {
        let err = EngineError::instance_not_found("i-1");

        assert!(err.is_not_found());
        assert_eq!(err.messages(), vec!["instance 'i-1' not found".to_string()]);
    }

    #[test]
    fn operation_error_hides_detail() {
        assert_eq!(
            EngineError::Operation.messages(),
            vec!["internal error while processing the request".to_string()]
        );
    }
}
