//! Diagnostics and validation reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// How serious a diagnostic is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Advisory, never blocks an operation
    Warning,
    /// Blocks the operation it was raised for
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// A human-readable validation finding.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{severity}: {message}")]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Outcome of a single check. Failures carry every diagnostic the check
/// raised, so independent checks can be accumulated with
/// [`Validation::all_vec`].
pub type Check = Validation<(), NonEmptyVec<Diagnostic>>;

/// Pass when `ok` holds, otherwise fail with the diagnostic built by `raise`.
pub(crate) fn ensure<F>(ok: bool, raise: F) -> Check
where
    F: FnOnce() -> Diagnostic,
{
    if ok {
        Validation::success(())
    } else {
        Validation::fail(raise())
    }
}

/// Fail unconditionally.
pub(crate) fn raise(diagnostic: Diagnostic) -> Check {
    Validation::fail(diagnostic)
}

/// Every diagnostic a validation pass produced.
///
/// `valid` is true iff no diagnostic has [`Severity::Error`]; warnings never
/// make a report invalid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Accumulate all failed checks, in order, into a report.
    pub fn from_checks(checks: Vec<Check>) -> Self {
        match Validation::all_vec(checks) {
            Validation::Success(_) => Self::from_diagnostics(Vec::new()),
            Validation::Failure(found) => Self::from_diagnostics(found.iter().cloned().collect()),
        }
    }

    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            valid: !diagnostics.iter().any(Diagnostic::is_error),
            diagnostics,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    /// Messages of the blocking diagnostics only.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors().map(|d| d.message.clone()).collect()
    }
}
