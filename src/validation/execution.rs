//! Validation of a single pending transition.

use super::diagnostic::{ensure, raise, Diagnostic, ValidationReport};
use crate::core::{Action, Definition, Instance};

/// Check whether `action_id` may fire on `instance` right now.
///
/// A missing action or a current state that is not part of the definition
/// ends validation immediately, since the remaining checks have nothing to
/// inspect. Every other failing check is reported.
pub fn validate_action_execution(
    def: &Definition,
    instance: &Instance,
    action_id: &str,
) -> ValidationReport {
    let Some(action) = def.action(action_id) else {
        return ValidationReport::from_diagnostics(vec![Diagnostic::error(format!(
            "action '{action_id}' not found"
        ))]);
    };

    let mut checks = vec![ensure(action.enabled, || {
        Diagnostic::error(format!("action '{}' is disabled", action.id))
    })];

    let current_id = instance.current_state_id();
    let Some(current) = def.state(current_id) else {
        checks.push(raise(Diagnostic::error(format!(
            "current state '{current_id}' not found in definition"
        ))));
        return ValidationReport::from_checks(checks);
    };

    checks.push(ensure(current.enabled, || {
        Diagnostic::error(format!("current state '{}' is disabled", current.id))
    }));
    checks.push(ensure(action.leaves(&current.id), || {
        Diagnostic::error(format!(
            "action '{}' is not permitted from state '{}'",
            action.id, current.id
        ))
    }));
    checks.push(ensure(!current.is_final, || {
        Diagnostic::error(format!("current state '{}' is a final state", current.id))
    }));

    ValidationReport::from_checks(checks)
}

/// Actions that would pass [`validate_action_execution`] for `instance`, in
/// declaration order.
pub fn available_actions<'a>(def: &'a Definition, instance: &Instance) -> Vec<&'a Action> {
    def.actions
        .iter()
        .filter(|action| validate_action_execution(def, instance, &action.id).valid)
        .collect()
}
