//! Structural validation of workflow definitions.

use super::diagnostic::{ensure, raise, Check, Diagnostic, ValidationReport};
use super::graph::StateGraph;
use crate::core::{Action, Definition, State};
use std::collections::HashSet;
use stillwater::validation::Validation;

/// Validate a definition against the structural rules of a workflow graph.
///
/// Errors:
/// - empty definition id or name
/// - state with an empty id or name, or a repeated id
/// - initial-state count other than exactly one
/// - action with an empty id or name, a repeated id, no source states, or a
///   source/target id that is not a state of the definition
///
/// Warnings:
/// - non-initial, non-final state unreachable from the initial state over
///   enabled actions
/// - self-loop action targeting a final state
/// - cycle in the graph of all actions, reported per back-edge
///
/// The graph checks only run when there is exactly one initial state.
/// Diagnostics come out in a fixed order, so validating the same definition
/// twice yields identical reports.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use waypoint::core::{Action, Definition, DefinitionSpec, State};
/// use waypoint::validation::validate_definition;
///
/// let spec = DefinitionSpec {
///     name: "Review".to_string(),
///     description: None,
///     states: vec![
///         State::new("draft", "Draft").initial().into(),
///         State::new("done", "Done").terminal().into(),
///     ],
///     actions: vec![Action::new("finish", "Finish", ["draft"], "done").into()],
/// };
/// let def = Definition::from_spec("def-1", spec, Utc::now());
///
/// let report = validate_definition(&def);
/// assert!(report.valid);
/// assert!(report.diagnostics.is_empty());
/// ```
pub fn validate_definition(def: &Definition) -> ValidationReport {
    let mut checks = vec![
        ensure(!def.id.is_empty(), || {
            Diagnostic::error("definition id must not be empty")
        }),
        ensure(!def.name.is_empty(), || {
            Diagnostic::error("definition name must not be empty")
        }),
    ];

    checks.extend(state_checks(&def.states));
    checks.push(initial_state_count(&def.states));

    let initial = def.initial_state();
    if let Some(initial) = initial {
        checks.extend(reachability(def, initial));
    }

    let state_ids: HashSet<&str> = def.states.iter().map(|s| s.id.as_str()).collect();
    checks.extend(action_checks(def, &state_ids));

    if let Some(initial) = initial {
        checks.extend(cycles(def, initial));
    }

    ValidationReport::from_checks(checks)
}

fn describe(kind: &str, id: &str, position: usize) -> String {
    if id.is_empty() {
        format!("{kind} at position {position}")
    } else {
        format!("{kind} '{id}'")
    }
}

fn state_checks(states: &[State]) -> Vec<Check> {
    let mut checks = Vec::new();
    let mut seen = HashSet::new();

    for (position, state) in states.iter().enumerate() {
        checks.push(ensure(!state.id.is_empty(), || {
            Diagnostic::error(format!("state at position {position} has an empty id"))
        }));
        checks.push(ensure(!state.name.is_empty(), || {
            Diagnostic::error(format!(
                "{} has an empty name",
                describe("state", &state.id, position)
            ))
        }));
        if !state.id.is_empty() && !seen.insert(state.id.as_str()) {
            checks.push(raise(Diagnostic::error(format!(
                "duplicate state id '{}'",
                state.id
            ))));
        }
    }

    checks
}

fn initial_state_count(states: &[State]) -> Check {
    match states.iter().filter(|s| s.is_initial).count() {
        1 => Validation::success(()),
        0 => raise(Diagnostic::error(
            "no initial state defined (found 0, expected exactly 1)",
        )),
        found => raise(Diagnostic::error(format!(
            "too many initial states (found {found}, expected exactly 1)"
        ))),
    }
}

fn reachability(def: &Definition, initial: &State) -> Vec<Check> {
    let reached = StateGraph::new(def).reachable(initial.id.as_str());
    let mut reported = HashSet::new();

    def.states
        .iter()
        .filter(|s| !s.is_initial && !s.is_final && !s.id.is_empty())
        .filter(|s| !reached.contains(s.id.as_str()))
        .filter(|s| reported.insert(s.id.as_str()))
        .map(|s| {
            raise(Diagnostic::warning(format!(
                "state '{}' is unreachable from initial state '{}'",
                s.id, initial.id
            )))
        })
        .collect()
}

fn action_checks(def: &Definition, state_ids: &HashSet<&str>) -> Vec<Check> {
    let mut checks = Vec::new();
    let mut seen = HashSet::new();

    for (position, action) in def.actions.iter().enumerate() {
        let label = describe("action", &action.id, position);

        checks.push(ensure(!action.id.is_empty(), || {
            Diagnostic::error(format!("action at position {position} has an empty id"))
        }));
        checks.push(ensure(!action.name.is_empty(), || {
            Diagnostic::error(format!("{label} has an empty name"))
        }));
        if !action.id.is_empty() && !seen.insert(action.id.as_str()) {
            checks.push(raise(Diagnostic::error(format!(
                "duplicate action id '{}'",
                action.id
            ))));
        }
        checks.push(ensure(!action.from_states.is_empty(), || {
            Diagnostic::error(format!("{label} has no from-states"))
        }));
        checks.extend(references(action, &label, state_ids));

        if let Some(target) = def.state(&action.to_state) {
            checks.push(ensure(!(target.is_final && action.is_self_loop()), || {
                Diagnostic::warning(format!(
                    "{label} is a self-loop on final state '{}'",
                    target.id
                ))
            }));
        }
    }

    checks
}

fn references(action: &Action, label: &str, state_ids: &HashSet<&str>) -> Vec<Check> {
    let mut checks: Vec<Check> = action
        .from_states
        .iter()
        .filter(|source| !state_ids.contains(source.as_str()))
        .map(|source| {
            raise(Diagnostic::error(format!(
                "{label} references invalid from-state '{source}'"
            )))
        })
        .collect();

    checks.push(ensure(state_ids.contains(action.to_state.as_str()), || {
        Diagnostic::error(format!(
            "{label} references invalid to-state '{}'",
            action.to_state
        ))
    }));

    checks
}

fn cycles(def: &Definition, initial: &State) -> Vec<Check> {
    StateGraph::new(def)
        .back_edges(initial.id.as_str())
        .into_iter()
        .map(|edge| {
            raise(Diagnostic::warning(format!(
                "cycle detected: action '{}' from state '{}' revisits state '{}'",
                edge.action_id, edge.from, edge.revisited
            )))
        })
        .collect()
}
