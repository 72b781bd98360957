//! State graph traversals used by definition validation.
//!
//! Both traversals run on an explicit stack with a visited set, so their
//! depth is bounded by the number of states no matter how the graph is
//! shaped.

use crate::core::Definition;
use std::collections::{HashMap, HashSet};

#[derive(Debug)]
struct Edge<'a> {
    action_id: &'a str,
    target: &'a str,
    enabled: bool,
}

/// An edge that leads back into the active traversal path.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct BackEdge<'a> {
    pub from: &'a str,
    pub action_id: &'a str,
    pub revisited: &'a str,
}

/// Adjacency view of a definition.
///
/// Edges touching unknown state ids are left out. Out-edges keep the
/// declaration order of actions, then of each action's source states, which
/// keeps every traversal deterministic.
pub(crate) struct StateGraph<'a> {
    edges: HashMap<&'a str, Vec<Edge<'a>>>,
}

impl<'a> StateGraph<'a> {
    pub fn new(def: &'a Definition) -> Self {
        let known: HashSet<&str> = def.states.iter().map(|s| s.id.as_str()).collect();
        let mut edges: HashMap<&str, Vec<Edge<'a>>> = HashMap::new();

        for action in &def.actions {
            if !known.contains(action.to_state.as_str()) {
                continue;
            }
            for source in &action.from_states {
                if !known.contains(source.as_str()) {
                    continue;
                }
                edges.entry(source.as_str()).or_default().push(Edge {
                    action_id: action.id.as_str(),
                    target: action.to_state.as_str(),
                    enabled: action.enabled,
                });
            }
        }

        Self { edges }
    }

    fn out_edges(&self, state: &str) -> &[Edge<'a>] {
        self.edges.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// States reachable from `start` over enabled actions, `start` included.
    pub fn reachable(&self, start: &'a str) -> HashSet<&'a str> {
        let mut visited = HashSet::from([start]);
        let mut stack = vec![start];

        while let Some(state) = stack.pop() {
            for edge in self.out_edges(state) {
                if edge.enabled && visited.insert(edge.target) {
                    stack.push(edge.target);
                }
            }
        }

        visited
    }

    /// Depth-first search from `start` over all actions, enabled or not.
    ///
    /// Returns each edge that points back into the current path, in the
    /// order the search meets them. Every state is expanded at most once.
    pub fn back_edges(&self, start: &'a str) -> Vec<BackEdge<'a>> {
        let mut found = Vec::new();
        let mut visited = HashSet::from([start]);
        let mut on_path = HashSet::from([start]);
        // (state, index of the next out-edge to follow)
        let mut stack: Vec<(&'a str, usize)> = vec![(start, 0)];

        while let Some(frame) = stack.last_mut() {
            let state = frame.0;
            match self.out_edges(state).get(frame.1) {
                Some(edge) => {
                    frame.1 += 1;
                    if on_path.contains(edge.target) {
                        found.push(BackEdge {
                            from: state,
                            action_id: edge.action_id,
                            revisited: edge.target,
                        });
                    } else if visited.insert(edge.target) {
                        on_path.insert(edge.target);
                        stack.push((edge.target, 0));
                    }
                }
                None => {
                    on_path.remove(state);
                    stack.pop();
                }
            }
        }

        found
    }
}
