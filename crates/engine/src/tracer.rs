//! Bounded backward search from a sink to entry points.

use crate::index::SourceIndex;
use crate::reverse::ReverseIndex;
use ir::MethodId;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, trace};

/// Method facts consulted while walking callers.
pub trait MethodOracle {
    fn has_parameters(&self, id: &MethodId) -> bool;
    fn is_entry_point(&self, id: &MethodId) -> bool;
}

impl MethodOracle for SourceIndex {
    fn has_parameters(&self, id: &MethodId) -> bool {
        self.method_info(id).has_parameters
    }

    fn is_entry_point(&self, id: &MethodId) -> bool {
        self.method_info(id).is_entry_point
    }
}

/// Entry point first, sink last, no repeated node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaintChain(pub Vec<MethodId>);

impl TaintChain {
    pub fn entry(&self) -> Option<&MethodId> {
        self.0.first()
    }

    pub fn sink(&self) -> Option<&MethodId> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MethodId> {
        self.0.iter()
    }
}

impl std::fmt::Display for TaintChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(" -> "))
    }
}

struct State {
    /// Sink first; the head of the chain is the last element.
    path: Vec<MethodId>,
    depth: usize,
    on_path: HashSet<MethodId>,
}

/// Every chain from an entry point to `sink` using at most `max_depth`
/// caller hops.
///
/// A caller is dropped when it already appears on the current path, when the
/// same caller was already reached at the same depth during this search, or
/// when it declares no parameters. Entry points end a chain; other callers
/// are expanded further.
pub fn trace_back<O>(
    reverse: &ReverseIndex,
    oracle: &O,
    sink: &MethodId,
    max_depth: usize,
) -> Vec<TaintChain>
where
    O: MethodOracle + ?Sized,
{
    let mut chains = Vec::new();
    let mut expanded: HashSet<(MethodId, usize)> = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(State {
        path: vec![sink.clone()],
        depth: 0,
        on_path: HashSet::from([sink.clone()]),
    });

    while let Some(state) = queue.pop_front() {
        if state.depth >= max_depth {
            continue;
        }
        let Some(head) = state.path.last() else {
            continue;
        };
        for caller in reverse.callers(head) {
            if state.on_path.contains(caller) {
                trace!(caller = %caller, "Cycle skipped");
                continue;
            }
            if !expanded.insert((caller.clone(), state.depth + 1)) {
                continue;
            }
            if !oracle.has_parameters(caller) {
                trace!(caller = %caller, "Caller without parameters dropped");
                continue;
            }
            let mut path = state.path.clone();
            path.push(caller.clone());
            if oracle.is_entry_point(caller) {
                path.reverse();
                let chain = TaintChain(path);
                debug!(sink = %sink, chain = %chain, "Chain found");
                chains.push(chain);
            } else {
                let mut on_path = state.on_path.clone();
                on_path.insert(caller.clone());
                queue.push_back(State {
                    path,
                    depth: state.depth + 1,
                    on_path,
                });
            }
        }
    }
    chains
}
