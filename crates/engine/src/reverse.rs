use crate::callgraph::CallGraph;
use ir::MethodId;
use std::collections::{BTreeMap, BTreeSet};

/// Callee → distinct callers. Ordered buckets keep traversal deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseIndex {
    callers: BTreeMap<MethodId, BTreeSet<MethodId>>,
}

impl ReverseIndex {
    /// Full rebuild from `graph`.
    pub fn build(graph: &CallGraph) -> Self {
        let mut callers: BTreeMap<MethodId, BTreeSet<MethodId>> = BTreeMap::new();
        for (caller, callees) in graph.iter() {
            for callee in callees {
                callers
                    .entry(callee.clone())
                    .or_default()
                    .insert(caller.clone());
            }
        }
        Self { callers }
    }

    pub fn callers(&self, callee: &MethodId) -> impl Iterator<Item = &MethodId> {
        self.callers.get(callee).into_iter().flatten()
    }

    /// Number of callee nodes.
    pub fn len(&self) -> usize {
        self.callers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callers.is_empty()
    }
}
