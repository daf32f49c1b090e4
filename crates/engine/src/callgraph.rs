//! `caller -> callee` edges over `Type:method` nodes with heuristic receiver
//! typing.

use crate::symbols::SymbolTable;
use ir::{strip_generics, CallSite, ChainRoot, MethodId, Receiver, SourceUnit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Caller → callees in the order the calls were recorded. Repeated calls
/// keep one entry per call site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallGraph {
    edges: BTreeMap<MethodId, Vec<MethodId>>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge(&mut self, caller: MethodId, callee: MethodId) {
        self.edges.entry(caller).or_default().push(callee);
    }

    /// Records one edge per call site of `unit`, in visit order.
    pub fn add_unit(&mut self, unit: &SourceUnit, symbols: &SymbolTable) {
        for site in &unit.calls {
            let caller = caller_of(site);
            let callee = resolve_callee(site, &caller, symbols, self);
            self.add_edge(caller, callee);
        }
    }

    pub fn callees(&self, caller: &MethodId) -> &[MethodId] {
        self.edges.get(caller).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MethodId, &[MethodId])> {
        self.edges.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of distinct callers.
    pub fn caller_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of recorded edges, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn unresolved_edge_count(&self) -> usize {
        self.edges
            .values()
            .flatten()
            .filter(|c| c.is_unresolved())
            .count()
    }
}

/// Nearest enclosing method and type of the call, or `unknown:unknown`
/// outside any method body.
pub fn caller_of(site: &CallSite) -> MethodId {
    match (site.enclosing_type(), site.enclosing_method()) {
        (Some(t), Some(m)) => MethodId::new(t, m),
        _ => MethodId::unknown(),
    }
}

/// Type of the callee most recently recorded for `caller`.
pub fn previous_edge_type<'g>(graph: &'g CallGraph, caller: &MethodId) -> Option<&'g str> {
    graph
        .callees(caller)
        .last()
        .map(|callee| callee.type_name.as_str())
}

fn qualified_base<'a>(qualifier: &'a str, symbols: &'a SymbolTable) -> &'a str {
    let first = qualifier.split('.').next().unwrap_or(qualifier);
    if first.chars().next().is_some_and(char::is_uppercase) {
        return first;
    }
    symbols
        .lookup(qualifier)
        .map(strip_generics)
        .unwrap_or(qualifier)
}

/// Resolves the callee of `site` made from `caller`. `graph` holds the edges
/// recorded so far and feeds the chained-call fallback.
pub fn resolve_callee(
    site: &CallSite,
    caller: &MethodId,
    symbols: &SymbolTable,
    graph: &CallGraph,
) -> MethodId {
    let member = site.member.as_str();
    match &site.receiver {
        Receiver::Qualified(q) => MethodId::new(qualified_base(q, symbols), member),
        Receiver::Chained(ChainRoot::StringLiteral) => MethodId::new("String", member),
        Receiver::Chained(ChainRoot::ObjectCreation(t) | ChainRoot::ClassLiteral(t)) => {
            MethodId::new(strip_generics(t), member)
        }
        Receiver::Chained(ChainRoot::Other) => match previous_edge_type(graph, caller) {
            Some(t) => MethodId::new(t, member),
            None => MethodId::unresolved(member),
        },
        Receiver::Implicit => MethodId::new(caller.type_name.as_str(), member),
    }
}
