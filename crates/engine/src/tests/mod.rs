mod index;

use crate::callgraph::CallGraph;
use crate::symbols::SymbolTable;
use ir::{MethodId, SourceUnit};

fn id(s: &str) -> MethodId {
    s.parse().expect("method id")
}

fn unit(code: &str) -> SourceUnit {
    parsers::parse_java(code, "Test.java").expect("parse java snippet")
}

fn graph_of(code: &str) -> CallGraph {
    let unit = unit(code);
    let mut graph = CallGraph::new();
    graph.add_unit(&unit, &SymbolTable::from_unit(&unit));
    graph
}

fn graph(edges: &[(&str, &str)]) -> CallGraph {
    let mut graph = CallGraph::new();
    for (caller, callee) in edges {
        graph.add_edge(id(caller), id(callee));
    }
    graph
}
