//! Analysis engine of **sinktracer**.
//!
//! Builds a call graph over `Type:method` nodes from parsed Java units,
//! inverts it, and walks backward from catalog sinks to annotated entry
//! points. [`session::Session`] is the query surface used by the CLI.

pub mod cache;
pub mod callgraph;
pub mod hydrate;
pub mod index;
pub mod project;
pub mod reverse;
pub mod scan;
pub mod session;
pub mod symbols;
pub mod tracer;

pub use cache::{AnalyzerCache, ProjectKey};
pub use callgraph::{caller_of, previous_edge_type, resolve_callee, CallGraph};
pub use hydrate::{HydratedChain, MethodCodeCache, MethodSource};
pub use index::{EntryAnnotations, MethodInfo, SourceIndex, TypeRecord};
pub use loader::{RuleSet, Severity, SinkRule};
pub use project::{BuildOptions, FileError, Project, ProjectStats};
pub use reverse::ReverseIndex;
pub use scan::{find_vulnerabilities, ScanOptions, Vulnerability};
pub use session::{BuildSummary, FindResponse, ProjectStatistics, RuleListing, Session};
pub use symbols::SymbolTable;
pub use tracer::{trace_back, MethodOracle, TaintChain};

#[cfg(test)]
mod tests;
