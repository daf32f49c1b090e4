//! Shared types for **sinktracer**.
//!
//! [`MethodId`] is the node identity of the call graph. The [`unit`] module
//! holds the reduced view of a parsed Java file that the parser produces and
//! the engine consumes: declared types, variable declarations and call sites,
//! each carrying just enough syntactic context to resolve call targets
//! without the full tree.

pub mod method;
pub mod unit;

pub use method::{MethodId, UNKNOWN, UNRESOLVED_TYPE};
pub use unit::{
    Binding, BindingOrigin, CallSite, ChainRoot, MethodDecl, Param, Receiver, Scope, SourceUnit,
    TypeDecl, TypeKind,
};

/// Cuts a declared type at its generic argument list: `Map<K, V>` → `Map`.
///
/// # Example
/// ```
/// assert_eq!(ir::strip_generics("List<String>"), "List");
/// assert_eq!(ir::strip_generics("Runtime"), "Runtime");
/// ```
pub fn strip_generics(type_name: &str) -> &str {
    type_name
        .split_once('<')
        .map_or(type_name, |(base, _)| base)
        .trim()
}
