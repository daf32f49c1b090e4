//! Reduced syntax view of one Java compilation unit.
//!
//! The parser flattens the tree into three lists. Order matters:
//! `bindings` and `calls` are stored in visit order, which the call graph
//! builder relies on (last binding wins, previous-edge fallback).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceUnit {
    pub file_path: String,
    /// Every type declared in the file, nested ones included.
    pub types: Vec<TypeDecl>,
    /// Local variables, fields and method parameters with their declared type.
    pub bindings: Vec<Binding>,
    /// Method invocations in visit order: the calls of a receiver chain
    /// first, then the calls inside their arguments.
    pub calls: Vec<CallSite>,
}

impl SourceUnit {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    pub fn method_count(&self) -> usize {
        self.types.iter().map(|t| t.methods.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    /// 1-based line of the declaration.
    pub line: usize,
    /// Methods declared directly in the body. Constructors are not methods.
    pub methods: Vec<MethodDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub parameters: Vec<Param>,
    /// Annotation names as written, without the leading `@`.
    pub annotations: Vec<String>,
    /// 1-based line where the declaration starts, modifiers included.
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingOrigin {
    Local,
    Field,
    Parameter,
}

/// A declared name and its type as written (array dimensions dropped).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Binding {
    pub name: String,
    pub type_name: String,
    pub origin: BindingOrigin,
}

/// Shape of the expression a method is invoked on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Receiver {
    /// `foo()`: no receiver at all.
    Implicit,
    /// `repo.find()`, `System.out.println()`: a name or dotted name path.
    Qualified(String),
    /// `a.b().c()`, `"x".trim()`: the receiver is itself an expression.
    Chained(ChainRoot),
}

/// Where a chained receiver expression starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "type")]
pub enum ChainRoot {
    StringLiteral,
    ObjectCreation(String),
    ClassLiteral(String),
    Other,
}

/// Enclosing declaration of a call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum Scope {
    Method(String),
    Type(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSite {
    pub member: String,
    pub receiver: Receiver,
    /// Enclosing declarations, nearest first.
    pub scopes: Vec<Scope>,
    /// 1-based line of the invocation.
    pub line: usize,
}

impl CallSite {
    /// Name of the nearest enclosing method.
    pub fn enclosing_method(&self) -> Option<&str> {
        self.scopes.iter().find_map(|s| match s {
            Scope::Method(name) => Some(name.as_str()),
            Scope::Type(_) => None,
        })
    }

    /// Name of the nearest enclosing type declaration.
    pub fn enclosing_type(&self) -> Option<&str> {
        self.scopes.iter().find_map(|s| match s {
            Scope::Type(name) => Some(name.as_str()),
            Scope::Method(_) => None,
        })
    }
}
