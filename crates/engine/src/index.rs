//! Declared types of the project and the two per-method facts the tracer
//! needs: whether a method takes parameters and whether it is an entry point.

use ir::{MethodId, SourceUnit, TypeKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub has_parameters: bool,
    pub is_entry_point: bool,
}

impl MethodInfo {
    /// Answer for methods the index has never seen: assume parameters,
    /// never an entry point.
    pub const UNKNOWN: MethodInfo = MethodInfo {
        has_parameters: true,
        is_entry_point: false,
    };
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRecord {
    /// Defining file, relative to the project root.
    pub file: String,
    pub kind: TypeKind,
    pub methods: BTreeMap<String, MethodInfo>,
}

/// Annotation names that mark externally reachable methods.
///
/// Names are compared by their last dotted segment, so
/// `org.springframework.web.bind.annotation.GetMapping` matches `GetMapping`.
#[derive(Debug, Clone)]
pub struct EntryAnnotations {
    names: HashSet<String>,
}

impl EntryAnnotations {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| last_segment(n.as_ref()).to_string())
                .collect(),
        }
    }

    pub fn matches(&self, annotation: &str) -> bool {
        self.names.contains(last_segment(annotation))
    }
}

impl Default for EntryAnnotations {
    fn default() -> Self {
        Self::new(loader::DEFAULT_ENTRY_ANNOTATIONS.iter().copied())
    }
}

fn last_segment(name: &str) -> &str {
    let name = name.trim().trim_start_matches('@');
    name.rsplit('.').next().unwrap_or(name)
}

/// Simple type name → [`TypeRecord`]. A later declaration of the same simple
/// name replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct SourceIndex {
    types: HashMap<String, TypeRecord>,
    /// Type names in the order they were first seen.
    order: Vec<String>,
}

impl SourceIndex {
    pub fn add_unit(&mut self, unit: &SourceUnit, entry: &EntryAnnotations) {
        for decl in &unit.types {
            let methods = decl
                .methods
                .iter()
                .map(|m| {
                    let info = MethodInfo {
                        has_parameters: !m.parameters.is_empty(),
                        is_entry_point: m.annotations.iter().any(|a| entry.matches(a)),
                    };
                    (m.name.clone(), info)
                })
                .collect();
            let record = TypeRecord {
                file: unit.file_path.clone(),
                kind: decl.kind,
                methods,
            };
            if let Some(previous) = self.types.insert(decl.name.clone(), record) {
                debug!(
                    type_name = %decl.name,
                    previous = %previous.file,
                    file = %unit.file_path,
                    "Type redeclared, keeping the latest"
                );
            } else {
                self.order.push(decl.name.clone());
            }
        }
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeRecord> {
        self.types.get(type_name)
    }

    pub fn method_info(&self, id: &MethodId) -> MethodInfo {
        self.types
            .get(&id.type_name)
            .and_then(|t| t.methods.get(&id.method))
            .copied()
            .unwrap_or(MethodInfo::UNKNOWN)
    }

    pub fn file_of(&self, type_name: &str) -> Option<&str> {
        self.types.get(type_name).map(|t| t.file.as_str())
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn method_count(&self) -> usize {
        self.types.values().map(|t| t.methods.len()).sum()
    }

    pub fn entry_point_count(&self) -> usize {
        self.types
            .values()
            .flat_map(|t| t.methods.values())
            .filter(|m| m.is_entry_point)
            .count()
    }

    /// Type names in first-seen order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Every entry-point method, sorted.
    pub fn entry_points(&self) -> Vec<MethodId> {
        let mut out: Vec<MethodId> = self
            .types
            .iter()
            .flat_map(|(t, rec)| {
                rec.methods
                    .iter()
                    .filter(|(_, info)| info.is_entry_point)
                    .map(move |(m, _)| MethodId::new(t.as_str(), m.as_str()))
            })
            .collect();
        out.sort();
        out
    }
}
