use ir::SourceUnit;
use std::collections::HashMap;

/// Variable, field and parameter names of one unit mapped to their declared
/// type. The namespace is flat: scoping is ignored and the last declaration
/// of a name wins.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    types: HashMap<String, String>,
}

impl SymbolTable {
    pub fn from_unit(unit: &SourceUnit) -> Self {
        let mut types = HashMap::with_capacity(unit.bindings.len());
        for binding in &unit.bindings {
            types.insert(binding.name.clone(), binding.type_name.clone());
        }
        Self { types }
    }

    /// Declared type as written, generic arguments included.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.types.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
