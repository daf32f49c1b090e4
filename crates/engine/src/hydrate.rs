//! Source text of methods, looked up through the type index and cut out of
//! the defining file by brace counting.

use crate::cache::{read_lock, write_lock};
use crate::index::SourceIndex;
use ir::MethodId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSource {
    pub function: MethodId,
    /// Defining file relative to the project root.
    pub file_path: Option<String>,
    /// 1-based line where the declaration starts.
    pub line: Option<usize>,
    pub code: Option<String>,
}

impl MethodSource {
    fn missing(function: MethodId, file_path: Option<String>) -> Self {
        Self {
            function,
            file_path,
            line: None,
            code: None,
        }
    }

    pub fn found(&self) -> bool {
        self.code.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydratedChain {
    pub chain: Vec<MethodSource>,
}

/// Per-project memo of extracted method sources.
#[derive(Debug, Default)]
pub struct MethodCodeCache {
    entries: RwLock<HashMap<MethodId, MethodSource>>,
}

impl MethodCodeCache {
    pub fn get_or_extract(&self, root: &Path, index: &SourceIndex, id: &MethodId) -> MethodSource {
        if let Some(hit) = read_lock(&self.entries).get(id) {
            return hit.clone();
        }
        let source = extract(root, index, id);
        write_lock(&self.entries).insert(id.clone(), source.clone());
        source
    }

    pub fn len(&self) -> usize {
        read_lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        write_lock(&self.entries).clear();
    }
}

fn extract(root: &Path, index: &SourceIndex, id: &MethodId) -> MethodSource {
    let Some(file) = index.file_of(&id.type_name) else {
        debug!(method = %id, "Type not indexed");
        return MethodSource::missing(id.clone(), None);
    };
    let path = root.join(file);
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            warn!(file = %path.display(), error = %e, "Failed to read source");
            return MethodSource::missing(id.clone(), Some(file.to_string()));
        }
    };
    let start = match parsers::locate_method(&content, &id.type_name, &id.method) {
        Ok(Some(line)) => line,
        Ok(None) => {
            debug!(method = %id, file = %file, "Method not declared in file");
            return MethodSource::missing(id.clone(), Some(file.to_string()));
        }
        Err(e) => {
            warn!(file = %file, error = %e, "Failed to parse source");
            return MethodSource::missing(id.clone(), Some(file.to_string()));
        }
    };
    MethodSource {
        function: id.clone(),
        file_path: Some(file.to_string()),
        line: Some(start + 1),
        code: parsers::slice::extract_code_block(&content, start),
    }
}
