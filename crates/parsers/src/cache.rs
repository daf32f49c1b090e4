//! On-disk cache of parsed units keyed by file path and content hash.

use anyhow::{Context, Result};
use ir::SourceUnit;
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct CachedUnit {
    hash: String,
    unit: SourceUnit,
}

#[derive(Default, Serialize, Deserialize)]
pub struct UnitCache {
    files: HashMap<String, CachedUnit>,
}

pub fn content_hash(content: &str) -> String {
    blake3::hash(content.as_bytes()).to_hex().to_string()
}

impl UnitCache {
    /// Loads the cache, starting empty when the file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let cache: Self = fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();
        debug!(path = %path.display(), entries = cache.files.len(), "Unit cache loaded");
        cache
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create cache directory {}", dir.display()))?;
        }
        let data = serde_json::to_string(self).context("serialize unit cache")?;
        fs::write(path, data).with_context(|| format!("write unit cache {}", path.display()))
    }

    /// Cached unit for `file` when its content hash still matches.
    pub fn get(&self, file: &str, hash: &str) -> Option<&SourceUnit> {
        self.files
            .get(file)
            .filter(|c| c.hash == hash)
            .map(|c| &c.unit)
    }

    pub fn insert(&mut self, file: impl Into<String>, hash: impl Into<String>, unit: SourceUnit) {
        self.files.insert(
            file.into(),
            CachedUnit {
                hash: hash.into(),
                unit,
            },
        );
    }

    /// Drops entries for files that no longer exist in the project.
    pub fn retain_files(&mut self, seen: &HashSet<String>) {
        self.files.retain(|k, _| seen.contains(k));
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
