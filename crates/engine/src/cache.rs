//! Built projects kept for reuse across queries.

use crate::project::Project;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

/// Absolute project path with `/` separators; falls back to joining the
/// current directory when the path cannot be canonicalized.
pub fn normalize_root(root: &Path) -> PathBuf {
    let abs = root.canonicalize().unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|cwd| cwd.join(root))
            .unwrap_or_else(|_| root.to_path_buf())
    });
    PathBuf::from(abs.to_string_lossy().replace('\\', "/"))
}

/// Identity of a built project: where it lives and the settings that shaped
/// the build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectKey {
    pub root: PathBuf,
    pub exclusions: Vec<String>,
    pub entry_annotations: Vec<String>,
}

impl ProjectKey {
    pub fn new(root: &Path, exclusions: &[String], entry_annotations: &[String]) -> Self {
        let mut exclusions = exclusions.to_vec();
        exclusions.sort();
        exclusions.dedup();
        let mut entry_annotations = entry_annotations.to_vec();
        entry_annotations.sort();
        entry_annotations.dedup();
        Self {
            root: normalize_root(root),
            exclusions,
            entry_annotations,
        }
    }
}

#[derive(Debug, Default)]
pub struct AnalyzerCache {
    projects: RwLock<HashMap<ProjectKey, Arc<Project>>>,
}

impl AnalyzerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ProjectKey) -> Option<Arc<Project>> {
        let hit = read_lock(&self.projects).get(key).cloned();
        debug!(root = %key.root.display(), hit = hit.is_some(), "Analyzer cache lookup");
        hit
    }

    pub fn insert(&self, key: ProjectKey, project: Arc<Project>) {
        write_lock(&self.projects).insert(key, project);
    }

    /// Returns the cached project or builds and stores it. Concurrent misses
    /// for the same key may build twice; the last insert wins.
    pub fn get_or_try_insert<F>(&self, key: ProjectKey, build: F) -> anyhow::Result<Arc<Project>>
    where
        F: FnOnce() -> anyhow::Result<Project>,
    {
        if let Some(project) = self.get(&key) {
            return Ok(project);
        }
        let project = Arc::new(build()?);
        self.insert(key, Arc::clone(&project));
        Ok(project)
    }

    pub fn invalidate(&self, key: &ProjectKey) -> bool {
        write_lock(&self.projects).remove(key).is_some()
    }

    pub fn clear(&self) {
        write_lock(&self.projects).clear();
    }

    pub fn len(&self) -> usize {
        read_lock(&self.projects).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
