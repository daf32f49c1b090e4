//! Long-lived query surface over built projects.
//!
//! A [`Session`] owns one rule catalog and an [`AnalyzerCache`]; every query
//! names a project directory, which is built on first use and reused until
//! [`Session::build_graph`] rebuilds it.

use crate::cache::{AnalyzerCache, ProjectKey};
use crate::hydrate::{HydratedChain, MethodSource};
use crate::project::{BuildOptions, FileError, Project};
use crate::scan::{self, ScanOptions, Vulnerability};
use anyhow::Result;
use ir::MethodId;
use loader::{RuleSet, SinkRule};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Number of type names listed by [`Session::get_statistics`].
pub const LISTED_CLASSES: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub total_classes: usize,
    pub total_methods: usize,
    pub total_call_edges: usize,
    pub caller_nodes: usize,
    pub total_files: usize,
    pub parsed_files: usize,
    pub skipped_files: usize,
    pub error_files: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FindResponse {
    pub total_vulnerabilities: usize,
    pub total_chains: usize,
    pub vulnerabilities: Vec<Vulnerability>,
}

impl FindResponse {
    pub fn new(vulnerabilities: Vec<Vulnerability>) -> Self {
        Self {
            total_vulnerabilities: vulnerabilities.len(),
            total_chains: scan::total_chains(&vulnerabilities),
            vulnerabilities,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleListing {
    pub total_rules: usize,
    pub depth: usize,
    pub rules: Vec<SinkRule>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectStatistics {
    pub total_classes: usize,
    pub total_methods: usize,
    pub total_call_edges: usize,
    pub unresolved_edges: usize,
    pub entry_points: usize,
    pub total_files: usize,
    pub parsed_files: usize,
    pub skipped_files: usize,
    pub excluded_files: usize,
    pub error_files: usize,
    pub errors: Vec<FileError>,
    /// First type names in discovery order.
    pub classes_with_methods: Vec<String>,
}

pub struct Session {
    rules: RuleSet,
    analyzers: AnalyzerCache,
    unit_cache_dir: Option<PathBuf>,
    max_depth: Option<usize>,
}

impl Session {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            analyzers: AnalyzerCache::new(),
            unit_cache_dir: None,
            max_depth: None,
        }
    }

    /// Persists parsed units below `dir`, one cache file per project.
    pub fn with_unit_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.unit_cache_dir = Some(dir.into());
        self
    }

    /// Overrides the catalog depth for every trace of this session.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    fn key(&self, root: &Path) -> ProjectKey {
        let opts = BuildOptions::from_rules(&self.rules);
        ProjectKey::new(root, &opts.exclusions, &opts.entry_annotations)
    }

    fn build_options(&self, key: &ProjectKey) -> BuildOptions {
        let mut opts = BuildOptions::from_rules(&self.rules);
        opts.unit_cache = self.unit_cache_dir.as_ref().map(|dir| {
            let id = blake3::hash(key.root.to_string_lossy().as_bytes()).to_hex();
            dir.join(format!("units-{}.json", &id[..16]))
        });
        opts
    }

    /// Cached project for `root`, built on first request.
    pub fn project(&self, root: &Path) -> Result<Arc<Project>> {
        let key = self.key(root);
        let opts = self.build_options(&key);
        let root = key.root.clone();
        self.analyzers
            .get_or_try_insert(key, || Project::build(&root, &opts))
    }

    /// Builds `root` from scratch, replacing any cached build.
    pub fn build_graph(&self, root: &Path) -> Result<BuildSummary> {
        let key = self.key(root);
        let opts = self.build_options(&key);
        let project = Arc::new(Project::build(&key.root, &opts)?);
        self.analyzers.insert(key, Arc::clone(&project));
        let stats = project.stats();
        Ok(BuildSummary {
            total_classes: project.index().type_count(),
            total_methods: project.index().method_count(),
            total_call_edges: project.graph().edge_count(),
            caller_nodes: project.graph().caller_count(),
            total_files: stats.total_files,
            parsed_files: stats.parsed_files,
            skipped_files: stats.skipped_files,
            error_files: stats.error_files,
        })
    }

    /// Chains for every sink of the selected rules, without source text.
    pub fn find_vulnerabilities(&self, root: &Path, rule_filter: &[String]) -> Result<FindResponse> {
        self.scan(root, rule_filter, false)
    }

    /// Like [`Session::find_vulnerabilities`], optionally attaching the
    /// source of every chain element.
    pub fn scan(&self, root: &Path, rule_filter: &[String], hydrate: bool) -> Result<FindResponse> {
        let project = self.project(root)?;
        let opts = ScanOptions {
            max_depth: self.max_depth,
            hydrate,
        };
        let found = scan::find_vulnerabilities(&project, &self.rules, rule_filter, opts);
        info!(
            root = %project.root().display(),
            vulnerabilities = found.len(),
            "Vulnerabilities listed"
        );
        Ok(FindResponse::new(found))
    }

    pub fn hydrate_chain(&self, root: &Path, chain: &[MethodId]) -> Result<HydratedChain> {
        let project = self.project(root)?;
        Ok(project.hydrate_chain(chain))
    }

    pub fn extract_method(&self, root: &Path, type_name: &str, method: &str) -> Result<MethodSource> {
        let project = self.project(root)?;
        Ok(project.extract_method(&MethodId::new(type_name, method)))
    }

    /// Rules of the catalog, optionally narrowed to one `sink_name`.
    pub fn list_rules(&self, rule_filter: Option<&str>) -> RuleListing {
        let rules: Vec<SinkRule> = self
            .rules
            .sink_rules
            .iter()
            .filter(|r| rule_filter.map_or(true, |name| r.sink_name == name))
            .cloned()
            .collect();
        RuleListing {
            total_rules: rules.len(),
            depth: self.max_depth.unwrap_or(self.rules.depth),
            rules,
        }
    }

    pub fn get_statistics(&self, root: &Path) -> Result<ProjectStatistics> {
        let project = self.project(root)?;
        let index = project.index();
        let stats = project.stats();
        Ok(ProjectStatistics {
            total_classes: index.type_count(),
            total_methods: index.method_count(),
            total_call_edges: project.graph().edge_count(),
            unresolved_edges: project.graph().unresolved_edge_count(),
            entry_points: index.entry_point_count(),
            total_files: stats.total_files,
            parsed_files: stats.parsed_files,
            skipped_files: stats.skipped_files,
            excluded_files: stats.excluded_files,
            error_files: stats.error_files,
            errors: stats.error_file_list.clone(),
            classes_with_methods: index
                .type_names()
                .take(LISTED_CLASSES)
                .map(str::to_string)
                .collect(),
        })
    }

    /// Drops the cached build of `root`.
    pub fn invalidate(&self, root: &Path) -> bool {
        self.analyzers.invalidate(&self.key(root))
    }
}
