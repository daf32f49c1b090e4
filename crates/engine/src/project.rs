//! One analyzed Java project: the type index, the call graph and its reverse.

use crate::callgraph::CallGraph;
use crate::hydrate::{HydratedChain, MethodCodeCache, MethodSource};
use crate::index::{EntryAnnotations, SourceIndex};
use crate::reverse::ReverseIndex;
use crate::symbols::SymbolTable;
use anyhow::{bail, Result};
use ir::MethodId;
use loader::SourceFile;
use parsers::{ParsedFile, ParserMetrics, UnitCache};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Settings that shape a build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory names excluded anywhere below the root.
    pub exclusions: Vec<String>,
    pub entry_annotations: Vec<String>,
    /// JSON file holding parsed units from previous runs.
    pub unit_cache: Option<PathBuf>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            exclusions: Vec::new(),
            entry_annotations: loader::DEFAULT_ENTRY_ANNOTATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            unit_cache: None,
        }
    }
}

impl BuildOptions {
    pub fn from_rules(rules: &loader::RuleSet) -> Self {
        Self {
            exclusions: rules.path_exclusions.clone(),
            entry_annotations: rules.entry_annotations(),
            unit_cache: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    pub file: String,
    pub error: String,
}

/// Per-file outcome counters of a build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectStats {
    pub total_files: usize,
    pub parsed_files: usize,
    pub skipped_files: usize,
    pub error_files: usize,
    pub excluded_files: usize,
    pub skipped_file_list: Vec<String>,
    pub error_file_list: Vec<FileError>,
    pub parser: ParserMetrics,
    pub elapsed_ms: u128,
}

#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    index: SourceIndex,
    graph: CallGraph,
    reverse: ReverseIndex,
    stats: ProjectStats,
    codes: MethodCodeCache,
}

fn parse_all(files: &[SourceFile], cache: Option<&UnitCache>) -> Vec<anyhow::Result<ParsedFile>> {
    files
        .par_iter()
        .map(|f| parsers::parse_file(&f.path, &f.rel, cache, None))
        .collect()
}

impl Project {
    /// Walks `root`, parses every accepted file in parallel and merges the
    /// units in path order. Files that fail to read or parse are recorded in
    /// the stats and left out.
    pub fn build(root: &Path, opts: &BuildOptions) -> Result<Self> {
        if !root.is_dir() {
            bail!("project path is not a directory: {}", root.display());
        }
        let started = Instant::now();
        let walk = loader::walk_sources(root, &opts.exclusions)?;
        info!(
            root = %root.display(),
            files = walk.files.len(),
            skipped = walk.skipped.len(),
            excluded = walk.excluded.len(),
            "Sources discovered"
        );

        let mut unit_cache = opts.unit_cache.as_deref().map(UnitCache::load);
        let results = parse_all(&walk.files, unit_cache.as_ref());

        let entry = EntryAnnotations::new(&opts.entry_annotations);
        let mut index = SourceIndex::default();
        let mut graph = CallGraph::new();
        let mut stats = ProjectStats {
            total_files: walk.total,
            skipped_files: walk.skipped.len(),
            excluded_files: walk.excluded.len(),
            skipped_file_list: walk.skipped,
            ..ProjectStats::default()
        };
        let mut seen = HashSet::new();

        for (file, result) in walk.files.iter().zip(results) {
            match result {
                Ok(parsed) => {
                    if parsed.from_cache {
                        stats.parser.cache_hits += 1;
                    } else {
                        stats.parser.files_parsed += 1;
                    }
                    let symbols = SymbolTable::from_unit(&parsed.unit);
                    index.add_unit(&parsed.unit, &entry);
                    graph.add_unit(&parsed.unit, &symbols);
                    stats.parsed_files += 1;
                    seen.insert(file.rel.clone());
                    if let (Some(cache), false) = (unit_cache.as_mut(), parsed.from_cache) {
                        cache.insert(file.rel.clone(), parsed.hash, parsed.unit);
                    }
                }
                Err(e) => {
                    warn!(file = %file.rel, error = %e, "Failed to parse file");
                    stats.parser.parse_errors += 1;
                    stats.error_files += 1;
                    stats.error_file_list.push(FileError {
                        file: file.rel.clone(),
                        error: format!("{e:#}"),
                    });
                }
            }
        }

        if let (Some(cache), Some(path)) = (unit_cache.as_mut(), opts.unit_cache.as_deref()) {
            cache.retain_files(&seen);
            if let Err(e) = cache.save(path) {
                warn!(path = %path.display(), error = %e, "Failed to save unit cache");
            }
        }

        let reverse = ReverseIndex::build(&graph);
        stats.elapsed_ms = started.elapsed().as_millis();
        info!(
            types = index.type_count(),
            methods = index.method_count(),
            edges = graph.edge_count(),
            parsed = stats.parsed_files,
            errors = stats.error_files,
            elapsed_ms = stats.elapsed_ms,
            "Call graph built"
        );
        debug!(callees = reverse.len(), "Reverse index built");

        Ok(Self {
            root: root.to_path_buf(),
            index,
            graph,
            reverse,
            stats,
            codes: MethodCodeCache::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index(&self) -> &SourceIndex {
        &self.index
    }

    pub fn graph(&self) -> &CallGraph {
        &self.graph
    }

    pub fn reverse(&self) -> &ReverseIndex {
        &self.reverse
    }

    pub fn stats(&self) -> &ProjectStats {
        &self.stats
    }

    /// Source of one method; missing parts are `None`, never an error.
    pub fn extract_method(&self, id: &MethodId) -> MethodSource {
        self.codes.get_or_extract(&self.root, &self.index, id)
    }

    pub fn hydrate_chain(&self, chain: &[MethodId]) -> HydratedChain {
        HydratedChain {
            chain: chain.iter().map(|id| self.extract_method(id)).collect(),
        }
    }
}
