//! Project commands: session setup shared by every command, then `scan`,
//! `graph`, `stats`, `extract` and `chain`.

use anyhow::{Context, Result};
use engine::Session;
use loader::RuleSet;
use reporters::ScanInfo;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info};

use crate::args::{ChainArgs, CommonArgs, ExtractArgs, ProjectArgs, ScanArgs, StatsArgs};
use crate::config::{load_config, Config};
use crate::output::{print_json, write_vulnerabilities, Format};
use crate::ui;

pub fn init_logging(common: &CommonArgs) {
    let level = if common.quiet {
        LevelFilter::OFF
    } else if common.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    if common.debug && !common.quiet {
        debug!("Debug mode enabled");
    }
}

/// Catalog named on the command line, else the configured one, with the
/// extra exclusions appended.
pub fn load_catalog(common: &CommonArgs, cfg: &Config) -> Result<RuleSet> {
    let path = common.rules.clone().unwrap_or_else(|| cfg.catalog_path());
    let mut rules = loader::load_rules(&path)?;
    for dir in &common.exclude {
        if !rules.path_exclusions.contains(dir) {
            rules.path_exclusions.push(dir.clone());
        }
    }
    Ok(rules)
}

/// Logging, thread pool, configuration and catalog, in that order.
pub fn open_session(common: &CommonArgs) -> Result<Session> {
    init_logging(common);
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(common.threads)
        .build_global()
    {
        error!("Failed to build global thread pool: {e}");
    }
    let cfg = load_config().context("failed to load configuration")?;
    let rules = load_catalog(common, &cfg)?;
    let mut session = Session::new(rules);
    if let Some(depth) = common.depth {
        session = session.with_max_depth(depth);
    }
    if let Some(dir) = common.cache_dir.clone().or(cfg.cache.cache_dir) {
        debug!(dir = %dir.display(), "Unit cache enabled");
        session = session.with_unit_cache_dir(dir);
    }
    Ok(session)
}

fn project_root(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("project path not found: {}", path.display()))
}

fn display_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

pub fn run_scan(args: ScanArgs) -> Result<()> {
    let session = open_session(&args.common)?;
    let root = project_root(&args.path)?;
    if args.format == Format::Text && !args.common.quiet {
        ui::print_header();
    }
    info!(target = %root.display(), "Scan started");
    let started = Instant::now();

    let response = session.scan(&root, &args.rules_filter, args.hydrate)?;
    let project = session.project(&root)?;
    let stats = project.stats();
    let scan_info = ScanInfo {
        project: display_name(&root),
        rules_loaded: session.rules().filtered(&args.rules_filter).len(),
        depth: session.list_rules(None).depth,
        files_analyzed: stats.parsed_files,
        failed_files: stats.error_files,
        skipped_files: stats.skipped_files,
        call_edges: project.graph().edge_count(),
        entry_points: project.index().entry_point_count(),
        duration_ms: started.elapsed().as_millis() as u64,
    };
    write_vulnerabilities(
        &response.vulnerabilities,
        args.format,
        &scan_info,
        args.output.as_deref(),
    )?;
    info!(
        vulnerabilities = response.total_vulnerabilities,
        chains = response.total_chains,
        "Scan completed"
    );
    if let Some(path) = &args.output {
        info!(file = %path.display(), "Report written");
    }
    Ok(())
}

pub fn run_graph(args: ProjectArgs) -> Result<()> {
    let session = open_session(&args.common)?;
    let root = project_root(&args.path)?;
    let summary = session.build_graph(&root)?;
    print_json(&summary)
}

pub fn run_stats(args: StatsArgs) -> Result<()> {
    let session = open_session(&args.common)?;
    let root = project_root(&args.path)?;
    let stats = session.get_statistics(&root)?;
    if args.json {
        print_json(&stats)
    } else {
        ui::print_statistics(&root.display().to_string(), &stats);
        Ok(())
    }
}

pub fn run_extract(args: ExtractArgs) -> Result<()> {
    let session = open_session(&args.common)?;
    let root = project_root(&args.path)?;
    let source = session.extract_method(&root, &args.type_name, &args.method)?;
    if !source.found() {
        info!(method = %source.function, "Method source not found");
    }
    ui::print_method(&source);
    Ok(())
}

pub fn run_chain(args: ChainArgs) -> Result<()> {
    let session = open_session(&args.common)?;
    let root = project_root(&args.path)?;
    let hydrated = session.hydrate_chain(&root, &args.chain)?;
    print_json(&hydrated)
}
