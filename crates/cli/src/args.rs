use clap::{Args as ClapArgs, Parser, Subcommand};
use ir::MethodId;
use std::path::PathBuf;

use crate::output::Format;

fn default_threads() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

fn parse_threads(s: &str) -> Result<usize, String> {
    let v: usize = s
        .parse()
        .map_err(|e: std::num::ParseIntError| e.to_string())?;
    if v == 0 {
        Err("threads must be greater than 0".into())
    } else {
        Ok(v)
    }
}

fn parse_depth(s: &str) -> Result<usize, String> {
    let v: usize = s
        .parse()
        .map_err(|e: std::num::ParseIntError| e.to_string())?;
    if v == 0 {
        Err("depth must be at least 1".into())
    } else {
        Ok(v)
    }
}

fn parse_method(s: &str) -> Result<MethodId, String> {
    s.parse()
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "sinktracer - finds call chains from web entry points to dangerous sinks in Java projects",
    long_about = "sinktracer parses every Java file of a project, builds a heuristic call graph over \
Type:method nodes and walks it backward from the sink methods of a rule catalog until it reaches \
annotated entry points (Spring, JAX-RS).

Examples:
  sinktracer scan ./webapp                        # Trace every rule of the catalog
  sinktracer scan ./webapp --rule RCE --hydrate   # Only command execution, with sources
  sinktracer scan ./webapp --format markdown -o report.md
  sinktracer stats ./webapp                       # Graph and file statistics
  sinktracer chain ./webapp UserController:ping UserService:ping",
    subcommand_required = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Trace every sink of the catalog back to entry points
    Scan(ScanArgs),
    /// Build the call graph and print its summary
    Graph(ProjectArgs),
    /// Print graph and file statistics of a project
    #[command(alias = "statistics")]
    Stats(StatsArgs),
    /// List the sink rules of the catalog
    #[command(alias = "rule")]
    Rules(RulesArgs),
    /// Print the source of one method
    Extract(ExtractArgs),
    /// Print the source of every method of a call chain
    Chain(ChainArgs),
}

/// Options shared by every command that analyzes a project.
#[derive(ClapArgs, Debug, Clone)]
pub struct CommonArgs {
    /// Rule catalog (JSON, or YAML by extension)
    #[arg(long)]
    pub rules: Option<PathBuf>,
    /// Maximum caller hops explored backward from a sink
    #[arg(long, value_parser = parse_depth)]
    pub depth: Option<usize>,
    /// Extra directory names to exclude, added to the catalog's exclusions
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,
    /// Number of parallel threads
    #[arg(long, default_value_t = default_threads(), value_parser = parse_threads)]
    pub threads: usize,
    /// Directory to store parsed units between runs
    #[arg(long = "cache-dir")]
    pub cache_dir: Option<PathBuf>,
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
    /// Suppress non-essential output
    #[arg(long)]
    pub quiet: bool,
}

#[derive(ClapArgs)]
pub struct ScanArgs {
    /// Root directory of the Java project
    pub path: PathBuf,
    /// Only trace the named rules (repeatable, comma separated)
    #[arg(long = "rule", value_delimiter = ',')]
    pub rules_filter: Vec<String>,
    /// Attach the source of every chain element
    #[arg(long)]
    pub hydrate: bool,
    /// Output format for the results
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(ClapArgs)]
pub struct ProjectArgs {
    /// Root directory of the Java project
    pub path: PathBuf,
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(ClapArgs)]
pub struct StatsArgs {
    /// Root directory of the Java project
    pub path: PathBuf,
    /// Print the statistics as JSON
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(ClapArgs)]
pub struct RulesArgs {
    /// Only show the rule with this name
    #[arg(long = "rule")]
    pub rule: Option<String>,
    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(ClapArgs)]
pub struct ExtractArgs {
    /// Root directory of the Java project
    pub path: PathBuf,
    /// Simple name of the declaring type
    pub type_name: String,
    /// Method name
    pub method: String,
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(ClapArgs)]
pub struct ChainArgs {
    /// Root directory of the Java project
    pub path: PathBuf,
    /// Chain elements as Type:method, entry point first
    #[arg(required = true, value_parser = parse_method)]
    pub chain: Vec<MethodId>,
    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
