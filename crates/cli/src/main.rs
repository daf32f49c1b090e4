//! Entry point for the command-line interface.

use sinktracer::args::{parse_cli, Commands};
use sinktracer::rules::list_rules;
use sinktracer::scan::{run_chain, run_extract, run_graph, run_scan, run_stats};

fn main() -> anyhow::Result<()> {
    let cli = parse_cli();
    match cli.command {
        Commands::Scan(args) => run_scan(args),
        Commands::Graph(args) => run_graph(args),
        Commands::Stats(args) => run_stats(args),
        Commands::Rules(args) => list_rules(args),
        Commands::Extract(args) => run_extract(args),
        Commands::Chain(args) => run_chain(args),
    }
}
