//! Runs every sink of the catalog through the tracer and groups the chains
//! per sink.

use crate::hydrate::HydratedChain;
use crate::project::Project;
use crate::tracer::{trace_back, TaintChain};
use ir::MethodId;
use loader::{RuleSet, Severity, SinkRule};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Chains reaching one sink method, with the metadata of the rule that
/// listed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vulnerability {
    pub vul_type: String,
    pub sink_desc: String,
    pub severity: Severity,
    pub sink: MethodId,
    pub call_chains: Vec<TaintChain>,
    pub chain_count: usize,
    /// Source of every chain element, parallel to `call_chains`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hydrated_chains: Option<Vec<HydratedChain>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Overrides the catalog depth when set.
    pub max_depth: Option<usize>,
    pub hydrate: bool,
}

struct SinkJob<'r> {
    rule: &'r SinkRule,
    sink: MethodId,
}

fn jobs<'r>(rules: &[&'r SinkRule]) -> Vec<SinkJob<'r>> {
    rules
        .iter()
        .flat_map(|&rule| {
            rule.sinks
                .iter()
                .flat_map(|spec| spec.method_ids())
                .map(move |sink| SinkJob { rule, sink })
        })
        .collect()
}

/// Traces every sink of the rules named in `filter` (all rules when empty).
/// Results follow catalog order: rule, then specifier, then method.
pub fn find_vulnerabilities(
    project: &Project,
    rules: &RuleSet,
    filter: &[String],
    opts: ScanOptions,
) -> Vec<Vulnerability> {
    let depth = opts.max_depth.unwrap_or(rules.depth);
    let selected = rules.filtered(filter);
    let jobs = jobs(&selected);
    debug!(rules = selected.len(), sinks = jobs.len(), depth, "Tracing sinks");

    let mut found: Vec<Vulnerability> = jobs
        .par_iter()
        .filter_map(|job| {
            let chains = trace_back(project.reverse(), project.index(), &job.sink, depth);
            if chains.is_empty() {
                return None;
            }
            Some(Vulnerability {
                vul_type: job.rule.sink_name.clone(),
                sink_desc: job.rule.sink_desc.clone(),
                severity: job.rule.severity_level,
                sink: job.sink.clone(),
                chain_count: chains.len(),
                call_chains: chains,
                hydrated_chains: None,
            })
        })
        .collect();

    if opts.hydrate {
        hydrate_vulnerabilities(project, &mut found);
    }
    info!(
        vulnerabilities = found.len(),
        chains = total_chains(&found),
        "Scan finished"
    );
    found
}

/// Attaches method sources to every chain.
pub fn hydrate_vulnerabilities(project: &Project, found: &mut [Vulnerability]) {
    found.par_iter_mut().for_each(|v| {
        let hydrated = v
            .call_chains
            .iter()
            .map(|c| project.hydrate_chain(&c.0))
            .collect();
        v.hydrated_chains = Some(hydrated);
    });
}

pub fn total_chains(found: &[Vulnerability]) -> usize {
    found.iter().map(|v| v.chain_count).sum()
}
