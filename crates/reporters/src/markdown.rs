//! Markdown audit report: one chapter per traced sink, one section per chain.

use crate::ScanInfo;
use engine::scan::total_chains;
use engine::{HydratedChain, Vulnerability};
use std::fmt::Write;

fn write_code(md: &mut String, hydrated: &HydratedChain) {
    md.push_str("**Source**\n\n```java\n");
    for source in &hydrated.chain {
        let _ = writeln!(md, "// {}", source.function);
        match &source.code {
            Some(code) => {
                md.push_str(code.trim_end());
                md.push_str("\n\n");
            }
            None => md.push_str("// source not available\n\n"),
        }
    }
    md.push_str("```\n\n");
}

/// Renders `found` as a Markdown report. `info` supplies the project header.
pub fn to_markdown(found: &[Vulnerability], info: Option<&ScanInfo>) -> String {
    let mut md = String::from("# sinktracer report\n\n");
    if let Some(info) = info {
        let _ = writeln!(md, "- Project: **{}**", info.project);
        let _ = writeln!(md, "- Rules: {} (depth {})", info.rules_loaded, info.depth);
    }
    let _ = writeln!(
        md,
        "- Taint chains: **{}** across {} sink(s)\n",
        total_chains(found),
        found.len()
    );

    let mut num = 1;
    for v in found {
        let _ = writeln!(md, "# {} ({} chain(s))\n", v.vul_type, v.call_chains.len());
        let _ = writeln!(md, "Every call chain reaching the sink **`{}`**.\n", v.sink);
        for (i, chain) in v.call_chains.iter().enumerate() {
            let _ = writeln!(md, "## Chain {num}\n");
            md.push_str("**Details**\n\n");
            let desc = if v.sink_desc.is_empty() { "-" } else { v.sink_desc.as_str() };
            let _ = writeln!(md, "- Description: {desc}");
            let _ = writeln!(md, "- Severity: **{}**", v.severity);
            let _ = writeln!(md, "- Sink: **`{}`**\n", v.sink);
            md.push_str("**Call chain**\n\n");
            for id in chain.iter() {
                let _ = writeln!(md, "- `{id}`");
            }
            md.push('\n');
            if let Some(hydrated) = v.hydrated_chains.as_ref().and_then(|h| h.get(i)) {
                write_code(&mut md, hydrated);
            }
            num += 1;
        }
    }
    md
}
