//! Formatters for traced vulnerabilities in text, JSON and Markdown.

use engine::scan::total_chains;
use engine::Vulnerability;
use loader::Severity;
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

mod markdown;

pub use markdown::to_markdown;

/// Returns the severity colored with simple ANSI codes.
fn color_severity(sev: Severity) -> String {
    let code = match sev {
        Severity::Info | Severity::Low => "\x1b[32m",
        Severity::Medium => "\x1b[33m",
        Severity::High => "\x1b[31m",
        Severity::Critical => "\x1b[1;31m",
    };
    format!("{code}{sev}\x1b[0m")
}

fn simple_box(title: &str) -> String {
    let width = title.chars().count() + 2;
    format!(
        "╭{}╮\n│ {} │\n╰{}╯\n",
        "─".repeat(width),
        title,
        "─".repeat(width)
    )
}

const RULE: &str =
    "    ──────────────────────────────────────────────────────────────────────────────\n";

fn summary_stats(info: &ScanInfo) -> String {
    let mut output = simple_box("Analysis Status");
    output.push('\n');
    output.push_str(&format!(
        "    Tracing {} with {} rules at depth {}:\n\n",
        info.project, info.rules_loaded, info.depth
    ));

    output.push_str("    SOURCES\n");
    output.push_str(RULE);
    output.push_str(&format!("    Parsed files              {}\n", info.files_analyzed));
    output.push_str(&format!("    Failed files              {}\n", info.failed_files));
    output.push_str(&format!("    Skipped files             {}\n", info.skipped_files));
    output.push('\n');

    output.push_str("    GRAPH\n");
    output.push_str(RULE);
    output.push_str(&format!("    Call edges                {}\n", info.call_edges));
    output.push_str(&format!("    Entry points              {}\n", info.entry_points));
    output.push_str(&format!("    Duration                  {}ms\n", info.duration_ms));
    output
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Supported report formats.
pub enum Format {
    /// Human-readable output with ANSI colors.
    Text,
    /// `{vulnerabilities, total_vulnerabilities, total_chains}`.
    Json,
    /// One chapter per sink, with method sources when chains are hydrated.
    Markdown,
}

#[derive(Serialize)]
struct ReportOut<'a> {
    vulnerabilities: &'a [Vulnerability],
    total_vulnerabilities: usize,
    total_chains: usize,
}

/// Build and run figures shown above the results.
#[derive(Debug, Clone, Default)]
pub struct ScanInfo {
    /// Display name of the scanned project.
    pub project: String,
    pub rules_loaded: usize,
    pub depth: usize,
    pub files_analyzed: usize,
    pub failed_files: usize,
    pub skipped_files: usize,
    pub call_edges: usize,
    pub entry_points: usize,
    pub duration_ms: u64,
}

/// Prints the report on stdout.
///
/// # Example
/// ```
/// use reporters::{print_report, Format, ScanInfo};
/// let info = ScanInfo {
///     project: "demo".into(),
///     rules_loaded: 3,
///     depth: 8,
///     ..ScanInfo::default()
/// };
/// print_report(&[], Format::Text, Some(&info)).unwrap();
/// ```
pub fn print_report(
    found: &[Vulnerability],
    fmt: Format,
    scan_info: Option<&ScanInfo>,
) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_report(&mut out, found, fmt, scan_info)
}

fn write_text<W: Write>(out: &mut W, found: &[Vulnerability]) -> io::Result<()> {
    writeln!(out, "{}", simple_box("Results"))?;
    if found.is_empty() {
        writeln!(out, "✔ No taint chains found.")?;
        return Ok(());
    }
    let chains = total_chains(found);
    writeln!(
        out,
        "⚠ Found {chains} chain(s) into {} sink(s):\n",
        found.len()
    )?;
    for v in found {
        writeln!(
            out,
            "{} {} {} ({} chain(s))",
            color_severity(v.severity),
            v.vul_type,
            v.sink,
            v.chain_count
        )?;
        if !v.sink_desc.is_empty() {
            writeln!(out, "    {}", v.sink_desc)?;
        }
        for (i, chain) in v.call_chains.iter().enumerate() {
            writeln!(out, "    ↳  {chain}")?;
            let Some(hydrated) = v.hydrated_chains.as_ref().and_then(|h| h.get(i)) else {
                continue;
            };
            for source in &hydrated.chain {
                match (&source.file_path, source.line) {
                    (Some(file), Some(line)) => {
                        writeln!(out, "       • {} {file}:{line}", source.function)?
                    }
                    (Some(file), None) => writeln!(out, "       • {} {file}", source.function)?,
                    _ => writeln!(out, "       • {} (no source)", source.function)?,
                }
            }
        }
        writeln!(out)?;
    }
    writeln!(out, "Total: {} sink(s), {chains} chain(s)", found.len())
}

/// Writes the report to any `Write`.
pub fn write_report<W: Write>(
    out: &mut W,
    found: &[Vulnerability],
    fmt: Format,
    scan_info: Option<&ScanInfo>,
) -> io::Result<()> {
    debug!(format = ?fmt, vulnerabilities = found.len(), "Writing report");
    match fmt {
        Format::Text => {
            if let Some(info) = scan_info {
                writeln!(out, "{}", summary_stats(info))?;
            }
            write_text(out, found)?;
        }
        Format::Json => {
            let json = ReportOut {
                vulnerabilities: found,
                total_vulnerabilities: found.len(),
                total_chains: total_chains(found),
            };
            serde_json::to_writer_pretty(&mut *out, &json)?;
            writeln!(out)?;
        }
        Format::Markdown => {
            out.write_all(to_markdown(found, scan_info).as_bytes())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
