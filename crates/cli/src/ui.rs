//! Headers and colored listings printed by the CLI.

use colored::*;
use engine::{MethodSource, ProjectStatistics, RuleListing};

pub fn print_header() {
    let version = env!("CARGO_PKG_VERSION");
    // Avoid panics when the version exceeds the expected width
    let spaces = " ".repeat(24usize.saturating_sub(version.len()));
    eprintln!(
        r#"
    ╭──────────────────────────────────────╮
    │                                      │
    │          S I N K T R A C E R         │
    │                                      │
    │     Entry point to sink call         │
    │     chains for Java projects         │
    │     Version: {version}{spaces}│
    │                                      │
    ╰──────────────────────────────────────╯
"#
    );
}

pub fn print_rules(listing: &RuleListing) {
    println!(
        "{} {} (depth {})",
        "Sink rules:".bright_cyan().bold(),
        listing.total_rules.to_string().bright_white().bold(),
        listing.depth
    );
    for rule in &listing.rules {
        println!();
        println!(
            "  {} {} [{}]",
            "•".bright_blue(),
            rule.sink_name.bright_white().bold(),
            rule.severity_level.to_string().bright_yellow()
        );
        if !rule.sink_desc.is_empty() {
            println!("    {}", rule.sink_desc);
        }
        for sink in &rule.sinks {
            println!("    {} {}", "↳".bright_black(), sink);
        }
    }
}

pub fn print_statistics(root: &str, stats: &ProjectStatistics) {
    println!("{} {}", "Project:".bright_cyan().bold(), root.bright_white());
    println!();
    println!("    Types                     {}", stats.total_classes);
    println!("    Methods                   {}", stats.total_methods);
    println!("    Call edges                {}", stats.total_call_edges);
    println!("    Unresolved edges          {}", stats.unresolved_edges);
    println!("    Entry points              {}", stats.entry_points);
    println!();
    println!("    Java files                {}", stats.total_files);
    println!("    Parsed                    {}", stats.parsed_files);
    println!("    Skipped                   {}", stats.skipped_files);
    println!("    Excluded                  {}", stats.excluded_files);
    println!("    Failed                    {}", stats.error_files);
    if !stats.errors.is_empty() {
        println!();
        println!("{}", "Files that failed to parse:".bright_yellow().bold());
        for e in &stats.errors {
            println!("  {} {}: {}", "•".bright_red(), e.file.bright_white(), e.error);
        }
    }
    if !stats.classes_with_methods.is_empty() {
        println!();
        println!("{}", "Types:".bright_cyan().bold());
        for name in &stats.classes_with_methods {
            println!("  {name}");
        }
    }
}

pub fn print_method(source: &MethodSource) {
    let location = match (&source.file_path, source.line) {
        (Some(file), Some(line)) => format!("{file}:{line}"),
        (Some(file), None) => file.clone(),
        _ => "not indexed".to_string(),
    };
    println!(
        "{} {}",
        format!("// {}", source.function).bright_green().bold(),
        location.bright_black()
    );
    match &source.code {
        Some(code) => println!("{}", code.trim_end()),
        None => println!("{}", "// source not available".bright_yellow()),
    }
}
