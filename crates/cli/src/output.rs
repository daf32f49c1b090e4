use anyhow::{Context, Result};
use clap::ValueEnum;
use engine::Vulnerability;
use reporters::{self, ScanInfo};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Supported output formats for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Markdown,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            "markdown" | "md" => Ok(Format::Markdown),
            _ => Err("invalid format".into()),
        }
    }
}

impl From<Format> for reporters::Format {
    fn from(fmt: Format) -> Self {
        match fmt {
            Format::Text => reporters::Format::Text,
            Format::Json => reporters::Format::Json,
            Format::Markdown => reporters::Format::Markdown,
        }
    }
}

/// Writes the report to `output`, or to stdout when no file is given.
pub fn write_vulnerabilities(
    found: &[Vulnerability],
    fmt: Format,
    info: &ScanInfo,
    output: Option<&Path>,
) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            reporters::write_report(&mut out, found, fmt.into(), Some(info))?;
            out.flush()
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => reporters::print_report(found, fmt.into(), Some(info))?,
    }
    Ok(())
}

/// Pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("failed to serialize output")?;
    writeln!(out)?;
    Ok(())
}
