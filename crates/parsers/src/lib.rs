//! Converters of Java source files into the [`ir::SourceUnit`] view used by
//! the engine.

use anyhow::{Context, Result};
use ir::SourceUnit;
use serde::Serialize;
use std::{fs, path::Path};
use tracing::debug;

pub mod cache;
pub mod languages;
pub mod slice;

pub use cache::{content_hash, UnitCache};
pub use languages::*;

#[derive(Debug, Default, Clone, Serialize)]
pub struct ParserMetrics {
    pub files_parsed: usize,
    pub cache_hits: usize,
    pub parse_errors: usize,
}

/// A parsed unit with the content hash it was produced from.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub unit: SourceUnit,
    pub hash: String,
    pub from_cache: bool,
}

/// Reads and parses one file, consulting `cache` first when given.
///
/// `display_path` is the path recorded in the unit and the cache key
/// (usually relative to the project root).
///
/// # Example
/// ```
/// use parsers::parse_file;
/// let path = std::env::temp_dir().join("ParseFileDoc.java");
/// std::fs::write(&path, "class A { void f() { g(); } }").unwrap();
/// let parsed = parse_file(&path, "A.java", None, None).unwrap();
/// assert_eq!(parsed.unit.types[0].name, "A");
/// assert_eq!(parsed.unit.calls[0].member, "g");
/// ```
pub fn parse_file(
    path: &Path,
    display_path: &str,
    cache: Option<&UnitCache>,
    mut metrics: Option<&mut ParserMetrics>,
) -> Result<ParsedFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let hash = content_hash(&content);
    if let Some(unit) = cache.and_then(|c| c.get(display_path, &hash)) {
        if let Some(m) = metrics.as_deref_mut() {
            m.cache_hits += 1;
        }
        debug!(file = %display_path, "Unit cache hit");
        return Ok(ParsedFile {
            unit: unit.clone(),
            hash,
            from_cache: true,
        });
    }
    debug!(file = %display_path, "Parsing file");
    match parse_java(&content, display_path) {
        Ok(unit) => {
            if let Some(m) = metrics {
                m.files_parsed += 1;
            }
            Ok(ParsedFile {
                unit,
                hash,
                from_cache: false,
            })
        }
        Err(e) => {
            if let Some(m) = metrics {
                m.parse_errors += 1;
            }
            Err(e)
        }
    }
}
