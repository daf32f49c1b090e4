use std::collections::{HashSet, VecDeque};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Relative-path fragments of generated or resource trees that are counted
/// as skipped instead of parsed.
pub const SKIP_PATTERNS: &[&str] = &[
    "/resources/template/",
    "/src/test/resources/",
    "/target/",
    "/build/",
];

/// Template suffixes that sometimes wrap Java sources.
pub const SKIP_EXTENSIONS: &[&str] = &[".ftl", ".jsp", ".vm", ".jspx"];

/// Breadth-first walk below `path` calling `callback` for every regular
/// file. Symlinks are never followed and unreadable entries are ignored.
/// Directory entries are visited in name order.
pub fn visit<C>(path: &Path, callback: &mut C) -> anyhow::Result<()>
where
    C: FnMut(&Path) -> anyhow::Result<()>,
{
    let mut pending: VecDeque<PathBuf> = VecDeque::new();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    pending.push_back(path.to_path_buf());

    while let Some(current) = pending.pop_front() {
        if !visited.insert(current.clone()) {
            continue;
        }
        let metadata = match fs::symlink_metadata(&current) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                debug!(path = %current.display(), "Permission denied");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            debug!(path = %current.display(), "Symlink skipped");
            continue;
        }
        if file_type.is_file() {
            callback(&current)?;
            continue;
        }
        if !file_type.is_dir() {
            continue;
        }
        let entries = match fs::read_dir(&current) {
            Ok(e) => e,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                debug!(path = %current.display(), "Permission denied");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let mut children: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(e) => Some(e.path()),
                Err(e) => {
                    debug!(path = %current.display(), error = %e, "Unreadable entry");
                    None
                }
            })
            .collect();
        children.sort();
        pending.extend(children);
    }

    Ok(())
}

/// A Java file accepted for parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the project root with `/` separators.
    pub rel: String,
}

/// Outcome of discovering the sources of one project.
#[derive(Debug, Clone, Default)]
pub struct SourceWalk {
    /// Files to parse, sorted by relative path.
    pub files: Vec<SourceFile>,
    /// Every `.java` file seen, excluded ones included.
    pub total: usize,
    /// Relative paths of files matched by [`SKIP_PATTERNS`] or [`SKIP_EXTENSIONS`].
    pub skipped: Vec<String>,
    /// Relative paths of files under an excluded directory.
    pub excluded: Vec<String>,
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(os) => Some(os.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_excluded(rel: &str, exclusions: &[String]) -> bool {
    let mut dirs: Vec<&str> = rel.split('/').collect();
    dirs.pop();
    dirs.iter().any(|d| exclusions.iter().any(|e| e == d))
}

fn should_skip(rel: &str) -> bool {
    let rooted = format!("/{rel}");
    SKIP_PATTERNS.iter().any(|p| rooted.contains(p))
        || SKIP_EXTENSIONS.iter().any(|e| rel.ends_with(e))
}

/// Collects the `.java` files under `root`, classifying each as accepted,
/// excluded (a directory component is listed in `exclusions`) or skipped.
pub fn walk_sources(root: &Path, exclusions: &[String]) -> anyhow::Result<SourceWalk> {
    let mut walk = SourceWalk::default();
    visit(root, &mut |path| {
        let is_java = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.ends_with(".java"))
            .unwrap_or(false);
        if !is_java {
            return Ok(());
        }
        walk.total += 1;
        let rel = relative(root, path);
        if is_excluded(&rel, exclusions) {
            debug!(file = %rel, "Path excluded");
            walk.excluded.push(rel);
        } else if should_skip(&rel) {
            debug!(file = %rel, "Template or resource file skipped");
            walk.skipped.push(rel);
        } else {
            walk.files.push(SourceFile {
                path: path.to_path_buf(),
                rel,
            });
        }
        Ok(())
    })?;
    walk.files.sort_by(|a, b| a.rel.cmp(&b.rel));
    walk.skipped.sort();
    walk.excluded.sort();
    Ok(walk)
}
