//! Loads the sink rule catalog and discovers the Java sources of a project.
//!
//! The catalog is a single JSON or YAML document:
//!
//! ```json
//! {
//!   "path_exclusions": ["test"],
//!   "depth": 8,
//!   "sink_rules": [
//!     {
//!       "sink_name": "RCE",
//!       "sink_desc": "Command execution",
//!       "severity_level": "High",
//!       "sinks": ["java.lang.Runtime:exec", "ProcessBuilder:start|command"]
//!     }
//!   ]
//! }
//! ```

use anyhow::{bail, Context};
use ir::MethodId;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::{fs, path::Path};
use tracing::{debug, info};

mod walk;
pub use walk::{visit, walk_sources, SourceFile, SourceWalk, SKIP_EXTENSIONS, SKIP_PATTERNS};

/// Annotations that mark a method as externally reachable when the catalog
/// does not list its own.
pub const DEFAULT_ENTRY_ANNOTATIONS: &[&str] = &[
    "GetMapping",
    "PostMapping",
    "RequestMapping",
    "PutMapping",
    "DeleteMapping",
    "Path",
    "GET",
    "POST",
    "PUT",
    "DELETE",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
/// Severity associated with a sink rule.
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "INFO",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            "warning" => Ok(Severity::Medium),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Severity> for String {
    fn from(s: Severity) -> Self {
        s.to_string()
    }
}

fn sink_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let ident = r"[A-Za-z_$][A-Za-z0-9_$]*";
        Regex::new(&format!(r"^{ident}(\.{ident})*:{ident}(\|{ident})*$"))
            .unwrap_or_else(|e| unreachable!("sink pattern is a constant: {e}"))
    })
}

/// A sink specifier `Type:m1|m2|…`. `Type` may be package-qualified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SinkSpec {
    /// Type as written in the catalog.
    pub type_name: String,
    pub methods: Vec<String>,
}

impl SinkSpec {
    /// Last dotted segment of the type: `java.lang.Runtime` → `Runtime`.
    pub fn simple_type(&self) -> &str {
        self.type_name
            .rsplit('.')
            .next()
            .unwrap_or(self.type_name.as_str())
    }

    /// One node id per listed method, keyed by the simple type name.
    pub fn method_ids(&self) -> Vec<MethodId> {
        self.methods
            .iter()
            .map(|m| MethodId::new(self.simple_type(), m.as_str()))
            .collect()
    }
}

impl FromStr for SinkSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.split_whitespace().collect();
        if !sink_pattern().is_match(&compact) {
            return Err(format!(
                "invalid sink specifier '{s}', expected Type:method or Type:m1|m2"
            ));
        }
        let (type_name, methods) = compact
            .split_once(':')
            .ok_or_else(|| format!("invalid sink specifier '{s}'"))?;
        Ok(Self {
            type_name: type_name.to_string(),
            methods: methods.split('|').map(str::to_string).collect(),
        })
    }
}

impl fmt::Display for SinkSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_name, self.methods.join("|"))
    }
}

impl TryFrom<String> for SinkSpec {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SinkSpec> for String {
    fn from(s: SinkSpec) -> Self {
        s.to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A named family of sinks sharing a description and severity.
pub struct SinkRule {
    pub sink_name: String,
    #[serde(default)]
    pub sink_desc: String,
    pub severity_level: Severity,
    pub sinks: Vec<SinkSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// The whole catalog: traversal settings plus the ordered sink rules.
pub struct RuleSet {
    /// Directory names skipped anywhere below the project root.
    #[serde(default)]
    pub path_exclusions: Vec<String>,
    /// Maximum number of caller hops explored backward from a sink.
    pub depth: usize,
    #[serde(default)]
    pub sink_rules: Vec<SinkRule>,
    /// Replaces [`DEFAULT_ENTRY_ANNOTATIONS`] when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_annotations: Option<Vec<String>>,
}

impl RuleSet {
    /// Entry annotations in effect for this catalog.
    pub fn entry_annotations(&self) -> Vec<String> {
        match &self.entry_annotations {
            Some(list) => list.clone(),
            None => DEFAULT_ENTRY_ANNOTATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Rules whose `sink_name` is in `names`, in catalog order. An empty
    /// filter keeps every rule.
    pub fn filtered(&self, names: &[String]) -> Vec<&SinkRule> {
        if names.is_empty() {
            return self.sink_rules.iter().collect();
        }
        self.sink_rules
            .iter()
            .filter(|r| names.iter().any(|n| n == &r.sink_name))
            .collect()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.depth == 0 {
            bail!("depth must be at least 1");
        }
        let mut seen = HashSet::new();
        for rule in &self.sink_rules {
            if rule.sink_name.trim().is_empty() {
                bail!("sink rule with empty sink_name");
            }
            if !seen.insert(rule.sink_name.as_str()) {
                bail!("duplicate sink rule '{}'", rule.sink_name);
            }
        }
        Ok(())
    }
}

/// Parses a catalog from text. `yaml` selects the YAML reader.
pub fn parse_rules(data: &str, yaml: bool) -> anyhow::Result<RuleSet> {
    let rules: RuleSet = if yaml {
        serde_yaml::from_str(data).context("Failed to parse YAML rule catalog")?
    } else {
        serde_json::from_str(data).context("Failed to parse JSON rule catalog")?
    };
    rules.validate()?;
    Ok(rules)
}

/// Reads the rule catalog at `path`; `.yaml`/`.yml` files are read as YAML,
/// everything else as JSON.
///
/// # Example
/// ```no_run
/// use loader::load_rules;
/// let rules = load_rules(std::path::Path::new("rules/rules.json")).unwrap();
/// assert!(!rules.sink_rules.is_empty());
/// ```
pub fn load_rules(path: &Path) -> anyhow::Result<RuleSet> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rule file: {}", path.display()))?;
    let yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);
    debug!(file = %path.display(), yaml, "Parsing rule catalog");
    let rules = parse_rules(&data, yaml)
        .with_context(|| format!("Invalid rule file: {}", path.display()))?;
    info!(
        file = %path.display(),
        rules = rules.sink_rules.len(),
        depth = rules.depth,
        "Rule catalog loaded"
    );
    Ok(rules)
}
