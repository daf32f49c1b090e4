use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type name used for callees whose receiver type could not be determined.
pub const UNRESOLVED_TYPE: &str = "[!]unresolved";

/// Type and method name used for calls made outside any method body
/// (field initializers, constructors, static blocks).
pub const UNKNOWN: &str = "unknown";

/// Identity of a method node: the simple type name plus the method name,
/// rendered as `Type:method`.
///
/// Equality is exact on both components. No package qualification is kept,
/// so two types sharing a simple name map to the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct MethodId {
    pub type_name: String,
    pub method: String,
}

impl MethodId {
    pub fn new(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            method: method.into(),
        }
    }

    /// Caller used for call sites that have no enclosing method.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }

    /// Callee placeholder for a member whose receiver type is unknown.
    pub fn unresolved(method: impl Into<String>) -> Self {
        Self::new(UNRESOLVED_TYPE, method)
    }

    pub fn is_unresolved(&self) -> bool {
        self.type_name == UNRESOLVED_TYPE
    }

    pub fn is_unknown(&self) -> bool {
        self.type_name == UNKNOWN && self.method == UNKNOWN
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_name, self.method)
    }
}

impl FromStr for MethodId {
    type Err = String;

    /// Splits at the first `:`; both halves must be non-empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((t, m)) if !t.trim().is_empty() && !m.trim().is_empty() => {
                Ok(Self::new(t.trim(), m.trim()))
            }
            _ => Err(format!("invalid method id '{s}', expected Type:method")),
        }
    }
}

impl From<MethodId> for String {
    fn from(id: MethodId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for MethodId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
