//! Shared value types

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Parsed attributes of a commit, keyed by schema label
pub type Attributes = BTreeMap<String, AttrValue>;

/// Value of a single commit attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// A single value
    Text(String),
    /// A repeated trailer
    List(Vec<String>),
}

impl AttrValue {
    /// The value as a single string, if it is not a list
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// All values in order
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Text(s) => vec![s.as_str()],
            Self::List(items) => items.iter().map(String::as_str).collect(),
        }
    }

    /// Whether there is no meaningful content
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }

    /// Append another value, turning a single value into a list
    pub fn push(&mut self, value: impl Into<String>) {
        let value = value.into();
        match self {
            Self::Text(existing) => {
                *self = Self::List(vec![std::mem::take(existing), value]);
            }
            Self::List(items) => items.push(value),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

/// A resolved pair of revisions. An empty `base` means the repository root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRange {
    /// Revisions reachable from here are excluded
    pub base: String,
    /// Revisions reachable from here are included
    pub head: String,
}

impl RevisionRange {
    /// Create a new range
    pub fn new(base: impl Into<String>, head: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            head: head.into(),
        }
    }

    /// Everything reachable from `head`
    pub fn from_root(head: impl Into<String>) -> Self {
        Self::new("", head)
    }

    /// Whether the range starts at the repository root
    pub fn is_from_root(&self) -> bool {
        self.base.is_empty()
    }
}

impl fmt::Display for RevisionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.base.is_empty() {
            f.write_str(&self.head)
        } else {
            write!(f, "{}..{}", self.base, self.head)
        }
    }
}

/// Lint policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintMode {
    /// Every commit must be valid
    #[default]
    All,
    /// At least one commit must be valid
    Any,
}

impl std::str::FromStr for LintMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "any" => Ok(Self::Any),
            other => Err(format!("unknown lint mode: {other}")),
        }
    }
}

/// Which identity a squashed commit carries as its author
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityPolicy {
    /// The configured git user at squash time
    #[default]
    Current,
    /// The author name, email and date of the seed commit
    Seed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_promotes_to_list() {
        let mut value = AttrValue::from("a");
        value.push("b");
        assert_eq!(value, AttrValue::List(vec!["a".into(), "b".into()]));
        value.push("c");
        assert_eq!(value.values(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_revision_range_display() {
        assert_eq!(RevisionRange::new("origin/main", "HEAD").to_string(), "origin/main..HEAD");
        assert_eq!(RevisionRange::from_root("HEAD").to_string(), "HEAD");
        assert!(RevisionRange::from_root("HEAD").is_from_root());
    }

    #[test]
    fn test_lint_mode_from_str() {
        assert_eq!("ANY".parse::<LintMode>().unwrap(), LintMode::Any);
        assert!("some".parse::<LintMode>().is_err());
    }

    #[test]
    fn test_attr_value_serde_untagged() {
        let list: AttrValue = serde_json::from_str(r#"["x","y"]"#).unwrap();
        assert_eq!(list, AttrValue::List(vec!["x".into(), "y".into()]));
        let text: AttrValue = serde_json::from_str(r#""x""#).unwrap();
        assert_eq!(text.as_text(), Some("x"));
    }
}
