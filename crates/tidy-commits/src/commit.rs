//! Parsed commit record

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use tidy_core::types::{AttrValue, Attributes};
use tidy_git::TagInfo;

/// A commit parsed against a schema. Immutable once constructed.
#[derive(Debug, Clone, Serialize)]
pub struct Commit {
    pub(crate) sha: String,
    pub(crate) author_name: String,
    pub(crate) author_email: String,
    pub(crate) author_date: Option<DateTime<FixedOffset>>,
    pub(crate) committer_name: String,
    pub(crate) committer_email: String,
    pub(crate) committer_date: Option<DateTime<FixedOffset>>,
    pub(crate) tag: Option<TagInfo>,
    pub(crate) raw_message: String,
    pub(crate) summary: String,
    pub(crate) description: String,
    pub(crate) attributes: Attributes,
    pub(crate) is_parsed: bool,
    pub(crate) is_valid: bool,
    pub(crate) validation_errors: Vec<String>,
}

impl Commit {
    /// Full hex object id
    pub fn sha(&self) -> &str {
        &self.sha
    }

    /// Abbreviated object id
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }

    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    pub fn author_email(&self) -> &str {
        &self.author_email
    }

    pub fn author_date(&self) -> Option<DateTime<FixedOffset>> {
        self.author_date
    }

    pub fn committer_name(&self) -> &str {
        &self.committer_name
    }

    pub fn committer_email(&self) -> &str {
        &self.committer_email
    }

    pub fn committer_date(&self) -> Option<DateTime<FixedOffset>> {
        self.committer_date
    }

    /// Nearest tag whose history contains this commit
    pub fn tag(&self) -> Option<&TagInfo> {
        self.tag.as_ref()
    }

    /// The message exactly as stored
    pub fn raw_message(&self) -> &str {
        &self.raw_message
    }

    /// First paragraph of the message
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Free text between the summary and the trailers, empty when absent
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Attributes decoded from the trailer block
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// A single attribute by label
    pub fn attribute(&self, label: &str) -> Option<&AttrValue> {
        self.attributes.get(label)
    }

    /// Summary, description and trailer attributes together, as validated
    pub fn all_attributes(&self) -> Attributes {
        let mut all = self.attributes.clone();
        if !self.summary.is_empty() {
            all.insert("summary".to_string(), AttrValue::from(self.summary.as_str()));
        }
        if !self.description.is_empty() {
            all.insert(
                "description".to_string(),
                AttrValue::from(self.description.as_str()),
            );
        }
        all
    }

    /// Whether the message could be decomposed at all
    pub fn is_parsed(&self) -> bool {
        self.is_parsed
    }

    /// Whether the attributes satisfy the schema
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    /// Resolve a field by name for grouping and filtering.
    ///
    /// Built-in fields win over attributes of the same name. Absent or empty
    /// values resolve to `None`.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        let text = |s: &str| (!s.is_empty()).then(|| FieldValue::Text(s.to_string()));
        match name {
            "sha" => text(&self.sha),
            "tag" => self.tag.as_ref().map(|t| FieldValue::Text(t.name.clone())),
            "tag_date" => self
                .tag
                .as_ref()
                .and_then(|t| t.timestamp)
                .map(FieldValue::Date),
            "is_valid" => Some(FieldValue::Bool(self.is_valid)),
            "is_parsed" => Some(FieldValue::Bool(self.is_parsed)),
            "author_name" => text(&self.author_name),
            "author_email" => text(&self.author_email),
            "author_date" => self.author_date.map(FieldValue::Date),
            "committer_name" => text(&self.committer_name),
            "committer_email" => text(&self.committer_email),
            "committer_date" => self.committer_date.map(FieldValue::Date),
            "summary" => text(&self.summary),
            "description" => text(&self.description),
            label => self.attributes.get(label).map(FieldValue::from),
        }
    }
}

/// A resolved field value used as a group key or filter operand
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Date(DateTime<FixedOffset>),
    List(Vec<String>),
}

impl FieldValue {
    /// Name of the value's kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Bool(_) => "boolean",
            Self::Date(_) => "date",
            Self::List(_) => "list",
        }
    }

    /// Natural ordering between values of the same kind; `None` across kinds
    pub fn try_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::List(a), Self::List(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// The value as text, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&AttrValue> for FieldValue {
    fn from(value: &AttrValue) -> Self {
        match value {
            AttrValue::Text(s) => Self::Text(s.clone()),
            AttrValue::List(items) => Self::List(items.clone()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{parse, raw_commit};
    use tidy_core::schema::AttributeSchema;

    #[test]
    fn test_builtin_fields() {
        let commit = parse(&AttributeSchema::default(), &raw_commit("Fix bug\n\nType: bug"));
        assert_eq!(commit.field("summary"), Some(FieldValue::from("Fix bug")));
        assert_eq!(commit.field("description"), None);
        assert_eq!(commit.field("is_valid"), Some(FieldValue::Bool(true)));
        assert_eq!(commit.field("type"), Some(FieldValue::from("bug")));
        assert_eq!(commit.field("tag"), None);
        assert_eq!(commit.field("missing"), None);
    }

    #[test]
    fn test_short_sha() {
        let commit = parse(&AttributeSchema::default(), &raw_commit("Fix bug"));
        assert_eq!(commit.short_sha().len(), 7);
        assert!(commit.sha().starts_with(commit.short_sha()));
    }

    #[test]
    fn test_try_cmp_kinds() {
        let a = FieldValue::from("a");
        let b = FieldValue::from("b");
        assert_eq!(a.try_cmp(&b), Some(Ordering::Less));
        assert_eq!(a.try_cmp(&FieldValue::Bool(true)), None);
    }

    #[test]
    fn test_all_attributes_includes_structure() {
        let commit = parse(
            &AttributeSchema::default(),
            &raw_commit("Fix bug\n\nMore detail.\n\nType: bug"),
        );
        let all = commit.all_attributes();
        assert_eq!(all["summary"], AttrValue::from("Fix bug"));
        assert_eq!(all["description"], AttrValue::from("More detail."));
        assert_eq!(all["type"], AttrValue::from("bug"));
    }
}
