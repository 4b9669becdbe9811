//! Commit attribute schema
//!
//! The schema is the contract every parsed commit is validated against. The
//! rest of git-tidy only talks to it through the [`Schema`] trait, so any
//! representation can be plugged in; [`AttributeSchema`] is the YAML-backed
//! one shipped with the tool.

mod definition;
mod loader;

pub use definition::{AttributeDef, Condition, ConditionOp};
pub use loader::{load_schema, load_schema_or_default};

use std::path::Path;

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::SchemaError;
use crate::types::Attributes;

/// Labels that are part of the message structure rather than trailers
pub const STRUCTURAL_LABELS: [&str; 2] = ["summary", "description"];

static LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*(_[a-z0-9]+)*$").expect("Invalid regex"));

/// Whether a label is structural (never serialized as a trailer)
pub fn is_structural(label: &str) -> bool {
    STRUCTURAL_LABELS.contains(&label)
}

/// Whether a label can be used in a schema
pub fn is_valid_label(label: &str) -> bool {
    LABEL_REGEX.is_match(label)
}

/// Validates commit attributes
pub trait Schema: Send + Sync {
    /// Labels in declaration order
    fn labels(&self) -> Vec<String>;

    /// Human-readable validation errors, empty when the attributes are valid
    fn validate(&self, attributes: &Attributes) -> Vec<String>;
}

/// Schema defined by an ordered list of attribute definitions
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    definitions: Vec<AttributeDef>,
}

impl AttributeSchema {
    /// Build a schema from definitions, checking them for consistency
    pub fn new(definitions: Vec<AttributeDef>) -> Result<Self, SchemaError> {
        let mut seen: Vec<&str> = Vec::with_capacity(definitions.len());
        for def in &definitions {
            if !is_valid_label(&def.label) {
                return Err(SchemaError::InvalidLabel(def.label.clone()));
            }
            if seen.contains(&def.label.as_str()) {
                return Err(SchemaError::DuplicateLabel(def.label.clone()));
            }
            if def.multiline && def.label != "description" {
                return Err(SchemaError::MultilineNotAllowed(def.label.clone()));
            }
            seen.push(&def.label);
        }

        Ok(Self { definitions })
    }

    /// The built-in summary and description definitions
    pub fn builtin() -> Vec<AttributeDef> {
        vec![
            AttributeDef::new("summary")
                .with_name("Summary")
                .with_help("A high-level summary of the commit."),
            AttributeDef::new("description")
                .with_name("Description")
                .with_help("An in-depth description of the changes.")
                .optional()
                .multiline(),
        ]
    }

    /// Merge user definitions over the built-in ones.
    ///
    /// Built-ins the user does not redefine come first; user entries follow in
    /// the order they were declared.
    pub fn with_user_definitions(user: Vec<AttributeDef>) -> Result<Self, SchemaError> {
        let mut definitions: Vec<AttributeDef> = Self::builtin()
            .into_iter()
            .filter(|def| !user.iter().any(|u| u.label == def.label))
            .collect();
        definitions.extend(user);
        Self::new(definitions)
    }

    /// Load from a YAML file, see [`load_schema`]
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        load_schema(path)
    }

    /// All definitions in order
    pub fn definitions(&self) -> &[AttributeDef] {
        &self.definitions
    }

    /// Look up a definition by label
    pub fn get(&self, label: &str) -> Option<&AttributeDef> {
        self.definitions.iter().find(|d| d.label == label)
    }
}

impl Default for AttributeSchema {
    fn default() -> Self {
        Self {
            definitions: Self::builtin(),
        }
    }
}

impl Schema for AttributeSchema {
    fn labels(&self) -> Vec<String> {
        self.definitions.iter().map(|d| d.label.clone()).collect()
    }

    fn validate(&self, attributes: &Attributes) -> Vec<String> {
        let mut errors = Vec::new();

        for def in &self.definitions {
            if let Some(condition) = &def.condition {
                if !condition.holds(attributes) {
                    continue;
                }
            }
            def.check(attributes.get(&def.label), &mut errors);
        }

        debug!(error_count = errors.len(), "validated attributes");
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AttrValue;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), AttrValue::from(*v)))
            .collect()
    }

    fn type_schema() -> AttributeSchema {
        AttributeSchema::with_user_definitions(vec![
            AttributeDef::new("type").with_choices(["bug", "feature"])
        ])
        .unwrap()
    }

    #[test]
    fn test_builtin_labels() {
        assert_eq!(AttributeSchema::default().labels(), vec!["summary", "description"]);
    }

    #[test]
    fn test_user_definitions_append() {
        assert_eq!(type_schema().labels(), vec!["summary", "description", "type"]);
    }

    #[test]
    fn test_user_definitions_override_position() {
        let schema = AttributeSchema::with_user_definitions(vec![
            AttributeDef::new("type"),
            AttributeDef::new("summary"),
        ])
        .unwrap();
        assert_eq!(schema.labels(), vec!["description", "type", "summary"]);
    }

    #[test]
    fn test_valid_attributes() {
        let errors = type_schema().validate(&attrs(&[("summary", "Fix"), ("type", "bug")]));
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_missing_required() {
        let errors = type_schema().validate(&attrs(&[("summary", "Fix")]));
        assert_eq!(errors, vec!["type: required".to_string()]);
    }

    #[test]
    fn test_value_not_in_choices() {
        let errors = type_schema().validate(&attrs(&[("summary", "Fix"), ("type", "chore")]));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("\"chore\" is not one of [bug, feature]"));
    }

    #[test]
    fn test_wrong_arity() {
        let mut attributes = attrs(&[("summary", "Fix"), ("type", "bug")]);
        attributes
            .get_mut("type")
            .unwrap()
            .push("feature");
        let errors = type_schema().validate(&attributes);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("single value"));
    }

    #[test]
    fn test_unknown_labels_ignored() {
        let errors = type_schema().validate(&attrs(&[
            ("summary", "Fix"),
            ("type", "bug"),
            ("reviewed_by", "someone"),
        ]));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_multiline_only_for_description() {
        let result = AttributeSchema::new(vec![AttributeDef::new("stuff").multiline()]);
        assert!(matches!(result, Err(SchemaError::MultilineNotAllowed(_))));
    }

    #[test]
    fn test_duplicate_and_invalid_labels() {
        assert!(matches!(
            AttributeSchema::new(vec![AttributeDef::new("a"), AttributeDef::new("a")]),
            Err(SchemaError::DuplicateLabel(_))
        ));
        assert!(matches!(
            AttributeSchema::new(vec![AttributeDef::new("Bad-Label")]),
            Err(SchemaError::InvalidLabel(_))
        ));
        assert!(!is_valid_label("trailing_"));
        assert!(is_valid_label("co_authored_by"));
    }

    #[test]
    fn test_condition_skips_entry() {
        let schema = AttributeSchema::with_user_definitions(vec![
            AttributeDef::new("type"),
            AttributeDef::new("ticket")
                .with_condition(Condition::new(ConditionOp::NotEqual, "type", "trivial")),
        ])
        .unwrap();

        let trivial = attrs(&[("summary", "Typo"), ("type", "trivial")]);
        assert!(schema.validate(&trivial).is_empty());

        let feature = attrs(&[("summary", "Add"), ("type", "feature")]);
        assert_eq!(schema.validate(&feature), vec!["ticket: required".to_string()]);
    }
}
