//! Schema loading

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::SchemaError;

use super::definition::AttributeDef;
use super::AttributeSchema;

/// Parse a YAML list of attribute definitions and merge it over the built-ins
pub fn parse_schema(content: &str) -> Result<AttributeSchema, SchemaError> {
    let entries: Option<Vec<serde_yaml::Value>> = serde_yaml::from_str(content)?;
    let entries = entries.unwrap_or_default();

    let mut user = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.get("label").is_none() {
            let rendered = serde_yaml::to_string(&entry).unwrap_or_default();
            return Err(SchemaError::MissingLabel(rendered.trim().to_string()));
        }

        let label = entry
            .get("label")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let def: AttributeDef = serde_yaml::from_value(entry).map_err(|e| {
            SchemaError::InvalidCondition {
                label: label.clone(),
                reason: e.to_string(),
            }
        })?;
        user.push(def);
    }

    debug!(count = user.len(), "parsed user schema entries");
    AttributeSchema::with_user_definitions(user)
}

/// Load the schema at `path`. A missing file yields the built-in schema.
pub fn load_schema(path: &Path) -> Result<AttributeSchema, SchemaError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no schema file, using built-in schema");
            return Ok(AttributeSchema::default());
        }
        Err(e) => {
            return Err(SchemaError::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    info!(path = %path.display(), "loading commit schema");
    parse_schema(&content)
}

/// Load the schema or fall back to the built-in one
pub fn load_schema_or_default(path: &Path) -> AttributeSchema {
    load_schema(path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "invalid schema, using built-in schema");
        AttributeSchema::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use tempfile::TempDir;

    #[test]
    fn test_overridden_user_schema() {
        let schema = parse_schema(
            r#"
- label: type
- label: summary
- label: description
  condition: ['!=', 'type', 'trivial']
  multiline: true
  required: false
"#,
        )
        .unwrap();
        assert_eq!(schema.labels(), vec!["type", "summary", "description"]);
        assert!(schema.get("description").unwrap().condition.is_some());
    }

    #[test]
    fn test_nonoverridden_user_schema() {
        let schema = parse_schema("- label: type").unwrap();
        assert_eq!(schema.labels(), vec!["summary", "description", "type"]);
    }

    #[test]
    fn test_missing_label() {
        assert!(matches!(
            parse_schema("- invalid: type"),
            Err(SchemaError::MissingLabel(_))
        ));
    }

    #[test]
    fn test_invalid_multiline() {
        let result = parse_schema(
            r#"
- label: type
- label: stuff
  multiline: true
"#,
        );
        assert!(matches!(result, Err(SchemaError::MultilineNotAllowed(_))));
    }

    #[test]
    fn test_empty_file_is_builtin() {
        assert_eq!(parse_schema("").unwrap().labels(), vec!["summary", "description"]);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let schema = load_schema(&temp.path().join("commit.yaml")).unwrap();
        assert_eq!(schema.labels().len(), 2);
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("commit.yaml");
        std::fs::write(&path, "- label: type\n  choices: [bug, feature]\n").unwrap();

        let schema = load_schema(&path).unwrap();
        assert_eq!(
            schema.get("type").unwrap().choices.as_deref(),
            Some(&["bug".to_string(), "feature".to_string()][..])
        );
    }
}
