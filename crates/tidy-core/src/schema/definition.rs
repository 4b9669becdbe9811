//! Attribute definitions

use serde::{Deserialize, Serialize};

use crate::types::{AttrValue, Attributes};

/// A single attribute in the commit schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDef {
    /// Label, also the lowercase form of the trailer key
    pub label: String,

    /// Display name used when prompting
    #[serde(default)]
    pub name: Option<String>,

    /// Help text used when prompting
    #[serde(default)]
    pub help: Option<String>,

    /// Whether a value must be present
    #[serde(default = "default_required")]
    pub required: bool,

    /// Allowed values
    #[serde(default)]
    pub choices: Option<Vec<String>>,

    /// Whether the trailer may repeat
    #[serde(default)]
    pub multiple: bool,

    /// Multi-line prompt input (description only)
    #[serde(default)]
    pub multiline: bool,

    /// Entry only applies when this holds
    #[serde(default)]
    pub condition: Option<Condition>,
}

fn default_required() -> bool {
    true
}

impl AttributeDef {
    /// A required, single-valued attribute with no restrictions
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            name: None,
            help: None,
            required: true,
            choices: None,
            multiple: false,
            multiline: false,
            condition: None,
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Restrict values to a fixed set
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a condition
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Mark as not required
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Allow repeated values
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Mark as multi-line
    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    /// Name shown to users, derived from the label when unset
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.label
                .split('_')
                .map(|part| {
                    let mut chars = part.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<String>>()
                .join(" ")
        })
    }

    /// Append validation errors for `value` to `errors`
    pub(crate) fn check(&self, value: Option<&AttrValue>, errors: &mut Vec<String>) {
        let value = match value {
            Some(v) if !v.is_blank() => v,
            _ => {
                if self.required {
                    errors.push(format!("{}: required", self.label));
                }
                return;
            }
        };

        if let AttrValue::List(items) = value {
            if !self.multiple {
                errors.push(format!(
                    "{}: expected a single value, got {}",
                    self.label,
                    items.len()
                ));
                return;
            }
        }

        if let Some(choices) = &self.choices {
            for item in value.values() {
                if !choices.iter().any(|c| c == item) {
                    errors.push(format!(
                        "{}: \"{}\" is not one of [{}]",
                        self.label,
                        item,
                        choices.join(", ")
                    ));
                }
            }
        }
    }
}

/// Comparison used by a [`Condition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOp {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
}

/// `[op, label, value]` guard on an attribute definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub op: ConditionOp,
    pub label: String,
    pub value: String,
}

impl Condition {
    /// Create a condition
    pub fn new(op: ConditionOp, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            op,
            label: label.into(),
            value: value.into(),
        }
    }

    /// Evaluate against the other attributes of a commit
    pub fn holds(&self, attributes: &Attributes) -> bool {
        let equal = attributes
            .get(&self.label)
            .and_then(AttrValue::as_text)
            .is_some_and(|v| v == self.value);

        match self.op {
            ConditionOp::Equal => equal,
            ConditionOp::NotEqual => !equal,
        }
    }
}

impl TryFrom<Vec<String>> for Condition {
    type Error = String;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        let [op, label, value]: [String; 3] = parts
            .try_into()
            .map_err(|p: Vec<String>| format!("expected [op, label, value], got {} items", p.len()))?;

        let op = match op.as_str() {
            "==" => ConditionOp::Equal,
            "!=" => ConditionOp::NotEqual,
            other => return Err(format!("unsupported operator \"{other}\"")),
        };

        Ok(Self::new(op, label, value))
    }
}

impl Serialize for Condition {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let op = match self.op {
            ConditionOp::Equal => "==",
            ConditionOp::NotEqual => "!=",
        };
        [op, self.label.as_str(), self.value.as_str()].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = Vec::<String>::deserialize(deserializer)?;
        Condition::try_from(parts).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_from_label() {
        assert_eq!(AttributeDef::new("co_authored_by").display_name(), "Co Authored By");
        assert_eq!(AttributeDef::new("type").with_name("Kind").display_name(), "Kind");
    }

    #[test]
    fn test_condition_from_yaml() {
        let cond: Condition = serde_yaml::from_str("['!=', 'type', 'trivial']").unwrap();
        assert_eq!(cond, Condition::new(ConditionOp::NotEqual, "type", "trivial"));
    }

    #[test]
    fn test_condition_rejects_bad_operator() {
        let result: Result<Condition, _> = serde_yaml::from_str("['<', 'type', 'x']");
        assert!(result.is_err());
    }

    #[test]
    fn test_optional_blank_is_fine() {
        let mut errors = Vec::new();
        AttributeDef::new("note")
            .optional()
            .check(Some(&AttrValue::from("  ")), &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_multiple_checks_every_choice() {
        let def = AttributeDef::new("area").multiple().with_choices(["ui", "db"]);
        let mut errors = Vec::new();
        def.check(
            Some(&AttrValue::List(vec!["ui".into(), "net".into()])),
            &mut errors,
        );
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("\"net\""));
    }
}
