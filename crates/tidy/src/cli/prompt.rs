//! Interactive attribute collection
//!
//! Walks the schema in declaration order and asks for each attribute whose
//! condition holds for the answers given so far. Choice lists use a select
//! (or multi-select for repeatable attributes), the description opens the
//! user's editor, and everything else is a single line of text.

use console::style;
use dialoguer::{Confirm, Editor, Input, MultiSelect, Select};
use tracing::debug;

use tidy_commits::AttributeCollector;
use tidy_core::error::SquashError;
use tidy_core::schema::{AttributeDef, AttributeSchema};
use tidy_core::types::{AttrValue, Attributes};

/// Collects commit attributes from the terminal
pub struct DialoguerCollector<'a> {
    schema: &'a AttributeSchema,
}

impl<'a> DialoguerCollector<'a> {
    pub fn new(schema: &'a AttributeSchema) -> Self {
        Self { schema }
    }

    fn ask(&self, def: &AttributeDef, default: Option<&AttrValue>) -> dialoguer::Result<Answer> {
        if let Some(help) = &def.help {
            println!("{}", style(help).dim());
        }

        match (&def.choices, def.multiple) {
            (Some(choices), false) => ask_choice(def, choices, default),
            (Some(choices), true) => ask_choices(def, choices, default),
            (None, _) if def.multiline => ask_multiline(def, default),
            (None, multiple) => ask_text(def, default, multiple),
        }
    }
}

impl AttributeCollector for DialoguerCollector<'_> {
    fn collect(&mut self, defaults: &Attributes) -> Result<Option<Attributes>, SquashError> {
        let mut attributes = Attributes::new();

        for def in self.schema.definitions() {
            if def
                .condition
                .as_ref()
                .is_some_and(|condition| !condition.holds(&attributes))
            {
                debug!(label = %def.label, "condition not met, skipping attribute");
                continue;
            }

            match self
                .ask(def, defaults.get(&def.label))
                .map_err(|e| SquashError::Collector(e.to_string()))?
            {
                Answer::Cancelled => return Ok(None),
                Answer::Empty => {}
                Answer::Value(value) => {
                    attributes.insert(def.label.clone(), value);
                }
            }
        }

        Ok(Some(attributes))
    }
}

/// What the user answered for one attribute
#[derive(Debug, PartialEq, Eq)]
enum Answer {
    Value(AttrValue),
    Empty,
    Cancelled,
}

fn ask_choice(
    def: &AttributeDef,
    choices: &[String],
    default: Option<&AttrValue>,
) -> dialoguer::Result<Answer> {
    let mut items: Vec<&str> = choices.iter().map(String::as_str).collect();
    if !def.required {
        items.push("(none)");
    }

    let current = default.and_then(AttrValue::as_text);
    let selection = Select::new()
        .with_prompt(def.display_name())
        .items(&items)
        .default(default_index(choices, current))
        .interact_opt()?;

    Ok(match selection {
        None => Answer::Cancelled,
        Some(index) => match choices.get(index) {
            Some(choice) => Answer::Value(AttrValue::from(choice.as_str())),
            None => Answer::Empty,
        },
    })
}

fn ask_choices(
    def: &AttributeDef,
    choices: &[String],
    default: Option<&AttrValue>,
) -> dialoguer::Result<Answer> {
    let current = default.map(AttrValue::values).unwrap_or_default();
    let checked: Vec<bool> = choices
        .iter()
        .map(|c| current.contains(&c.as_str()))
        .collect();

    let selection = MultiSelect::new()
        .with_prompt(def.display_name())
        .items(choices)
        .defaults(&checked)
        .interact_opt()?;

    Ok(match selection {
        None => Answer::Cancelled,
        Some(indexes) => to_answer(indexes.into_iter().map(|i| choices[i].clone()).collect()),
    })
}

fn ask_text(
    def: &AttributeDef,
    default: Option<&AttrValue>,
    multiple: bool,
) -> dialoguer::Result<Answer> {
    let prompt = if multiple {
        format!("{} (comma separated)", def.display_name())
    } else {
        def.display_name()
    };
    let initial = default.map(|v| v.values().join(", ")).unwrap_or_default();
    let required = def.required;

    let input = Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(!required)
        .validate_with(move |value: &String| -> Result<(), &str> {
            if required && value.trim().is_empty() {
                Err("a value is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    Ok(if multiple {
        to_answer(split_values(&input))
    } else {
        to_answer(vec![input.trim().to_string()])
    })
}

fn ask_multiline(def: &AttributeDef, default: Option<&AttrValue>) -> dialoguer::Result<Answer> {
    let current = default.map(|v| v.to_string()).unwrap_or_default();

    let wanted = Confirm::new()
        .with_prompt(format!("Write a {}?", def.display_name().to_lowercase()))
        .default(def.required || !current.trim().is_empty())
        .interact_opt()?;
    match wanted {
        None => return Ok(Answer::Cancelled),
        Some(false) => return Ok(Answer::Empty),
        Some(true) => {}
    }

    let mut template = String::new();
    if let Some(help) = &def.help {
        template.push_str(&format!("# {help}\n"));
    }
    template.push_str("# Lines starting with '#' are ignored.\n");
    template.push_str(&current);

    let edited = Editor::new().extension(".md").edit(&template)?;
    Ok(match edited {
        // Editor closed without saving keeps what was there
        None => to_answer(vec![current]),
        Some(text) => to_answer(vec![strip_comments(&text)]),
    })
}

/// Index of `current` among `choices`, or the first choice
fn default_index(choices: &[String], current: Option<&str>) -> usize {
    current
        .and_then(|value| choices.iter().position(|c| c == value))
        .unwrap_or(0)
}

fn split_values(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_comments(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn to_answer(mut values: Vec<String>) -> Answer {
    values.retain(|v| !v.trim().is_empty());
    match values.len() {
        0 => Answer::Empty,
        1 => Answer::Value(AttrValue::Text(values.remove(0))),
        _ => Answer::Value(AttrValue::List(values)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<String> {
        vec!["bug".to_string(), "feature".to_string()]
    }

    #[test]
    fn test_default_index() {
        assert_eq!(default_index(&choices(), Some("feature")), 1);
        assert_eq!(default_index(&choices(), Some("chore")), 0);
        assert_eq!(default_index(&choices(), None), 0);
    }

    #[test]
    fn test_split_values() {
        assert_eq!(split_values("a, b,,c "), vec!["a", "b", "c"]);
        assert!(split_values(" , ").is_empty());
    }

    #[test]
    fn test_strip_comments() {
        let text = "# help\nFirst line.\n\n# ignored\nSecond line.\n";
        assert_eq!(strip_comments(text), "First line.\n\nSecond line.");
    }

    #[test]
    fn test_to_answer() {
        assert_eq!(to_answer(vec![]), Answer::Empty);
        assert_eq!(to_answer(vec!["  ".to_string()]), Answer::Empty);
        assert_eq!(
            to_answer(vec!["a".to_string()]),
            Answer::Value(AttrValue::from("a"))
        );
        assert_eq!(
            to_answer(vec!["a".to_string(), "b".to_string()]),
            Answer::Value(AttrValue::List(vec!["a".to_string(), "b".to_string()]))
        );
    }
}
