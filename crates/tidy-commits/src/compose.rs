//! Building commit messages from attributes

use tidy_core::schema::{is_structural, AttributeSchema, Schema};
use tidy_core::types::Attributes;

use crate::parser::{normalize_paragraphs, parse_message, MessageParts};
use crate::trailer::{encode_trailer, label_to_trailer_key};

/// Compose a message: summary, blank line, description if present, blank
/// line, then one trailer line per value.
///
/// Trailers follow the schema's label order. Attributes the schema does not
/// declare are kept and follow in label order.
pub fn compose_message(schema: &dyn Schema, attributes: &Attributes) -> String {
    let mut paragraphs = Vec::new();

    if let Some(summary) = attributes.get("summary") {
        paragraphs.push(summary.to_string().trim().to_string());
    }
    if let Some(description) = attributes.get("description") {
        let description = trim_blank_lines(&description.to_string());
        if !description.is_empty() {
            paragraphs.push(description);
        }
    }

    let labels = schema.labels();
    let extra = attributes.keys().filter(|k| !labels.contains(k)).cloned();
    let trailers: Vec<String> = labels
        .iter()
        .cloned()
        .chain(extra)
        .filter(|label| !is_structural(label))
        .filter_map(|label| attributes.get(&label).map(|value| (label, value)))
        .flat_map(|(label, value)| {
            value
                .values()
                .into_iter()
                .filter(|v| !v.trim().is_empty())
                .map(|v| encode_trailer(&label, v))
                .collect::<Vec<_>>()
        })
        .collect();

    if !trailers.is_empty() {
        paragraphs.push(trailers.join("\n"));
    }

    paragraphs.join("\n\n")
}

/// Drop blank lines around `text`, keeping indentation of its first line
fn trim_blank_lines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n").trim_end().to_string(),
        _ => String::new(),
    }
}

/// Re-parse a composed message and check nothing was lost in encoding.
///
/// The message must parse, validate against the schema, keep the summary
/// and the description, carry every non-blank trailer value of `attributes`,
/// and gain no trailers that `attributes` does not have.
pub fn verify_composed(
    schema: &dyn Schema,
    attributes: &Attributes,
    message: &str,
) -> Result<MessageParts, String> {
    let parts = parse_message(message)?;

    let errors = schema.validate(&parts.all_attributes());
    if !errors.is_empty() {
        return Err(format!("composed message fails validation: {}", errors.join("; ")));
    }

    let expected_summary = attributes
        .get("summary")
        .map(|s| s.to_string())
        .unwrap_or_default();
    if parts.summary != expected_summary.trim() {
        return Err(format!(
            "summary changed from \"{}\" to \"{}\"",
            expected_summary.trim(),
            parts.summary
        ));
    }

    let expected_description = attributes
        .get("description")
        .map(|d| normalize_paragraphs(&d.to_string()))
        .unwrap_or_default();
    if parts.description != expected_description {
        return Err(format!(
            "description changed from {:?} to {:?}",
            expected_description, parts.description
        ));
    }

    if let Some(label) = parts.attributes.keys().find(|l| !attributes.contains_key(*l)) {
        return Err(format!("encoding produced an unexpected trailer \"{label}\""));
    }

    for (label, value) in attributes.iter().filter(|(l, _)| !is_structural(l)) {
        let expected = value.values().iter().filter(|v| !v.trim().is_empty()).count();
        let found = parts.attributes.get(label).map_or(0, |v| v.values().len());
        if expected != found {
            return Err(format!(
                "trailer \"{label}\" has {found} value(s) after encoding, expected {expected}"
            ));
        }
    }

    Ok(parts)
}

/// A commented commit template describing every schema entry, followed by
/// empty trailer lines to fill in
pub fn message_template(schema: &AttributeSchema) -> String {
    let mut out = String::from("\n\n");

    for def in schema.definitions() {
        let mut line = format!("# {}", def.display_name());
        if let Some(help) = &def.help {
            line.push_str(&format!(": {help}"));
        }
        if let Some(choices) = &def.choices {
            line.push_str(&format!(" (one of: {})", choices.join(", ")));
        }
        if !def.required {
            line.push_str(" [optional]");
        }
        out.push_str(&line);
        out.push('\n');
    }

    let trailers: Vec<String> = schema
        .definitions()
        .iter()
        .filter(|def| !is_structural(&def.label))
        .map(|def| format!("{}: ", label_to_trailer_key(&def.label)))
        .collect();
    if !trailers.is_empty() {
        out.push('\n');
        out.push_str(&trailers.join("\n"));
        out.push('\n');
    }

    out
}
