//! Commit message parsing
//!
//! A message is split into paragraphs on blank lines. The first paragraph is
//! the summary; trailing paragraphs made entirely of `Key: value` lines form
//! the trailer block; everything in between is the description.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use tidy_core::schema::{is_structural, Schema};
use tidy_core::types::{AttrValue, Attributes};
use tidy_git::RawCommit;

use crate::commit::Commit;
use crate::trailer::trailer_key_to_label;

/// Regex for a trailer line
static TRAILER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<key>[A-Za-z][A-Za-z0-9]*(?:-[A-Za-z0-9]+)*):(?:\s+(?P<value>.*))?$")
        .expect("Invalid regex")
});

/// Structural decomposition of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageParts {
    pub summary: String,
    pub description: String,
    /// Decoded trailers, repeated keys collected into lists
    pub attributes: Attributes,
}

impl MessageParts {
    /// Everything the schema validates: summary, description and trailers
    pub fn all_attributes(&self) -> Attributes {
        let mut all = self.attributes.clone();
        all.insert("summary".to_string(), AttrValue::from(self.summary.as_str()));
        if !self.description.is_empty() {
            all.insert(
                "description".to_string(),
                AttrValue::from(self.description.as_str()),
            );
        }
        all
    }
}

/// Parses raw log records into [`Commit`] values against a schema
pub struct CommitParser<'a> {
    schema: &'a dyn Schema,
}

impl<'a> CommitParser<'a> {
    pub fn new(schema: &'a dyn Schema) -> Self {
        Self { schema }
    }

    /// Parse a batch of records, preserving their order
    pub fn parse_all(&self, records: &[RawCommit]) -> Vec<Commit> {
        records.iter().map(|raw| self.parse(raw)).collect()
    }

    /// Parse one record. Never fails: problems are recorded on the commit.
    pub fn parse(&self, raw: &RawCommit) -> Commit {
        let mut errors = Vec::new();

        if !is_full_sha(&raw.sha) {
            errors.push(format!("invalid object id \"{}\"", raw.sha));
        }
        let author_date = raw.author.datetime();
        if author_date.is_none() {
            errors.push("unparsable author timestamp".to_string());
        }
        let committer_date = raw.committer.datetime();
        if committer_date.is_none() {
            errors.push("unparsable committer timestamp".to_string());
        }

        let parts = if errors.is_empty() {
            match parse_message(&raw.message) {
                Ok(parts) => Some(parts),
                Err(e) => {
                    errors.push(e);
                    None
                }
            }
        } else {
            None
        };

        let mut commit = Commit {
            sha: raw.sha.clone(),
            author_name: raw.author.name.clone(),
            author_email: raw.author.email.clone(),
            author_date,
            committer_name: raw.committer.name.clone(),
            committer_email: raw.committer.email.clone(),
            committer_date,
            tag: raw.tag.clone(),
            raw_message: raw.message.clone(),
            summary: String::new(),
            description: String::new(),
            attributes: Attributes::new(),
            is_parsed: false,
            is_valid: false,
            validation_errors: errors,
        };

        let Some(parts) = parts else {
            debug!(sha = %raw.sha, errors = ?commit.validation_errors, "commit not parsed");
            return commit;
        };

        let errors = self.schema.validate(&parts.all_attributes());
        commit.is_parsed = true;
        commit.is_valid = errors.is_empty();
        commit.validation_errors = errors;
        commit.summary = parts.summary;
        commit.description = parts.description;
        commit.attributes = parts.attributes;
        commit
    }
}

/// Decompose a message into summary, description and trailer attributes
pub fn parse_message(message: &str) -> Result<MessageParts, String> {
    let paragraphs = split_paragraphs(message);
    if paragraphs.is_empty() {
        return Err("commit message is empty".to_string());
    }

    let mut end = paragraphs.len();
    let mut blocks = Vec::new();
    while end > 1 {
        match parse_trailer_paragraph(&paragraphs[end - 1]) {
            Some(trailers) => {
                blocks.push(trailers);
                end -= 1;
            }
            None => break,
        }
    }

    let mut attributes = Attributes::new();
    for (label, value) in blocks.into_iter().rev().flatten() {
        match attributes.get_mut(&label) {
            Some(existing) => existing.push(value),
            None => {
                attributes.insert(label, AttrValue::Text(value));
            }
        }
    }

    let summary = paragraphs[0]
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join(" ");

    let description = paragraphs[1..end]
        .iter()
        .map(|lines| lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(MessageParts {
        summary,
        description,
        attributes,
    })
}

/// `text` as the parser reads it back: trailing whitespace dropped and runs
/// of blank lines collapsed to one
pub(crate) fn normalize_paragraphs(text: &str) -> String {
    split_paragraphs(text)
        .iter()
        .map(|lines| lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn split_paragraphs(message: &str) -> Vec<Vec<&str>> {
    let mut paragraphs = Vec::new();
    let mut current = Vec::new();

    for line in message.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}

/// The trailers of a paragraph, or `None` if any line is not a trailer
fn parse_trailer_paragraph(lines: &[&str]) -> Option<Vec<(String, String)>> {
    let mut trailers: Vec<(String, String)> = Vec::new();

    for line in lines {
        if let Some(caps) = TRAILER_REGEX.captures(line) {
            let label = trailer_key_to_label(&caps["key"]);
            if is_structural(&label) {
                return None;
            }
            let value = caps.name("value").map_or("", |m| m.as_str()).trim();
            trailers.push((label, value.to_string()));
        } else if line.starts_with(char::is_whitespace) {
            // Continuation of previous trailer
            let (_, value) = trailers.last_mut()?;
            if !value.is_empty() {
                value.push('\n');
            }
            value.push_str(line.trim());
        } else {
            return None;
        }
    }

    Some(trailers)
}

fn is_full_sha(sha: &str) -> bool {
    sha.len() == 40 && sha.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{raw_commit, type_schema};
    use tidy_core::schema::AttributeSchema;

    #[test]
    fn test_end_to_end() {
        let schema = type_schema();
        let parser = CommitParser::new(&schema);
        let commit = parser.parse(&raw_commit("Fix bug\n\nDetailed text.\n\nType: bug"));

        assert!(commit.is_parsed());
        assert!(commit.is_valid(), "{:?}", commit.validation_errors());
        assert_eq!(commit.summary(), "Fix bug");
        assert_eq!(commit.description(), "Detailed text.");
        assert_eq!(commit.attributes().len(), 1);
        assert_eq!(commit.attribute("type"), Some(&AttrValue::from("bug")));
    }

    #[test]
    fn test_no_trailers() {
        let parts = parse_message("Fix bug\n\nSome text.\n\nMore text.").unwrap();
        assert_eq!(parts.summary, "Fix bug");
        assert_eq!(parts.description, "Some text.\n\nMore text.");
        assert!(parts.attributes.is_empty());
    }

    #[test]
    fn test_summary_only_paragraph_is_never_a_trailer() {
        let parts = parse_message("Type: bug").unwrap();
        assert_eq!(parts.summary, "Type: bug");
        assert!(parts.attributes.is_empty());
    }

    #[test]
    fn test_mixed_paragraph_is_description() {
        let parts = parse_message("Fix\n\nSee notes below\nType: bug").unwrap();
        assert_eq!(parts.description, "See notes below\nType: bug");
        assert!(parts.attributes.is_empty());
    }

    #[test]
    fn test_hyphen_in_value_is_not_a_key() {
        let parts = parse_message("Fix\n\nTicket: ABC-123 - follow-up: later").unwrap();
        assert_eq!(
            parts.attributes.get("ticket"),
            Some(&AttrValue::from("ABC-123 - follow-up: later"))
        );
    }

    #[test]
    fn test_multi_word_label() {
        let parts = parse_message("Fix\n\nCo-Authored-By: Jane <jane@example.com>").unwrap();
        assert_eq!(
            parts.attributes.get("co_authored_by"),
            Some(&AttrValue::from("Jane <jane@example.com>"))
        );
    }

    #[test]
    fn test_trailer_paragraphs_separated_by_blank_line() {
        let parts = parse_message("Fix\n\nBody\n\nType: bug\n\nJira: X-1").unwrap();
        assert_eq!(parts.description, "Body");
        assert_eq!(parts.attributes.len(), 2);
    }

    #[test]
    fn test_repeated_keys_become_list() {
        let parts = parse_message("Fix\n\nReviewer: a\nReviewer: b").unwrap();
        assert_eq!(
            parts.attributes.get("reviewer"),
            Some(&AttrValue::List(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn test_continuation_lines() {
        let parts = parse_message("Fix\n\nNotes: first\n  second\nType: bug").unwrap();
        assert_eq!(parts.attributes.get("notes"), Some(&AttrValue::from("first\nsecond")));
        assert_eq!(parts.attributes.get("type"), Some(&AttrValue::from("bug")));
    }

    #[test]
    fn test_structural_key_is_not_a_trailer() {
        let parts = parse_message("Fix\n\nSummary: other").unwrap();
        assert_eq!(parts.description, "Summary: other");
        assert!(parts.attributes.is_empty());
    }

    #[test]
    fn test_invalid_choice() {
        let schema = type_schema();
        let commit = CommitParser::new(&schema).parse(&raw_commit("Fix bug\n\nType: chore"));
        assert!(commit.is_parsed());
        assert!(!commit.is_valid());
        assert_eq!(commit.validation_errors().len(), 1);
    }

    #[test]
    fn test_unknown_labels_do_not_fail() {
        let schema = AttributeSchema::default();
        let commit = CommitParser::new(&schema).parse(&raw_commit("Fix\n\nExtra: yes"));
        assert!(commit.is_valid());
        assert_eq!(commit.attribute("extra"), Some(&AttrValue::from("yes")));
    }

    #[test]
    fn test_empty_message_is_unparsed() {
        let schema = AttributeSchema::default();
        let commit = CommitParser::new(&schema).parse(&raw_commit("  \n\n"));
        assert!(!commit.is_parsed());
        assert!(!commit.is_valid());
        assert!(commit.attributes().is_empty());
        assert!(!commit.validation_errors().is_empty());
    }

    #[test]
    fn test_bad_sha_is_unparsed() {
        let schema = AttributeSchema::default();
        let mut raw = raw_commit("Fix bug");
        raw.sha = "xyz".to_string();
        let commit = CommitParser::new(&schema).parse(&raw);
        assert!(!commit.is_parsed());
        assert_eq!(commit.raw_message(), "Fix bug");
    }

    #[test]
    fn test_reparse_is_idempotent() {
        let schema = type_schema();
        let parser = CommitParser::new(&schema);
        let first = parser.parse(&raw_commit("Fix bug\n\nBody\n\nType: bug\nNotes: a\n  b"));
        let mut raw = raw_commit(first.raw_message());
        raw.sha = first.sha().to_string();
        let second = parser.parse(&raw);

        assert_eq!(first.summary(), second.summary());
        assert_eq!(first.description(), second.description());
        assert_eq!(first.attributes(), second.attributes());
        assert_eq!(first.is_parsed(), second.is_parsed());
        assert_eq!(first.is_valid(), second.is_valid());
    }
}
