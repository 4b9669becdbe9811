//! Markdown log renderer

use tracing::{debug, instrument};

use tidy_core::error::TidyError;

use super::{LogRenderer, RenderContext};
use crate::range::{CommitRange, GroupOptions};

/// Renders commits under one heading per tag, with tag dates
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    /// Include the abbreviated sha after each entry
    pub include_hashes: bool,
    /// Include the author after each entry
    pub include_authors: bool,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            include_hashes: true,
            include_authors: true,
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogRenderer for MarkdownRenderer {
    #[instrument(skip_all, fields(commits = range.len()))]
    fn render(&self, range: &CommitRange, context: &RenderContext) -> Result<String, TidyError> {
        let mut output = String::new();

        for (_, commits) in range.group("tag", GroupOptions::new())? {
            let tag = commits.get(0).and_then(|c| c.tag());
            match tag {
                Some(tag) => {
                    output.push_str(&format!("## {}", tag.name));
                    if let Some(date) = tag.timestamp {
                        output.push_str(&format!(" ({})", date.format("%Y-%m-%d")));
                    }
                }
                None => output.push_str(&format!("## {}", context.unreleased_title)),
            }
            output.push_str("\n\n");

            for commit in &commits {
                output.push_str(&format!("- {}", commit.summary()));

                let mut meta = Vec::new();
                if self.include_authors {
                    meta.push(commit.author_name());
                }
                if self.include_hashes {
                    meta.push(commit.short_sha());
                }
                if !meta.is_empty() {
                    output.push_str(&format!(" [{}]", meta.join(", ")));
                }
                output.push('\n');

                if !commit.description().is_empty() {
                    output.push('\n');
                    for line in commit.description().lines() {
                        if line.is_empty() {
                            output.push('\n');
                        } else {
                            output.push_str(&format!("    {line}\n"));
                        }
                    }
                    output.push('\n');
                }
            }

            output.push('\n');
        }

        debug!(output_len = output.len(), "markdown log rendered");
        Ok(output)
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}
