//! JSON log renderer

use serde::Serialize;

use tidy_core::error::TidyError;

use super::{LogRenderer, RenderContext};
use crate::commit::Commit;
use crate::range::CommitRange;

/// Renders the range and every parsed commit as pretty JSON
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct JsonLog<'a> {
    range: &'a str,
    base: &'a str,
    head: &'a str,
    commits: &'a [Commit],
}

impl LogRenderer for JsonRenderer {
    fn render(&self, range: &CommitRange, context: &RenderContext) -> Result<String, TidyError> {
        let log = JsonLog {
            range: &context.range,
            base: &range.range().base,
            head: &range.range().head,
            commits: range.commits(),
        };
        let mut output = serde_json::to_string_pretty(&log)?;
        output.push('\n');
        Ok(output)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{parse, raw_commit, type_schema};
    use tidy_core::types::RevisionRange;
    use tidy_git::LogOrder;

    #[test]
    fn test_render_json() {
        let commit = parse(&type_schema(), &raw_commit("Fix\n\nType: bug"));
        let range = CommitRange::new(vec![commit], RevisionRange::new("v1.0", "HEAD"), LogOrder::NewestFirst);

        let output = JsonRenderer::new()
            .render(&range, &RenderContext::new("v1.0.."))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["range"], "v1.0..");
        assert_eq!(value["base"], "v1.0");
        assert_eq!(value["commits"][0]["summary"], "Fix");
        assert_eq!(value["commits"][0]["attributes"]["type"], "bug");
        assert_eq!(value["commits"][0]["is_valid"], true);
    }
}
