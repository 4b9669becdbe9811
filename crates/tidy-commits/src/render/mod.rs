//! Log renderers

mod json;
mod markdown;

pub use json::JsonRenderer;
pub use markdown::MarkdownRenderer;

use tidy_core::error::TidyError;

use crate::range::CommitRange;

/// What a renderer knows besides the commits
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// The range token as the user gave it
    pub range: String,
    /// Where the output is going, if not stdout
    pub output: Option<String>,
    /// Heading for commits no tag contains
    pub unreleased_title: String,
}

impl RenderContext {
    pub fn new(range: impl Into<String>) -> Self {
        Self {
            range: range.into(),
            output: None,
            unreleased_title: "Unreleased".to_string(),
        }
    }

    pub fn with_output(mut self, output: Option<String>) -> Self {
        self.output = output;
        self
    }

    pub fn with_unreleased_title(mut self, title: impl Into<String>) -> Self {
        self.unreleased_title = title.into();
        self
    }
}

/// Trait for log renderers
pub trait LogRenderer: Send + Sync {
    /// Render a range to text
    fn render(&self, range: &CommitRange, context: &RenderContext) -> Result<String, TidyError>;

    /// File extension for this format
    fn extension(&self) -> &'static str;
}

/// Renderer for a style name, if there is one
pub fn renderer_for(style: &str) -> Option<Box<dyn LogRenderer>> {
    match style {
        "default" | "markdown" | "md" => Some(Box::new(MarkdownRenderer::new())),
        "json" => Some(Box::new(JsonRenderer::new())),
        _ => None,
    }
}
