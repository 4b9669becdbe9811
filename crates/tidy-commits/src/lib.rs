//! Tidy Commits - the commit-log data model for git-tidy
//!
//! Raw log records from `tidy-git` are parsed into [`Commit`] values against
//! a schema, collected into a [`CommitRange`] that can be filtered and
//! grouped, linted, rendered, or collapsed into a single structured commit
//! by the [`SquashEngine`].

pub mod commit;
pub mod compose;
pub mod create;
pub mod lint;
pub mod parser;
pub mod range;
pub mod render;
pub mod resolver;
pub mod squash;
pub mod trailer;

#[cfg(test)]
pub(crate) mod testing;

pub use commit::{Commit, FieldValue};
pub use compose::{compose_message, message_template, verify_composed};
pub use create::{create_commit, CommitOptions};
pub use lint::{evaluate, LintFailure, LintResult};
pub use parser::{parse_message, CommitParser, MessageParts};
pub use range::{CommitRange, GroupOptions, Groups, KeyOrder, NonePlacement};
pub use render::{renderer_for, JsonRenderer, LogRenderer, MarkdownRenderer, RenderContext};
pub use resolver::{PullRequestHost, RangeResolver};
pub use squash::{
    select_seed, AttributeCollector, SquashEngine, SquashOptions, SquashOutcome, SquashState,
};
pub use trailer::{label_to_trailer_key, trailer_key_to_label};
