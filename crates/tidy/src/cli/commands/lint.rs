//! Lint command

use clap::Args;
use console::style;
use tracing::info;

use tidy_commits::{evaluate, CommitRange};
use tidy_core::types::LintMode;
use tidy_git::LogQuery;

use super::Workspace;
use crate::cli::output::{self, sha_style, short_sha};
use crate::cli::{Cli, OutputFormat};
use crate::exit_codes::{ExitError, VALIDATION_ERROR};

/// Check the commits of a range against the schema
#[derive(Debug, Args)]
pub struct LintCommand {
    /// Range of commits (`A..B`, `A..`, `..B`, a revision, or the pull request token)
    #[arg(value_name = "RANGE")]
    pub range: Option<String>,

    /// Pass if at least one commit is valid
    #[arg(long)]
    pub any: bool,
}

impl LintCommand {
    fn mode(&self, configured: LintMode) -> LintMode {
        if self.any {
            LintMode::Any
        } else {
            configured
        }
    }

    /// Execute the lint command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(range = ?self.range, any = self.any, "executing lint command");
        let workspace = Workspace::open()?;
        let token = self.range.as_deref().unwrap_or_default();
        let range = workspace.resolve(token)?;

        let query = LogQuery::new(range).with_merges(!workspace.config.log.no_merges);
        let commits = CommitRange::load(&workspace.repo, &query, &workspace.schema)?;
        let result = evaluate(&commits, self.mode(workspace.config.lint.mode));
        info!(passed = result.passed, failures = result.failures.len(), total = result.total, "lint finished");

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            OutputFormat::Text => {
                for failure in &result.failures {
                    eprintln!(
                        "{} {}",
                        sha_style().apply_to(short_sha(&failure.sha)),
                        failure.summary
                    );
                    for error in &failure.errors {
                        eprintln!("    {}", style(error).red());
                    }
                }
                if result.passed && !cli.quiet {
                    if result.failures.is_empty() {
                        output::success(&format!("{} commits passed linting", result.total));
                    } else {
                        output::warning(&result.summary());
                    }
                }
            }
        }

        if !result.passed {
            return Err(ExitError::new(VALIDATION_ERROR, result.summary()).into());
        }

        Ok(())
    }
}
