//! Squash command

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use tidy_commits::{SquashEngine, SquashOptions, SquashOutcome};

use super::Workspace;
use crate::cli::output::{self, key_value, sha_style, short_sha};
use crate::cli::prompt::DialoguerCollector;
use crate::cli::{Cli, OutputFormat};

/// Collapse the current branch into one structured commit
#[derive(Debug, Args)]
pub struct SquashCommand {
    /// Squash every commit since the merge base with this revision
    /// (or the base branch of the open pull request)
    #[arg(value_name = "REF", required_unless_present = "recover")]
    pub target: Option<String>,

    /// Skip the pre-commit hook
    #[arg(long)]
    pub no_verify: bool,

    /// Allow a squash that produces no changes
    #[arg(long)]
    pub allow_empty: bool,

    /// Restore the branch from an interrupted squash
    #[arg(long, conflicts_with_all = ["target", "no_verify", "allow_empty"])]
    pub recover: bool,
}

#[derive(Debug, Serialize)]
struct SquashReport {
    commit: String,
    base: String,
    previous_head: String,
    squashed: usize,
    seeded: bool,
}

impl From<&SquashOutcome> for SquashReport {
    fn from(outcome: &SquashOutcome) -> Self {
        Self {
            commit: outcome.commit.to_string(),
            base: outcome.base.to_string(),
            previous_head: outcome.previous_head.to_string(),
            squashed: outcome.squashed,
            seeded: outcome.seeded,
        }
    }
}

impl SquashCommand {
    fn options(&self, workspace: &Workspace) -> SquashOptions {
        let configured = &workspace.config.squash;
        SquashOptions {
            verify: configured.verify && !self.no_verify,
            allow_empty: configured.allow_empty || self.allow_empty,
            identity: configured.identity,
        }
    }

    /// Execute the squash command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            target = ?self.target,
            no_verify = self.no_verify,
            allow_empty = self.allow_empty,
            recover = self.recover,
            "executing squash command"
        );
        let workspace = Workspace::open()?;

        if self.recover {
            let restored = SquashEngine::recover(&workspace.repo)?;
            if !cli.quiet {
                output::success(&format!(
                    "Branch restored to {}",
                    sha_style().apply_to(short_sha(&restored.to_string()))
                ));
            }
            return Ok(());
        }

        let Some(target) = self.target.as_deref() else {
            anyhow::bail!("A revision to squash against is required");
        };
        // The pull request token squashes onto the PR's base branch
        let target = if workspace.is_pr_token(target) {
            workspace.resolve(target)?.base
        } else {
            target.to_string()
        };

        let mut collector = DialoguerCollector::new(&workspace.schema);
        let mut engine =
            SquashEngine::new(&workspace.repo, &workspace.schema, self.options(&workspace));
        let outcome = engine.run(&target, &mut collector)?;

        match cli.format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&SquashReport::from(&outcome))?
                );
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    let commit = outcome.commit.to_string();
                    println!(
                        "{} Squashed {} commit(s) into {}",
                        style("✓").green().bold(),
                        outcome.squashed,
                        sha_style().apply_to(short_sha(&commit))
                    );
                    println!("{}", key_value("onto", &target));
                    println!(
                        "{}",
                        key_value("previous head", &outcome.previous_head.to_string())
                    );
                    if !outcome.seeded {
                        output::info("Commit attributes were collected interactively");
                    }
                }
            }
        }

        Ok(())
    }
}
