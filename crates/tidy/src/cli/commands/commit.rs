//! Commit command

use clap::Args;
use console::style;
use tracing::info;

use tidy_commits::{create_commit, CommitOptions};

use super::Workspace;
use crate::cli::output::{sha_style, short_sha};
use crate::cli::prompt::DialoguerCollector;
use crate::cli::{Cli, OutputFormat};

/// Create a structured commit of the staged changes
#[derive(Debug, Args)]
pub struct CommitCommand {
    /// Skip the pre-commit hook
    #[arg(long)]
    pub no_verify: bool,

    /// Commit even when nothing is staged
    #[arg(long)]
    pub allow_empty: bool,
}

impl CommitCommand {
    /// Execute the commit command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(no_verify = self.no_verify, allow_empty = self.allow_empty, "executing commit command");
        let workspace = Workspace::open()?;

        let options = CommitOptions {
            verify: !self.no_verify,
            allow_empty: self.allow_empty,
            ..CommitOptions::default()
        };
        let mut collector = DialoguerCollector::new(&workspace.schema);
        let oid = create_commit(&workspace.repo, &workspace.schema, &mut collector, &options)?;

        let sha = oid.to_string();
        let summary = workspace
            .repo
            .head_commit()?
            .summary()
            .unwrap_or_default()
            .to_string();

        match cli.format {
            OutputFormat::Json => {
                let out = serde_json::json!({ "sha": sha, "summary": summary });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!(
                        "{} [{}] {}",
                        style("✓").green().bold(),
                        sha_style().apply_to(short_sha(&sha)),
                        summary
                    );
                }
            }
        }

        Ok(())
    }
}
