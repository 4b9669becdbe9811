//! Log command

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::Args;
use console::style;
use tracing::info;

use tidy_commits::{renderer_for, CommitRange, RenderContext};
use tidy_git::{LogOrder, LogQuery};
use tidy_github::GitHubClient;

use super::Workspace;
use crate::cli::output::path_style;
use crate::cli::{Cli, OutputFormat};

/// Render the commits of a range
#[derive(Debug, Args)]
pub struct LogCommand {
    /// Range of commits (`A..B`, `A..`, `..B`, a revision, or the pull request token)
    #[arg(value_name = "RANGE")]
    pub range: Option<String>,

    /// Renderer style (defaults to the configured style)
    #[arg(long)]
    pub style: Option<String>,

    /// Glob restricting which tags are associated with commits
    #[arg(long)]
    pub tag_match: Option<String>,

    /// Only commits before a date (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub before: Option<DateTime<Utc>>,

    /// Only commits after a date (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub after: Option<DateTime<Utc>>,

    /// Oldest commits first
    #[arg(long)]
    pub reverse: bool,

    /// Output file, or the pull request token to post a comment
    #[arg(short, long)]
    pub output: Option<String>,
}

impl LogCommand {
    fn query(&self, workspace: &Workspace) -> anyhow::Result<LogQuery> {
        let token = self.range.as_deref().unwrap_or_default();
        let range = workspace.resolve(token)?;

        let order = if self.reverse {
            LogOrder::OldestFirst
        } else {
            LogOrder::NewestFirst
        };
        let tag_match = self
            .tag_match
            .clone()
            .or_else(|| workspace.config.log.tag_match.clone());

        let mut query = LogQuery::new(range)
            .with_order(order)
            .with_merges(!workspace.config.log.no_merges)
            .with_tags(tag_match);
        if let Some(before) = self.before {
            query = query.before(before);
        }
        if let Some(after) = self.after {
            query = query.after(after);
        }
        Ok(query)
    }

    /// Execute the log command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            range = ?self.range,
            style = ?self.style,
            output = ?self.output,
            reverse = self.reverse,
            "executing log command"
        );
        let workspace = Workspace::open()?;

        let style_name = match cli.format {
            OutputFormat::Json => "json".to_string(),
            OutputFormat::Text => self
                .style
                .clone()
                .unwrap_or_else(|| workspace.config.log.style.clone()),
        };
        let Some(renderer) = renderer_for(&style_name) else {
            anyhow::bail!("Unknown log style \"{style_name}\"");
        };

        let query = self.query(&workspace)?;
        let commits = CommitRange::load(&workspace.repo, &query, &workspace.schema)?;

        let context = RenderContext::new(self.range.clone().unwrap_or_default())
            .with_output(self.output.clone())
            .with_unreleased_title(workspace.config.log.unreleased_title.clone());
        let rendered = renderer.render(&commits, &context)?;

        match self.output.as_deref() {
            None => print!("{rendered}"),
            Some(target) if workspace.is_pr_token(target) => {
                let client = GitHubClient::from_config(&workspace.config.github)?;
                let comment = client.comment_on_current_pr(&workspace.repo, &rendered)?;
                if !cli.quiet {
                    println!(
                        "{} Log posted to {}",
                        style("✓").green().bold(),
                        path_style().apply_to(&comment.html_url)
                    );
                }
            }
            Some(path) => {
                std::fs::write(path, &rendered)
                    .with_context(|| format!("Failed to write log to {path}"))?;
                if !cli.quiet {
                    println!(
                        "{} Log written to {}",
                        style("✓").green().bold(),
                        path_style().apply_to(path)
                    );
                }
            }
        }

        Ok(())
    }
}

/// Parse a date bound. Bare dates mean midnight UTC.
fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| format!("invalid date \"{value}\", expected RFC 3339 or YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Commands;
    use clap::Parser;

    #[test]
    fn test_parse_date_formats() {
        let expected = Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_date("2023-05-01").unwrap(), expected);
        assert_eq!(parse_date("2023-05-01T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_date("2023-05-01T02:00:00+02:00").unwrap(), expected);
        assert_eq!(
            parse_date("2023-05-01 12:30:00").unwrap(),
            Utc.with_ymd_and_hms(2023, 5, 1, 12, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("last tuesday").is_err());
    }

    #[test]
    fn test_parse_log_options() {
        let cli = Cli::try_parse_from([
            "git-tidy",
            "log",
            "v1.0..",
            "--reverse",
            "--tag-match",
            "v*",
            "--after",
            "2023-01-01",
            "-o",
            ":github/pr",
        ])
        .unwrap();
        match cli.command {
            Commands::Log(cmd) => {
                assert_eq!(cmd.range.as_deref(), Some("v1.0.."));
                assert!(cmd.reverse);
                assert_eq!(cmd.tag_match.as_deref(), Some("v*"));
                assert!(cmd.after.is_some());
                assert!(cmd.before.is_none());
                assert_eq!(cmd.output.as_deref(), Some(":github/pr"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
