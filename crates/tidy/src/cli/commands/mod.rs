//! CLI commands

mod commit;
mod completions;
mod lint;
mod log;
mod squash;
mod template;

pub use commit::CommitCommand;
pub use completions::CompletionsCommand;
pub use lint::LintCommand;
pub use log::LogCommand;
pub use squash::SquashCommand;
pub use template::TemplateCommand;

use anyhow::Context;
use tracing::debug;

use tidy_commits::RangeResolver;
use tidy_core::config::{load_config_or_default, Config};
use tidy_core::schema::AttributeSchema;
use tidy_core::types::RevisionRange;
use tidy_git::GitRepo;
use tidy_github::GitHubClient;

/// Repository, configuration and schema shared by most commands
pub(crate) struct Workspace {
    pub repo: GitRepo,
    pub config: Config,
    pub schema: AttributeSchema,
}

impl Workspace {
    /// Discover the repository around the working directory and load its
    /// configuration and schema
    pub fn open() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let repo = GitRepo::discover(&cwd)?;
        let (config, config_path) = load_config_or_default(repo.path());
        debug!(config = ?config_path, "configuration loaded");

        let schema_path = repo.path().join(&config.schema.path);
        let schema = AttributeSchema::load(&schema_path)
            .with_context(|| format!("Failed to load schema from {}", schema_path.display()))?;

        Ok(Self {
            repo,
            config,
            schema,
        })
    }

    /// Whether `token` names the open pull request
    pub fn is_pr_token(&self, token: &str) -> bool {
        token.trim() == self.config.github.pr_token
    }

    /// Resolve a range token, talking to GitHub only for the pull request
    /// token
    pub fn resolve(&self, token: &str) -> anyhow::Result<RevisionRange> {
        let client;
        let mut resolver =
            RangeResolver::new(&self.repo).with_pr_token(self.config.github.pr_token.clone());
        if resolver.is_pr_token(token) {
            client = GitHubClient::from_config(&self.config.github)?;
            resolver = resolver.with_host(&client);
        }
        Ok(resolver.resolve(token)?)
    }
}
