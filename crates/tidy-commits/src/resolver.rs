//! Turning user range tokens into concrete revisions

use tracing::{debug, instrument};

use tidy_core::config::GITHUB_PR_TOKEN;
use tidy_core::error::{HostError, ResolveError};
use tidy_core::types::RevisionRange;
use tidy_git::GitRepo;

/// A code host that knows about the pull request of the current branch
pub trait PullRequestHost {
    /// Base and head revisions of the single open pull request for the
    /// checked-out branch
    fn lookup_current_pr(&self, repo: &GitRepo) -> Result<RevisionRange, ResolveError>;
}

/// Resolves range tokens against a repository.
///
/// Accepted tokens: empty (everything reachable from `HEAD`), `A..B`, `A..`
/// (up to `HEAD`), `..B` (from the root), a single revision, and the
/// symbolic pull request token.
pub struct RangeResolver<'a> {
    repo: &'a GitRepo,
    host: Option<&'a dyn PullRequestHost>,
    pr_token: String,
}

impl<'a> RangeResolver<'a> {
    pub fn new(repo: &'a GitRepo) -> Self {
        Self {
            repo,
            host: None,
            pr_token: GITHUB_PR_TOKEN.to_string(),
        }
    }

    /// Use a host for the pull request token
    pub fn with_host(mut self, host: &'a dyn PullRequestHost) -> Self {
        self.host = Some(host);
        self
    }

    /// Change the symbolic pull request token
    pub fn with_pr_token(mut self, token: impl Into<String>) -> Self {
        self.pr_token = token.into();
        self
    }

    /// Whether a token names the current pull request
    pub fn is_pr_token(&self, token: &str) -> bool {
        token.trim() == self.pr_token
    }

    #[instrument(skip(self))]
    pub fn resolve(&self, token: &str) -> Result<RevisionRange, ResolveError> {
        let token = token.trim();

        let range = if self.is_pr_token(token) {
            let host = self.host.ok_or_else(|| {
                HostError::Configuration(format!("no code host configured for {token}"))
            })?;
            host.lookup_current_pr(self.repo)?
        } else if token.is_empty() {
            RevisionRange::from_root("HEAD")
        } else if let Some((base, head)) = token.split_once("..") {
            let head = if head.is_empty() { "HEAD" } else { head };
            RevisionRange::new(base, head)
        } else {
            RevisionRange::from_root(token)
        };

        self.check(&range.head)?;
        if !range.is_from_root() {
            self.check(&range.base)?;
        }

        debug!(%range, "resolved range");
        Ok(range)
    }

    fn check(&self, revision: &str) -> Result<(), ResolveError> {
        if self.repo.revision_exists(revision)? {
            Ok(())
        } else {
            Err(ResolveError::UnknownRevision(revision.to_string()))
        }
    }
}
