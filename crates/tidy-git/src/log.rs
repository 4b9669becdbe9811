//! Commit log retrieval

use chrono::{DateTime, Utc};
use git2::{ErrorCode, Oid, Sort};
use tracing::{debug, instrument};

use tidy_core::error::GitError;
use tidy_core::types::RevisionRange;

use crate::repository::{GitRepo, Result};
use crate::tags::TagIndex;
use crate::types::{RawCommit, RawSignature};

/// Order in which the log is returned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogOrder {
    /// Most recent first, like `git log`
    #[default]
    NewestFirst,
    /// Oldest first, like `git log --reverse`
    OldestFirst,
}

/// What to read from the log
#[derive(Debug, Clone)]
pub struct LogQuery {
    /// Revisions to walk
    pub range: RevisionRange,
    /// Direction of the result
    pub order: LogOrder,
    /// Skip commits with more than one parent
    pub no_merges: bool,
    /// Only commits committed strictly before this instant
    pub before: Option<DateTime<Utc>>,
    /// Only commits committed strictly after this instant
    pub after: Option<DateTime<Utc>>,
    /// Associate the nearest containing tag with each commit
    pub with_tags: bool,
    /// Glob restricting which tags are considered
    pub tag_match: Option<String>,
}

impl LogQuery {
    /// Query a range newest first, skipping merges
    pub fn new(range: RevisionRange) -> Self {
        Self {
            range,
            order: LogOrder::NewestFirst,
            no_merges: true,
            before: None,
            after: None,
            with_tags: false,
            tag_match: None,
        }
    }

    /// Set the direction
    pub fn with_order(mut self, order: LogOrder) -> Self {
        self.order = order;
        self
    }

    /// Include or skip merge commits
    pub fn with_merges(mut self, include: bool) -> Self {
        self.no_merges = !include;
        self
    }

    /// Only commits before an instant
    pub fn before(mut self, instant: DateTime<Utc>) -> Self {
        self.before = Some(instant);
        self
    }

    /// Only commits after an instant
    pub fn after(mut self, instant: DateTime<Utc>) -> Self {
        self.after = Some(instant);
        self
    }

    /// Resolve tags, optionally restricted to a glob
    pub fn with_tags(mut self, tag_match: Option<String>) -> Self {
        self.with_tags = true;
        self.tag_match = tag_match;
        self
    }

    fn accepts(&self, commit: &git2::Commit<'_>) -> bool {
        if self.no_merges && commit.parent_count() > 1 {
            return false;
        }
        let committed = commit.committer().when().seconds();
        if self.before.is_some_and(|b| committed >= b.timestamp()) {
            return false;
        }
        if self.after.is_some_and(|a| committed <= a.timestamp()) {
            return false;
        }
        true
    }
}

impl GitRepo {
    /// Resolve a revision expression to the commit it names
    pub fn resolve_commit(&self, spec: &str) -> Result<Oid> {
        let object = self.repo.revparse_single(spec)?;
        Ok(object.peel_to_commit()?.id())
    }

    /// Whether a revision expression names a commit
    pub fn revision_exists(&self, spec: &str) -> Result<bool> {
        match self.resolve_commit(spec) {
            Ok(_) => Ok(true),
            Err(GitError::Git2(e))
                if matches!(
                    e.code(),
                    ErrorCode::NotFound | ErrorCode::Ambiguous | ErrorCode::InvalidSpec
                ) || e.class() == git2::ErrorClass::Object =>
            {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Read raw commit records for a query.
    ///
    /// Records come back fully assembled in the requested order; callers can
    /// rely on the order without re-sorting.
    #[instrument(skip(self), fields(range = %query.range))]
    pub fn log(&self, query: &LogQuery) -> Result<Vec<RawCommit>> {
        let head = self.resolve_commit(&query.range.head)?;

        let mut revwalk = self.repo.revwalk()?;
        let mut sorting = Sort::TOPOLOGICAL | Sort::TIME;
        if query.order == LogOrder::OldestFirst {
            sorting |= Sort::REVERSE;
        }
        revwalk.set_sorting(sorting)?;
        revwalk.push(head)?;
        if !query.range.is_from_root() {
            revwalk.hide(self.resolve_commit(&query.range.base)?)?;
        }

        let tag_index = if query.with_tags {
            let index = TagIndex::build(self, query.tag_match.as_deref())?;
            debug!(tags = index.len(), "indexed tags");
            Some(index).filter(|index| !index.is_empty())
        } else {
            None
        };

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            if !query.accepts(&commit) {
                continue;
            }

            let tag = match &tag_index {
                Some(index) => index.nearest_containing(self, commit.id())?,
                None => None,
            };

            commits.push(RawCommit {
                sha: commit.id().to_string(),
                author: RawSignature::from_git(&commit.author()),
                committer: RawSignature::from_git(&commit.committer()),
                message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
                parent_count: commit.parent_count(),
                tag,
            });
        }

        debug!(count = commits.len(), "read commit log");
        Ok(commits)
    }
}
