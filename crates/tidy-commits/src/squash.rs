//! Collapsing a branch into one structured commit
//!
//! The engine moves through `Idle → Snapshotted → Reset → Committed`. Before
//! the branch moves, the current `HEAD` is recorded under [`SNAPSHOT_REF`];
//! any failure afterwards soft-resets back to it. If that reset fails too the
//! snapshot ref is left in place and the error names it so the user can
//! restore by hand.

use git2::{Oid, Signature, Time};
use tracing::{debug, info, instrument, warn};

use tidy_core::error::SquashError;
use tidy_core::schema::Schema;
use tidy_core::types::{Attributes, IdentityPolicy, RevisionRange};
use tidy_git::{GitRepo, HookOutcome, LogOrder, LogQuery, SNAPSHOT_REF};

use crate::commit::Commit;
use crate::compose::{compose_message, verify_composed};
use crate::range::CommitRange;

/// Asks the user for commit attributes
pub trait AttributeCollector {
    /// Collect attributes, pre-filled with `defaults`. `Ok(None)` means the
    /// user cancelled.
    fn collect(&mut self, defaults: &Attributes) -> Result<Option<Attributes>, SquashError>;
}

/// Where a squash run is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquashState {
    Idle,
    /// Snapshot recorded, branch not moved yet
    Snapshotted,
    /// Branch moved to the merge base
    Reset,
    Committed,
    RolledBack,
    /// Rollback failed; the snapshot ref is intact
    Failed,
}

/// Options for a squash run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquashOptions {
    /// Run the pre-commit hook
    pub verify: bool,
    /// Allow a commit whose tree equals the merge base's
    pub allow_empty: bool,
    /// Author identity of the new commit
    pub identity: IdentityPolicy,
}

impl Default for SquashOptions {
    fn default() -> Self {
        Self {
            verify: true,
            allow_empty: false,
            identity: IdentityPolicy::Current,
        }
    }
}

/// Result of a successful squash
#[derive(Debug, Clone)]
pub struct SquashOutcome {
    pub commit: Oid,
    pub base: Oid,
    /// HEAD before the squash
    pub previous_head: Oid,
    /// Number of commits collapsed
    pub squashed: usize,
    pub message: String,
    /// Whether attributes came from an existing commit rather than the
    /// collector
    pub seeded: bool,
}

/// The oldest valid commit of a range in oldest-first order
pub fn select_seed(range: &CommitRange) -> Option<&Commit> {
    range.iter().find(|c| c.is_valid())
}

/// Squashes everything since the merge base with a target into one commit
pub struct SquashEngine<'a> {
    repo: &'a GitRepo,
    schema: &'a dyn Schema,
    options: SquashOptions,
    state: SquashState,
}

impl<'a> SquashEngine<'a> {
    pub fn new(repo: &'a GitRepo, schema: &'a dyn Schema, options: SquashOptions) -> Self {
        Self {
            repo,
            schema,
            options,
            state: SquashState::Idle,
        }
    }

    pub fn state(&self) -> SquashState {
        self.state
    }

    /// Squash `HEAD` down to its merge base with `target`
    #[instrument(skip(self, collector))]
    pub fn run(
        &mut self,
        target: &str,
        collector: &mut dyn AttributeCollector,
    ) -> Result<SquashOutcome, SquashError> {
        if let Some(snapshot) = self.repo.read_snapshot()? {
            return Err(SquashError::SnapshotExists {
                snapshot: snapshot.to_string(),
            });
        }

        let head = self.repo.head_oid()?;
        let target_oid = self.repo.resolve_commit(target)?;
        let base = self
            .repo
            .merge_base(target_oid, head)?
            .ok_or_else(|| SquashError::NoCommonAncestor {
                target: target.to_string(),
            })?;

        let query = LogQuery::new(RevisionRange::new(base.to_string(), head.to_string()))
            .with_order(LogOrder::OldestFirst)
            .with_merges(true);
        let range = CommitRange::load(self.repo, &query, self.schema)?;
        if range.is_empty() {
            return Err(SquashError::NothingToSquash);
        }
        debug!(base = %base, count = range.len(), "squash range loaded");

        let seed = select_seed(&range);
        let attributes = match seed {
            Some(seed) => {
                info!(seed = %seed.sha(), "using existing commit as seed");
                seed.all_attributes()
            }
            None => {
                let defaults = range
                    .iter()
                    .rev()
                    .find(|c| c.is_parsed())
                    .map(Commit::all_attributes)
                    .unwrap_or_default();
                collector
                    .collect(&defaults)?
                    .ok_or(SquashError::Cancelled)?
            }
        };

        let errors = self.schema.validate(&attributes);
        if !errors.is_empty() {
            return Err(SquashError::InvalidAttributes(errors));
        }

        let message = compose_message(self.schema, &attributes);
        verify_composed(self.schema, &attributes, &message)
            .map_err(SquashError::InternalInvariantViolation)?;

        let author = match (self.options.identity, seed) {
            (IdentityPolicy::Seed, Some(seed)) => Some(seed_signature(seed)?),
            _ => None,
        };

        self.repo.write_snapshot(head)?;
        self.state = SquashState::Snapshotted;

        match self.apply(base, &message, author.as_ref()) {
            Ok(commit) => {
                self.state = SquashState::Committed;
                if let Err(e) = self.repo.clear_snapshot() {
                    warn!(error = %e, "squash committed but {SNAPSHOT_REF} could not be removed");
                }
                info!(commit = %commit, squashed = range.len(), "squash complete");
                Ok(SquashOutcome {
                    commit,
                    base,
                    previous_head: head,
                    squashed: range.len(),
                    message,
                    seeded: seed.is_some(),
                })
            }
            Err(err) => Err(self.rollback(head, err.to_string())),
        }
    }

    fn apply(
        &mut self,
        base: Oid,
        message: &str,
        author: Option<&Signature<'static>>,
    ) -> Result<Oid, SquashError> {
        self.repo.reset_soft(base)?;
        self.state = SquashState::Reset;

        if self.options.verify {
            if let HookOutcome::Failed(code) = self.repo.run_pre_commit_hook()? {
                return Err(SquashError::HookFailed(code));
            }
        }

        let tree = self.repo.write_index_tree()?;
        if !self.options.allow_empty && tree == self.repo.tree_of(base)? {
            return Err(SquashError::NothingToCommit);
        }

        let committer = self.repo.signature()?;
        let author = author.unwrap_or(&committer);
        Ok(self
            .repo
            .commit_tree(tree, Some(base), author, &committer, message)?)
    }

    fn rollback(&mut self, snapshot: Oid, reason: String) -> SquashError {
        warn!(%reason, snapshot = %snapshot, "squash failed, rolling back");
        match self.repo.reset_soft(snapshot) {
            Ok(()) => {
                if let Err(e) = self.repo.clear_snapshot() {
                    warn!(error = %e, "rolled back but {SNAPSHOT_REF} could not be removed");
                }
                self.state = SquashState::RolledBack;
                SquashError::RolledBack {
                    reason,
                    snapshot: snapshot.to_string(),
                }
            }
            Err(e) => {
                self.state = SquashState::Failed;
                let snapshot = self
                    .repo
                    .read_snapshot()
                    .ok()
                    .flatten()
                    .unwrap_or(snapshot);
                SquashError::RollbackFailed {
                    reason,
                    rollback: e.to_string(),
                    snapshot: snapshot.to_string(),
                }
            }
        }
    }

    /// Restore the branch recorded by an interrupted squash and drop the
    /// snapshot
    #[instrument(skip(repo))]
    pub fn recover(repo: &GitRepo) -> Result<Oid, SquashError> {
        let snapshot = repo.read_snapshot()?.ok_or(SquashError::NoSnapshot)?;
        repo.reset_soft(snapshot)?;
        repo.clear_snapshot()?;
        info!(snapshot = %snapshot, "recovered from squash snapshot");
        Ok(snapshot)
    }
}

fn seed_signature(seed: &Commit) -> Result<Signature<'static>, SquashError> {
    let time = match seed.author_date() {
        Some(date) => Time::new(date.timestamp(), date.offset().local_minus_utc() / 60),
        None => Time::new(0, 0),
    };
    Ok(Signature::new(seed.author_name(), seed.author_email(), &time)?)
}
