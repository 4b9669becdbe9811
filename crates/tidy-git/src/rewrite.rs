//! History rewriting primitives used by the squash engine

use git2::{ErrorCode, Oid, ResetType, Signature};
use tracing::{debug, info, instrument, warn};

use tidy_core::error::GitError;

use crate::repository::{GitRepo, Result};

/// Reference holding the pre-squash HEAD until the squash completes
pub const SNAPSHOT_REF: &str = "refs/tidy/squash-snapshot";

const ORIG_HEAD: &str = "ORIG_HEAD";

impl GitRepo {
    /// Object id of the commit HEAD points to
    pub fn head_oid(&self) -> Result<Oid> {
        Ok(self.head_commit()?.id())
    }

    /// Object id of HEAD, or `None` on an unborn branch
    pub fn head_oid_opt(&self) -> Result<Option<Oid>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?.id())),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Whether the index differs from HEAD
    pub fn has_staged_changes(&self) -> Result<bool> {
        let index = self.write_index_tree()?;
        match self.head_oid_opt()? {
            Some(head) => Ok(index != self.tree_of(head)?),
            None => Ok(!self.repo.index()?.is_empty()),
        }
    }

    /// Best common ancestor of two commits, if they share history
    pub fn merge_base(&self, one: Oid, two: Oid) -> Result<Option<Oid>> {
        match self.repo.merge_base(one, two) {
            Ok(oid) => Ok(Some(oid)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Record `oid` as the recovery snapshot. Fails if one already exists.
    ///
    /// `ORIG_HEAD` is pointed at the same commit so plain git tooling can
    /// find it too; failing to update it is not fatal.
    #[instrument(skip(self))]
    pub fn write_snapshot(&self, oid: Oid) -> Result<()> {
        self.repo
            .reference(SNAPSHOT_REF, oid, false, "tidy: squash snapshot")?;
        if let Err(e) = self.repo.reference(ORIG_HEAD, oid, true, "tidy: squash") {
            warn!(error = %e, "failed to update ORIG_HEAD");
        }
        info!(snapshot = %oid, "wrote squash snapshot");
        Ok(())
    }

    /// The recorded snapshot, if any
    pub fn read_snapshot(&self) -> Result<Option<Oid>> {
        match self.repo.find_reference(SNAPSHOT_REF) {
            Ok(reference) => Ok(reference.target()),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Delete the snapshot reference if present
    pub fn clear_snapshot(&self) -> Result<()> {
        match self.repo.find_reference(SNAPSHOT_REF) {
            Ok(mut reference) => {
                reference.delete()?;
                debug!("cleared squash snapshot");
                Ok(())
            }
            Err(e) if e.code() == ErrorCode::NotFound => Ok(()),
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Move the current branch to `oid`, keeping the index and working tree
    #[instrument(skip(self))]
    pub fn reset_soft(&self, oid: Oid) -> Result<()> {
        let object = self.repo.find_object(oid, None)?;
        self.repo.reset(&object, ResetType::Soft, None)?;
        info!(target = %oid, "soft reset");
        Ok(())
    }

    /// Write the on-disk index as a tree and return its id
    pub fn write_index_tree(&self) -> Result<Oid> {
        let mut index = self.repo.index()?;
        // Hooks and other processes may have rewritten the index file
        index.read(true)?;
        Ok(index.write_tree()?)
    }

    /// Tree id of a commit
    pub fn tree_of(&self, commit: Oid) -> Result<Oid> {
        Ok(self.repo.find_commit(commit)?.tree_id())
    }

    /// Commit `tree` on top of `parent` (none for a root commit) and advance
    /// HEAD to it
    #[instrument(skip(self, author, committer, message))]
    pub fn commit_tree(
        &self,
        tree: Oid,
        parent: Option<Oid>,
        author: &Signature<'_>,
        committer: &Signature<'_>,
        message: &str,
    ) -> Result<Oid> {
        let tree = self.repo.find_tree(tree)?;
        let parents = match parent {
            Some(oid) => vec![self.repo.find_commit(oid)?],
            None => Vec::new(),
        };
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();
        let oid = self
            .repo
            .commit(Some("HEAD"), author, committer, message, &tree, &parent_refs)?;
        info!(commit = %oid, "created commit");
        Ok(oid)
    }
}
