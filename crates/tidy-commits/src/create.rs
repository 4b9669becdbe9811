//! Structured commits of the staged changes

use git2::Oid;
use tracing::{info, instrument};

use tidy_core::error::SquashError;
use tidy_core::schema::Schema;
use tidy_core::types::Attributes;
use tidy_git::{GitRepo, HookOutcome};

use crate::compose::{compose_message, verify_composed};
use crate::squash::AttributeCollector;

/// Options for [`create_commit`]
#[derive(Debug, Clone)]
pub struct CommitOptions {
    /// Run the pre-commit hook before prompting
    pub verify: bool,
    /// Commit even when nothing is staged
    pub allow_empty: bool,
    /// Values offered to the collector
    pub defaults: Attributes,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self {
            verify: true,
            allow_empty: false,
            defaults: Attributes::new(),
        }
    }
}

/// Commit the index with a message built from collected attributes.
///
/// The hook and the staged-changes check run before the collector so the
/// user is not prompted for a commit that cannot be made.
#[instrument(skip_all)]
pub fn create_commit(
    repo: &GitRepo,
    schema: &dyn Schema,
    collector: &mut dyn AttributeCollector,
    options: &CommitOptions,
) -> Result<Oid, SquashError> {
    if options.verify {
        if let HookOutcome::Failed(code) = repo.run_pre_commit_hook()? {
            return Err(SquashError::HookFailed(code));
        }
    }

    if !options.allow_empty && !repo.has_staged_changes()? {
        return Err(SquashError::NothingToCommit);
    }

    let attributes = collector
        .collect(&options.defaults)?
        .ok_or(SquashError::Cancelled)?;

    let errors = schema.validate(&attributes);
    if !errors.is_empty() {
        return Err(SquashError::InvalidAttributes(errors));
    }

    let message = compose_message(schema, &attributes);
    verify_composed(schema, &attributes, &message)
        .map_err(SquashError::InternalInvariantViolation)?;

    let tree = repo.write_index_tree()?;
    let parent = repo.head_oid_opt()?;
    let signature = repo.signature()?;
    let commit = repo.commit_tree(tree, parent, &signature, &signature, &message)?;

    info!(commit = %commit, "created structured commit");
    Ok(commit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{init_repo, open, type_schema};
    use std::path::Path;
    use tidy_core::types::AttrValue;

    struct Fixed(Option<Attributes>);

    impl AttributeCollector for Fixed {
        fn collect(&mut self, _defaults: &Attributes) -> Result<Option<Attributes>, SquashError> {
            Ok(self.0.clone())
        }
    }

    fn answer() -> Fixed {
        Fixed(Some(
            [("summary", "Add file"), ("type", "feature")]
                .iter()
                .map(|(k, v)| (k.to_string(), AttrValue::from(*v)))
                .collect(),
        ))
    }

    fn stage(raw: &git2::Repository, root: &Path, name: &str) {
        std::fs::write(root.join(name), "content").unwrap();
        let mut index = raw.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
    }

    #[test]
    fn test_root_commit() {
        let (temp, raw) = init_repo();
        stage(&raw, temp.path(), "a.txt");
        let repo = open(&temp);

        let oid = create_commit(&repo, &type_schema(), &mut answer(), &CommitOptions::default()).unwrap();

        let commit = raw.find_commit(oid).unwrap();
        assert_eq!(commit.parent_count(), 0);
        assert_eq!(commit.message(), Some("Add file\n\nType: feature"));
    }

    #[test]
    fn test_nothing_staged() {
        let (temp, _raw) = init_repo();
        let repo = open(&temp);
        let err = create_commit(&repo, &type_schema(), &mut answer(), &CommitOptions::default())
            .unwrap_err();
        assert!(matches!(err, SquashError::NothingToCommit));

        let options = CommitOptions {
            allow_empty: true,
            ..CommitOptions::default()
        };
        assert!(create_commit(&repo, &type_schema(), &mut answer(), &options).is_ok());
    }

    #[test]
    fn test_cancelled() {
        let (temp, raw) = init_repo();
        stage(&raw, temp.path(), "a.txt");
        let repo = open(&temp);
        let err = create_commit(&repo, &type_schema(), &mut Fixed(None), &CommitOptions::default())
            .unwrap_err();
        assert!(matches!(err, SquashError::Cancelled));
        assert_eq!(repo.head_oid_opt().unwrap(), None);
    }
}
