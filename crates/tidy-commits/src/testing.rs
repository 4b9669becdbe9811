//! Fixtures for unit tests

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use git2::{Oid, Repository, Signature, Time};
use tempfile::TempDir;

use tidy_core::schema::{AttributeDef, AttributeSchema, Schema};
use tidy_git::{GitRepo, RawCommit, RawSignature};

use crate::commit::Commit;
use crate::parser::CommitParser;

static NEXT_SHA: AtomicU64 = AtomicU64::new(1);

/// A raw record with a unique sha and fixed identities
pub fn raw_commit(message: &str) -> RawCommit {
    let sig = RawSignature::new("Test", "test@example.com", 1_700_000_000, 60);
    RawCommit {
        sha: format!("{:040x}", NEXT_SHA.fetch_add(1, Ordering::Relaxed)),
        author: sig.clone(),
        committer: sig,
        message: message.to_string(),
        parent_count: 1,
        tag: None,
    }
}

pub fn parse(schema: &dyn Schema, raw: &RawCommit) -> Commit {
    CommitParser::new(schema).parse(raw)
}

/// Built-ins plus a required `type` with choices bug/feature
pub fn type_schema() -> AttributeSchema {
    AttributeSchema::with_user_definitions(vec![
        AttributeDef::new("type").with_choices(["bug", "feature"])
    ])
    .unwrap()
}

/// Fresh repository with a configured identity
pub fn init_repo() -> (TempDir, Repository) {
    let temp = TempDir::new().unwrap();
    let repo = Repository::init(temp.path()).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
    }
    (temp, repo)
}

/// Write a file, stage it and commit on HEAD
pub fn commit_file(repo: &Repository, root: &Path, name: &str, content: &str, message: &str) -> Oid {
    std::fs::write(root.join(name), content).unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = Signature::new("Author", "author@example.com", &Time::new(1_700_000_000, 0)).unwrap();

    let parents = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().unwrap()],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}

pub fn open(temp: &TempDir) -> GitRepo {
    GitRepo::open(temp.path()).unwrap()
}
