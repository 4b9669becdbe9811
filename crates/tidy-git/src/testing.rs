//! Repository fixtures for unit tests

use std::path::Path;

use git2::{Oid, Repository, Signature, Time};
use tempfile::TempDir;

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
    commit_file_at(repo, root, name, content, message, 1_700_000_000)
}

/// Like [`commit_file`] with an explicit author/committer time
pub fn commit_file_at(
    repo: &Repository,
    root: &Path,
    name: &str,
    content: &str,
    message: &str,
    seconds: i64,
) -> Oid {
    std::fs::write(root.join(name), content).unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = Signature::new("Test", "test@example.com", &Time::new(seconds, 0)).unwrap();

    let parents = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().unwrap()],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}
