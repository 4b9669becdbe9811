//! Tag operations

use git2::Oid;
use tracing::{debug, instrument};

use tidy_core::error::GitError;

use crate::repository::{GitRepo, Result};
use crate::types::{to_datetime, TagInfo};

impl GitRepo {
    /// Get all tags peeled to their commits, optionally restricted to a glob
    #[instrument(skip(self))]
    pub fn tags(&self, pattern: Option<&str>) -> Result<Vec<TagInfo>> {
        let pattern = pattern
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| GitError::InvalidTagPattern {
                    pattern: p.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let mut tags = Vec::new();

        self.repo.tag_foreach(|oid, name| {
            let name = String::from_utf8_lossy(name)
                .trim_start_matches("refs/tags/")
                .to_string();

            if pattern.as_ref().is_some_and(|p| !p.matches(&name)) {
                return true;
            }

            if let Ok(commit) = self.repo.find_commit(oid) {
                let when = commit.committer().when();
                tags.push(
                    TagInfo::new(&name, commit.id().to_string())
                        .with_timestamp(to_datetime(when.seconds(), when.offset_minutes())),
                );
            } else if let Ok(tag) = self.repo.find_tag(oid) {
                // Annotated tag
                let Ok(target) = tag.target().and_then(|t| t.peel_to_commit()) else {
                    return true;
                };
                let when = tag
                    .tagger()
                    .map(|tagger| tagger.when())
                    .unwrap_or_else(|| target.committer().when());
                tags.push(
                    TagInfo::new(&name, target.id().to_string())
                        .with_timestamp(to_datetime(when.seconds(), when.offset_minutes())),
                );
            }

            true
        })?;

        debug!(count = tags.len(), "listed tags");
        Ok(tags)
    }
}

/// Tags of a repository, indexed once for repeated containment lookups
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    entries: Vec<(Oid, TagInfo)>,
}

impl TagIndex {
    /// Index all tags, optionally restricted to a glob
    pub fn build(repo: &GitRepo, pattern: Option<&str>) -> Result<Self> {
        let mut entries = Vec::new();
        for tag in repo.tags(pattern)? {
            let oid = Oid::from_str(&tag.commit_hash)?;
            entries.push((oid, tag));
        }
        entries.sort_by(|a, b| a.1.name.cmp(&b.1.name));
        Ok(Self { entries })
    }

    /// Number of indexed tags
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tags were indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The tag closest to `commit` among those whose history contains it.
    ///
    /// Ties on distance are broken by tag name.
    pub fn nearest_containing(&self, repo: &GitRepo, commit: Oid) -> Result<Option<TagInfo>> {
        let mut best: Option<(usize, &TagInfo)> = None;

        for (target, tag) in &self.entries {
            let distance = if *target == commit {
                0
            } else if repo.repo.graph_descendant_of(*target, commit)? {
                repo.repo.graph_ahead_behind(*target, commit)?.0
            } else {
                continue;
            };

            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, tag));
            }
        }

        Ok(best.map(|(_, tag)| tag.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{commit_file, init_repo};

    #[test]
    fn test_tags_lightweight_and_annotated() {
        let (temp, raw) = init_repo();
        let first = commit_file(&raw, temp.path(), "a.txt", "1", "First");
        let second = commit_file(&raw, temp.path(), "a.txt", "2", "Second");
        raw.tag_lightweight("v1.0", raw.find_commit(first).unwrap().as_object(), false)
            .unwrap();
        let sig = raw.signature().unwrap();
        raw.tag("v2.0", raw.find_commit(second).unwrap().as_object(), &sig, "Release", false)
            .unwrap();

        let repo = GitRepo::open(temp.path()).unwrap();
        let mut tags = repo.tags(None).unwrap();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].commit_hash, first.to_string());
        assert_eq!(tags[1].commit_hash, second.to_string());
        assert!(tags[1].timestamp.is_some());
    }

    #[test]
    fn test_tags_matching_glob() {
        let (temp, raw) = init_repo();
        let oid = commit_file(&raw, temp.path(), "a.txt", "1", "First");
        let obj = raw.find_commit(oid).unwrap().into_object();
        raw.tag_lightweight("v1.0", &obj, false).unwrap();
        raw.tag_lightweight("nightly", &obj, false).unwrap();

        let repo = GitRepo::open(temp.path()).unwrap();
        let tags = repo.tags(Some("v*")).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "v1.0");
    }

    #[test]
    fn test_nearest_containing_tag() {
        let (temp, raw) = init_repo();
        let first = commit_file(&raw, temp.path(), "a.txt", "1", "First");
        let second = commit_file(&raw, temp.path(), "a.txt", "2", "Second");
        let third = commit_file(&raw, temp.path(), "a.txt", "3", "Third");
        let fourth = commit_file(&raw, temp.path(), "a.txt", "4", "Fourth");
        raw.tag_lightweight("v1.0", raw.find_commit(second).unwrap().as_object(), false)
            .unwrap();
        raw.tag_lightweight("v2.0", raw.find_commit(third).unwrap().as_object(), false)
            .unwrap();

        let repo = GitRepo::open(temp.path()).unwrap();
        let index = TagIndex::build(&repo, None).unwrap();
        assert_eq!(index.len(), 2);

        let name = |oid| index.nearest_containing(&repo, oid).unwrap().map(|t| t.name);
        assert_eq!(name(first).as_deref(), Some("v1.0"));
        assert_eq!(name(second).as_deref(), Some("v1.0"));
        assert_eq!(name(third).as_deref(), Some("v2.0"));
        assert_eq!(name(fourth), None);
    }
}
