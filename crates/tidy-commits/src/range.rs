//! Ordered, queryable collections of parsed commits

use regex::Regex;
use tracing::{debug, instrument};

use tidy_core::error::{GitError, RangeError};
use tidy_core::schema::Schema;
use tidy_core::types::RevisionRange;
use tidy_git::{GitRepo, LogOrder, LogQuery};

use crate::commit::{Commit, FieldValue};
use crate::parser::CommitParser;

/// Commits in log order plus the revisions they were read from.
///
/// Every query returns a new range; the receiver is never modified.
#[derive(Debug, Clone)]
pub struct CommitRange {
    commits: Vec<Commit>,
    range: RevisionRange,
    order: LogOrder,
}

impl CommitRange {
    pub fn new(commits: Vec<Commit>, range: RevisionRange, order: LogOrder) -> Self {
        Self {
            commits,
            range,
            order,
        }
    }

    /// Read and parse the commits a log query selects
    #[instrument(skip(repo, query, schema), fields(range = %query.range))]
    pub fn load(repo: &GitRepo, query: &LogQuery, schema: &dyn Schema) -> Result<Self, GitError> {
        let records = repo.log(query)?;
        let commits = CommitParser::new(schema).parse_all(&records);
        debug!(
            count = commits.len(),
            invalid = commits.iter().filter(|c| !c.is_valid()).count(),
            "loaded commit range"
        );
        Ok(Self::new(commits, query.range.clone(), query.order))
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Commit> {
        self.commits.iter()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Commit> {
        self.commits.get(index)
    }

    /// The revisions this range was read from
    pub fn range(&self) -> &RevisionRange {
        &self.range
    }

    /// Direction the commits are in
    pub fn order(&self) -> LogOrder {
        self.order
    }

    fn with_commits(&self, commits: Vec<Commit>) -> Self {
        Self::new(commits, self.range.clone(), self.order)
    }

    /// Commits for which the predicate holds, in order
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Commit) -> bool,
    {
        self.with_commits(self.iter().filter(|c| predicate(c)).cloned().collect())
    }

    /// Commits for which the predicate does not hold, in order
    pub fn exclude<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Commit) -> bool,
    {
        self.filter(|c| !predicate(c))
    }

    /// Commits whose field equals `value`
    pub fn filter_field(&self, label: &str, value: impl Into<FieldValue>) -> Self {
        let value = value.into();
        self.filter(|c| c.field(label).as_ref() == Some(&value))
    }

    /// Commits whose field does not equal `value`, including those without it
    pub fn exclude_field(&self, label: &str, value: impl Into<FieldValue>) -> Self {
        let value = value.into();
        self.exclude(|c| c.field(label).as_ref() == Some(&value))
    }

    /// Commits whose text field matches `pattern` at its start
    pub fn filter_matching(&self, label: &str, pattern: &Regex) -> Self {
        self.filter(|c| match c.field(label) {
            Some(FieldValue::Text(text)) => pattern.find(&text).is_some_and(|m| m.start() == 0),
            _ => false,
        })
    }

    /// Partition the commits by the value of a field.
    ///
    /// Each commit lands in exactly one group and keeps its relative order.
    /// Commits without the field share the `None` group.
    pub fn group(&self, label: &str, options: GroupOptions) -> Result<Groups, RangeError> {
        let mut entries: Vec<(Option<FieldValue>, Vec<Commit>)> = Vec::new();
        for commit in &self.commits {
            let key = commit.field(label);
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some((_, commits)) => commits.push(commit.clone()),
                None => entries.push((key, vec![commit.clone()])),
            }
        }

        let none_index = entries.iter().position(|(k, _)| k.is_none());
        let none_entry = none_index.map(|i| entries.remove(i));

        if options.order != KeyOrder::FirstAppearance {
            check_comparable(label, &entries)?;
            entries.sort_by(|(a, _), (b, _)| match (a, b) {
                (Some(a), Some(b)) => a.try_cmp(b).unwrap_or(std::cmp::Ordering::Equal),
                _ => std::cmp::Ordering::Equal,
            });
            if options.order == KeyOrder::Descending {
                entries.reverse();
            }
        }

        if let (Some(index), Some(entry)) = (none_index, none_entry) {
            let at = match options.none_placement {
                NonePlacement::First => 0,
                NonePlacement::Last => entries.len(),
                NonePlacement::FirstAppearance => index.min(entries.len()),
            };
            entries.insert(at, entry);
        }

        Ok(Groups {
            label: label.to_string(),
            entries: entries
                .into_iter()
                .map(|(key, commits)| (key, self.with_commits(commits)))
                .collect(),
        })
    }
}

fn check_comparable(
    label: &str,
    entries: &[(Option<FieldValue>, Vec<Commit>)],
) -> Result<(), RangeError> {
    let mut keys = entries.iter().filter_map(|(k, _)| k.as_ref());
    let Some(first) = keys.next() else {
        return Ok(());
    };
    for key in keys {
        if first.try_cmp(key).is_none() {
            return Err(RangeError::IncomparableKeys {
                label: label.to_string(),
                left: first.kind().to_string(),
                right: key.kind().to_string(),
            });
        }
    }
    Ok(())
}

impl<'a> IntoIterator for &'a CommitRange {
    type Item = &'a Commit;
    type IntoIter = std::slice::Iter<'a, Commit>;

    fn into_iter(self) -> Self::IntoIter {
        self.commits.iter()
    }
}

/// How group keys are ordered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyOrder {
    /// Order in which each key first appears
    #[default]
    FirstAppearance,
    Ascending,
    Descending,
}

/// Where the group of commits without a key goes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NonePlacement {
    /// Where it first appears; never sorted with the other keys
    #[default]
    FirstAppearance,
    First,
    Last,
}

/// Options for [`CommitRange::group`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupOptions {
    pub order: KeyOrder,
    pub none_placement: NonePlacement,
}

impl GroupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ascending(mut self) -> Self {
        self.order = KeyOrder::Ascending;
        self
    }

    pub fn descending(mut self) -> Self {
        self.order = KeyOrder::Descending;
        self
    }

    pub fn none_first(mut self) -> Self {
        self.none_placement = NonePlacement::First;
        self
    }

    pub fn none_last(mut self) -> Self {
        self.none_placement = NonePlacement::Last;
        self
    }
}

/// Ordered groups produced by [`CommitRange::group`]
#[derive(Debug, Clone)]
pub struct Groups {
    label: String,
    entries: Vec<(Option<FieldValue>, CommitRange)>,
}

impl Groups {
    /// Field the commits were grouped by
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in group order
    pub fn keys(&self) -> Vec<Option<&FieldValue>> {
        self.entries.iter().map(|(k, _)| k.as_ref()).collect()
    }

    /// The group for a key
    pub fn get(&self, key: Option<&FieldValue>) -> Option<&CommitRange> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, range)| range)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Option<&FieldValue>, &CommitRange)> {
        self.entries.iter().map(|(k, range)| (k.as_ref(), range))
    }
}

impl IntoIterator for Groups {
    type Item = (Option<FieldValue>, CommitRange);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
