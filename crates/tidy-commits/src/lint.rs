//! Lint policy evaluation

use serde::Serialize;
use tracing::debug;

use tidy_core::types::LintMode;

use crate::range::CommitRange;

/// A commit that did not satisfy the schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintFailure {
    pub sha: String,
    pub summary: String,
    pub errors: Vec<String>,
}

/// Outcome of linting a range
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub mode: LintMode,
    pub passed: bool,
    /// Number of commits linted
    pub total: usize,
    /// Failing commits in range order
    pub failures: Vec<LintFailure>,
}

impl LintResult {
    /// One-line description of the failures
    pub fn summary(&self) -> String {
        format!(
            "{} out of {} commits have failed linting",
            self.failures.len(),
            self.total
        )
    }
}

/// Apply a lint policy to a range.
///
/// Under `All` every commit must be valid; under `Any` at least one must be,
/// so an empty range passes `All` and fails `Any`. Unparsed commits are
/// never valid.
pub fn evaluate(range: &CommitRange, mode: LintMode) -> LintResult {
    let failures: Vec<LintFailure> = range
        .iter()
        .filter(|c| !(c.is_parsed() && c.is_valid()))
        .map(|c| LintFailure {
            sha: c.sha().to_string(),
            summary: c.summary().to_string(),
            errors: c.validation_errors().to_vec(),
        })
        .collect();

    let total = range.len();
    let passed = match mode {
        LintMode::All => failures.is_empty(),
        LintMode::Any => failures.len() < total,
    };

    debug!(?mode, passed, total, failed = failures.len(), "evaluated lint");
    LintResult {
        mode,
        passed,
        total,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{parse, raw_commit, type_schema};
    use tidy_core::types::RevisionRange;
    use tidy_git::LogOrder;

    fn range_of(messages: &[&str]) -> CommitRange {
        let schema = type_schema();
        let commits = messages.iter().map(|m| parse(&schema, &raw_commit(m))).collect();
        CommitRange::new(commits, RevisionRange::from_root("HEAD"), LogOrder::OldestFirst)
    }

    #[test]
    fn test_all_vs_any() {
        let range = range_of(&["A\n\nType: bug", "B\n\nType: chore", "C\n\nType: feature"]);

        let all = evaluate(&range, LintMode::All);
        assert!(!all.passed);
        assert_eq!(all.failures.len(), 1);
        assert_eq!(all.failures[0].sha, range.commits()[1].sha());
        assert_eq!(all.failures[0].errors, range.commits()[1].validation_errors());

        assert!(evaluate(&range, LintMode::Any).passed);
    }

    #[test]
    fn test_empty_range() {
        let range = range_of(&[]);
        assert!(evaluate(&range, LintMode::All).passed);
        assert!(!evaluate(&range, LintMode::Any).passed);
    }

    #[test]
    fn test_unparsed_commit_always_fails() {
        let range = range_of(&["\n"]);
        assert!(!evaluate(&range, LintMode::All).passed);
        assert!(!evaluate(&range, LintMode::Any).passed);
    }

    #[test]
    fn test_summary_line() {
        let range = range_of(&["A", "B\n\nType: bug"]);
        let result = evaluate(&range, LintMode::All);
        assert_eq!(result.total, 2);
        assert_eq!(result.summary(), "1 out of 2 commits have failed linting");
    }
}
