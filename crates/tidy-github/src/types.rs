//! GitHub API payloads

use serde::{Deserialize, Serialize};

/// One end of a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// Branch name
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
}

/// A pull request as returned by the pulls API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub title: String,
    pub base: PullRequestRef,
    pub head: PullRequestRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
}

/// A comment on a pull request's conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub body: String,
    pub user: Option<User>,
}

impl IssueComment {
    /// Whether the comment was written by `login`
    pub fn is_by(&self, login: &str) -> bool {
        self.user.as_ref().is_some_and(|u| u.login == login)
    }
}
