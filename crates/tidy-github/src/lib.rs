//! Tidy GitHub - pull request integration for git-tidy
//!
//! Resolves the symbolic pull request range through the GitHub REST API and
//! posts rendered logs as pull request comments.

mod client;
mod remote;
mod types;

pub use client::GitHubClient;
pub use remote::parse_remote_slug;
pub use types::{IssueComment, PullRequest, PullRequestRef, User};
