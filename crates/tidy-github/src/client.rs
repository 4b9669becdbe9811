//! GitHub REST client

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, instrument};

use tidy_commits::PullRequestHost;
use tidy_core::config::GithubConfig;
use tidy_core::error::{HostError, ResolveError};
use tidy_core::types::RevisionRange;
use tidy_git::GitRepo;

use crate::remote::parse_remote_slug;
use crate::types::{IssueComment, PullRequest};

/// Client for the GitHub API, scoped to one git remote
pub struct GitHubClient {
    api_url: String,
    token: String,
    username: Option<String>,
    remote: String,
    client: Client,
}

impl GitHubClient {
    /// Build a client from configuration, reading credentials from the
    /// configured environment variables
    pub fn from_config(config: &GithubConfig) -> Result<Self, HostError> {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                HostError::Configuration(format!(
                    "Must set the \"{}\" environment variable for GitHub access",
                    config.token_env
                ))
            })?;
        let username = std::env::var(&config.username_env)
            .ok()
            .filter(|u| !u.is_empty());

        Ok(Self::new(&config.api_url, token, &config.remote).with_username(username))
    }

    /// Create a client with explicit credentials
    pub fn new(api_url: &str, token: impl Into<String>, remote: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
            username: None,
            remote: remote.to_string(),
            client: Client::new(),
        }
    }

    /// Set the login whose comments are updated in place
    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, "git-tidy")
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Owner and repository of the configured remote
    pub fn slug(&self, repo: &GitRepo) -> Result<(String, String), ResolveError> {
        let url = repo.remote_url(&self.remote)?;
        parse_remote_slug(&url).ok_or_else(|| {
            HostError::Configuration(format!(
                "remote \"{}\" ({url}) is not a GitHub repository",
                self.remote
            ))
            .into()
        })
    }

    /// Open pull requests whose head is `branch`
    #[instrument(skip(self))]
    pub fn pull_requests_for(
        &self,
        owner: &str,
        name: &str,
        branch: &str,
    ) -> Result<Vec<PullRequest>, HostError> {
        let url = self.url(&format!("/repos/{owner}/{name}/pulls"));
        let head = format!("{owner}:{branch}");
        let response = self
            .request(self.client.get(url))
            .query(&[("head", head.as_str()), ("state", "open")])
            .send()
            .map_err(|e| HostError::Api(format!("pull request lookup failed: {e}")))?;
        decode(response)
    }

    /// The single open pull request for the checked-out branch
    pub fn current_pull_request(&self, repo: &GitRepo) -> Result<PullRequest, ResolveError> {
        let (owner, name) = self.slug(repo)?;
        let branch = repo.current_branch()?;
        let prs = self.pull_requests_for(&owner, &name, &branch)?;
        single_pull_request(prs, &branch)
    }

    /// Create or update this user's comment on a pull request
    #[instrument(skip(self, body))]
    pub fn upsert_comment(
        &self,
        owner: &str,
        name: &str,
        number: u64,
        body: &str,
    ) -> Result<IssueComment, HostError> {
        let username = self.username.as_deref().ok_or_else(|| {
            HostError::Configuration(
                "a GitHub username is required to comment on pull requests".to_string(),
            )
        })?;

        let comments_url = self.url(&format!("/repos/{owner}/{name}/issues/{number}/comments"));
        let response = self
            .request(self.client.get(&comments_url))
            .send()
            .map_err(|e| HostError::Api(format!("listing comments failed: {e}")))?;
        let comments: Vec<IssueComment> = decode(response)?;

        let payload = json!({ "body": body });
        let response = match comments.iter().find(|c| c.is_by(username)) {
            Some(existing) => {
                debug!(comment = existing.id, "updating existing comment");
                let url = self.url(&format!("/repos/{owner}/{name}/issues/comments/{}", existing.id));
                self.request(self.client.patch(url)).json(&payload).send()
            }
            None => self.request(self.client.post(&comments_url)).json(&payload).send(),
        }
        .map_err(|e| HostError::Api(format!("writing comment failed: {e}")))?;

        let comment: IssueComment = decode(response)?;
        info!(comment = comment.id, pull_request = number, "pull request comment written");
        Ok(comment)
    }

    /// Post `body` on the pull request of the checked-out branch
    pub fn comment_on_current_pr(
        &self,
        repo: &GitRepo,
        body: &str,
    ) -> Result<IssueComment, ResolveError> {
        let (owner, name) = self.slug(repo)?;
        let pr = self.current_pull_request(repo)?;
        Ok(self.upsert_comment(&owner, &name, pr.number, body)?)
    }
}

impl PullRequestHost for GitHubClient {
    fn lookup_current_pr(&self, repo: &GitRepo) -> Result<RevisionRange, ResolveError> {
        let pr = self.current_pull_request(repo)?;
        Ok(RevisionRange::new(
            format!("{}/{}", self.remote, pr.base.ref_name),
            "HEAD",
        ))
    }
}

fn single_pull_request(prs: Vec<PullRequest>, branch: &str) -> Result<PullRequest, ResolveError> {
    let mut prs = prs.into_iter();
    match (prs.next(), prs.next()) {
        (None, _) => Err(ResolveError::NoOpenPullRequest(branch.to_string())),
        (Some(pr), None) => Ok(pr),
        (Some(_), Some(_)) => Err(ResolveError::MultiplePullRequests(branch.to_string())),
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<T, HostError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(HostError::Status {
            status: status.as_u16(),
            body,
        });
    }
    response
        .json()
        .map_err(|e| HostError::Api(format!("unexpected response: {e}")))
}
