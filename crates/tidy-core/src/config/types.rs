//! Configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{IdentityPolicy, LintMode};

use super::defaults::{DEFAULT_SCHEMA_PATH, GITHUB_PR_TOKEN};

/// Main configuration for git-tidy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Commit schema location
    pub schema: SchemaConfig,

    /// Log rendering configuration
    pub log: LogConfig,

    /// Lint configuration
    pub lint: LintConfig,

    /// Squash configuration
    pub squash: SquashConfig,

    /// GitHub integration
    pub github: GithubConfig,
}

/// Where the commit schema lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Path to the schema YAML, relative to the repository root
    pub path: PathBuf,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SCHEMA_PATH),
        }
    }
}

/// Log rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Renderer style
    pub style: String,

    /// Glob restricting which tags are associated with commits
    pub tag_match: Option<String>,

    /// Heading used for commits without a tag
    pub unreleased_title: String,

    /// Skip merge commits
    pub no_merges: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            style: "default".to_string(),
            tag_match: None,
            unreleased_title: "Unreleased".to_string(),
            no_merges: true,
        }
    }
}

/// Lint configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Default policy when `--any` is not given
    pub mode: LintMode,
}

/// Squash configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SquashConfig {
    /// Author identity of the squashed commit
    pub identity: IdentityPolicy,

    /// Run the pre-commit hook before creating the commit
    pub verify: bool,

    /// Allow a squash that produces no changes
    pub allow_empty: bool,
}

impl Default for SquashConfig {
    fn default() -> Self {
        Self {
            identity: IdentityPolicy::default(),
            verify: true,
            allow_empty: false,
        }
    }
}

/// GitHub integration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Remote whose URL names the GitHub repository
    pub remote: String,

    /// API base URL
    pub api_url: String,

    /// Environment variable holding the API token
    pub token_env: String,

    /// Environment variable holding the login used for PR comments
    pub username_env: String,

    /// Symbolic range token that resolves to the open pull request
    pub pr_token: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            api_url: "https://api.github.com".to_string(),
            token_env: "GITHUB_API_TOKEN".to_string(),
            username_env: "GITHUB_USERNAME".to_string(),
            pr_token: GITHUB_PR_TOKEN.to_string(),
        }
    }
}
