//! Default configuration values

use super::types::Config;

/// Directory holding git-tidy files at the repository root
pub const TIDY_DIR: &str = ".git-tidy";

/// Default schema location
pub const DEFAULT_SCHEMA_PATH: &str = ".git-tidy/commit.yaml";

/// Symbolic range/output that means "the open GitHub pull request"
pub const GITHUB_PR_TOKEN: &str = ":github/pr";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        ".git-tidy/config.toml",
        ".git-tidy/config.yaml",
        "git-tidy.toml",
        "git-tidy.yaml",
    ]
}

/// Generate default configuration TOML
pub fn default_config_toml() -> String {
    let config = Config::default();
    toml::to_string_pretty(&config).unwrap_or_else(|_| DEFAULT_CONFIG_TEMPLATE.to_string())
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# git-tidy configuration

[schema]
path = ".git-tidy/commit.yaml"

[log]
style = "default"
unreleased_title = "Unreleased"
no_merges = true

[lint]
mode = "all"

[squash]
identity = "current"
verify = true
allow_empty = false

[github]
remote = "origin"
api_url = "https://api.github.com"
token_env = "GITHUB_API_TOKEN"
username_env = "GITHUB_USERNAME"
pr_token = ":github/pr"
"#;
