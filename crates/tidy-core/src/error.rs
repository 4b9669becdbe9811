//! Error types for git-tidy

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using TidyError
pub type Result<T> = std::result::Result<T, TidyError>;

/// Main error type for git-tidy operations
#[derive(Debug, Error)]
pub enum TidyError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Commit schema errors
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Range resolution errors
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Commit range query errors
    #[error(transparent)]
    Range(#[from] RangeError),

    /// Squash errors
    #[error(transparent)]
    Squash(#[from] SquashError),

    /// Code hosting API errors
    #[error(transparent)]
    Host(#[from] HostError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl TidyError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Problems found in the user-supplied commit schema
#[derive(Debug, Error)]
pub enum SchemaError {
    /// An entry has no label
    #[error("Entry in schema does not have a label: {0}")]
    MissingLabel(String),

    /// Label is not usable as a trailer
    #[error("Invalid schema label \"{0}\": labels must match [a-z][a-z0-9_]*")]
    InvalidLabel(String),

    /// The same label is declared twice
    #[error("Duplicate schema label \"{0}\"")]
    DuplicateLabel(String),

    /// Multi-line input outside of the description
    #[error("Invalid schema for entry with label \"{0}\": multi-line input is only allowed for the commit description")]
    MultilineNotAllowed(String),

    /// Condition is malformed
    #[error("Invalid condition for entry with label \"{label}\": {reason}")]
    InvalidCondition { label: String, reason: String },

    /// Failed to read the schema file
    #[error("Failed to read schema at {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    /// YAML parsing error
    #[error("Schema YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// HEAD does not point at a branch
    #[error("HEAD is detached; check out a branch first")]
    DetachedHead,

    /// Remote not found
    #[error("Remote not found: {0}")]
    RemoteNotFound(String),

    /// Tag glob could not be compiled
    #[error("Invalid tag pattern \"{pattern}\": {reason}")]
    InvalidTagPattern { pattern: String, reason: String },

    /// Hook could not be executed
    #[error("Failed to run {hook} hook: {reason}")]
    HookExec { hook: String, reason: String },

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Failures turning a user range token into concrete revisions
#[derive(Debug, Error)]
pub enum ResolveError {
    /// An endpoint could not be dereferenced
    #[error("Unknown revision: {0}")]
    UnknownRevision(String),

    /// No pull request is open for the current branch
    #[error("No open pull request found for branch \"{0}\"")]
    NoOpenPullRequest(String),

    /// More than one pull request is open for the current branch
    #[error("Multiple open pull requests found for branch \"{0}\"")]
    MultiplePullRequests(String),

    /// Transport or authentication failure talking to the code host
    #[error(transparent)]
    HostApi(#[from] HostError),

    /// Underlying repository failure
    #[error(transparent)]
    Git(#[from] GitError),
}

/// Failures querying a parsed commit range
#[derive(Debug, Error)]
pub enum RangeError {
    /// Group keys of different kinds cannot be sorted against each other
    #[error("Cannot sort group keys for \"{label}\": {left} and {right} are not comparable")]
    IncomparableKeys {
        label: String,
        left: String,
        right: String,
    },
}

/// Code hosting API errors
#[derive(Debug, Error)]
pub enum HostError {
    /// Missing credentials or remote
    #[error("Host configuration error: {0}")]
    Configuration(String),

    /// Unexpected API failure
    #[error("Host API error: {0}")]
    Api(String),

    /// Non-success status
    #[error("Host API returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Failures writing a structured commit, either by squashing or directly.
/// Every variant raised after the branch moved has already been rolled back
/// unless it is `RollbackFailed`.
#[derive(Debug, Error)]
pub enum SquashError {
    /// The target and HEAD share no history
    #[error("No common ancestor between {target} and HEAD")]
    NoCommonAncestor { target: String },

    /// Empty range
    #[error("No commits to squash")]
    NothingToSquash,

    /// The user cancelled attribute collection
    #[error("Cancelled by user")]
    Cancelled,

    /// The attribute collector itself failed
    #[error("Failed to collect commit attributes: {0}")]
    Collector(String),

    /// Collected attributes do not satisfy the schema
    #[error("Commit attributes are invalid: {}", .0.join("; "))]
    InvalidAttributes(Vec<String>),

    /// A previous squash left its recovery snapshot behind
    #[error("A squash snapshot already exists at {snapshot}; run `git tidy squash --recover` to restore it")]
    SnapshotExists { snapshot: String },

    /// No snapshot to recover from
    #[error("No squash snapshot found")]
    NoSnapshot,

    /// pre-commit hook rejected the commit
    #[error("pre-commit hook failed with status {0}")]
    HookFailed(i32),

    /// The squashed tree is identical to the base tree
    #[error("Nothing to commit (use --allow-empty to commit anyway)")]
    NothingToCommit,

    /// Composed message did not survive a re-parse
    #[error("Internal invariant violated: {0}")]
    InternalInvariantViolation(String),

    /// Commit creation failed and HEAD was restored
    #[error("Squash failed ({reason}); branch restored to {snapshot}")]
    RolledBack { reason: String, snapshot: String },

    /// Commit creation failed and HEAD could not be restored
    #[error("Squash failed ({reason}) and rollback failed ({rollback}); restore manually with `git reset --soft {snapshot}`")]
    RollbackFailed {
        reason: String,
        rollback: String,
        snapshot: String,
    },

    /// Repository failure before any mutation
    #[error(transparent)]
    Git(#[from] GitError),
}

impl From<git2::Error> for SquashError {
    fn from(err: git2::Error) -> Self {
        Self::Git(GitError::Git2(err))
    }
}

impl From<git2::Error> for ResolveError {
    fn from(err: git2::Error) -> Self {
        Self::Git(GitError::Git2(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_failed_mentions_snapshot() {
        let err = SquashError::RollbackFailed {
            reason: "write failed".to_string(),
            rollback: "locked".to_string(),
            snapshot: "abc123".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("git reset --soft abc123"));
    }

    #[test]
    fn test_squash_error_converts_to_tidy_error() {
        let err: TidyError = SquashError::NothingToSquash.into();
        assert!(matches!(err, TidyError::Squash(SquashError::NothingToSquash)));
    }

    #[test]
    fn test_invalid_attributes_joins_messages() {
        let err = SquashError::InvalidAttributes(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "Commit attributes are invalid: a; b");
    }
}
