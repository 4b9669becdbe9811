//! Exit codes for the CLI

use thiserror::Error;

use tidy_core::{
    ConfigError, GitError, HostError, ResolveError, SchemaError, SquashError, TidyError,
};

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration or schema error
pub const CONFIG_ERROR: i32 = 2;

/// Git error
pub const GIT_ERROR: i32 = 3;

/// Lint or attribute validation failure
pub const VALIDATION_ERROR: i32 = 5;

/// Squash failed and the branch was restored
pub const ROLLED_BACK: i32 = 6;

/// Squash left the branch in a state that needs manual recovery
pub const MANUAL_RECOVERY: i32 = 7;

/// User cancelled
pub const CANCELLED: i32 = 130;

/// A failure whose exit code is decided by the command itself
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Exit code for an error returned by a command
pub fn code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<ExitError>() {
            return e.code;
        }
        if let Some(e) = cause.downcast_ref::<TidyError>() {
            return tidy_code(e);
        }
        if let Some(e) = cause.downcast_ref::<SquashError>() {
            return squash_code(e);
        }
        if let Some(e) = cause.downcast_ref::<ResolveError>() {
            return resolve_code(e);
        }
        if cause.is::<ConfigError>() || cause.is::<SchemaError>() {
            return CONFIG_ERROR;
        }
        if cause.is::<GitError>() {
            return GIT_ERROR;
        }
        if cause.is::<HostError>() {
            return ERROR;
        }
    }
    ERROR
}

fn tidy_code(err: &TidyError) -> i32 {
    match err {
        TidyError::Config(_) | TidyError::Schema(_) | TidyError::Yaml(_) | TidyError::Toml(_) => {
            CONFIG_ERROR
        }
        TidyError::Git(_) => GIT_ERROR,
        TidyError::Resolve(e) => resolve_code(e),
        TidyError::Squash(e) => squash_code(e),
        _ => ERROR,
    }
}

fn resolve_code(err: &ResolveError) -> i32 {
    match err {
        ResolveError::HostApi(_) => ERROR,
        _ => GIT_ERROR,
    }
}

fn squash_code(err: &SquashError) -> i32 {
    match err {
        SquashError::Cancelled => CANCELLED,
        SquashError::InvalidAttributes(_) => VALIDATION_ERROR,
        SquashError::RolledBack { .. } => ROLLED_BACK,
        SquashError::RollbackFailed { .. } | SquashError::SnapshotExists { .. } => MANUAL_RECOVERY,
        SquashError::Git(_) | SquashError::NoCommonAncestor { .. } => GIT_ERROR,
        _ => ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_exit_code() {
        let err = anyhow::Error::new(ExitError::new(VALIDATION_ERROR, "lint failed"));
        assert_eq!(code_for(&err), VALIDATION_ERROR);
    }

    #[test]
    fn test_squash_codes() {
        let cancelled = anyhow::Error::new(SquashError::Cancelled);
        assert_eq!(code_for(&cancelled), CANCELLED);

        let rolled_back = anyhow::Error::new(SquashError::RolledBack {
            reason: "hook".to_string(),
            snapshot: "abc".to_string(),
        });
        assert_eq!(code_for(&rolled_back), ROLLED_BACK);

        let failed = anyhow::Error::new(SquashError::RollbackFailed {
            reason: "hook".to_string(),
            rollback: "locked".to_string(),
            snapshot: "abc".to_string(),
        });
        assert_eq!(code_for(&failed), MANUAL_RECOVERY);
    }

    #[test]
    fn test_wrapped_errors() {
        let err = anyhow::Error::new(TidyError::from(GitError::DetachedHead));
        assert_eq!(code_for(&err), GIT_ERROR);

        let err = anyhow::Error::new(SchemaError::DuplicateLabel("type".to_string()))
            .context("loading schema");
        assert_eq!(code_for(&err), CONFIG_ERROR);

        let err = anyhow::Error::new(ResolveError::UnknownRevision("nope".to_string()));
        assert_eq!(code_for(&err), GIT_ERROR);
    }

    #[test]
    fn test_unknown_error_is_general() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(code_for(&err), ERROR);
    }
}
