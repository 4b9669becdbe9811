//! Running client-side git hooks

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, instrument};

use tidy_core::error::GitError;

use crate::repository::{GitRepo, Result};

/// Name of the hook run before a commit is created
pub const PRE_COMMIT: &str = "pre-commit";

/// What happened when a hook was invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// No runnable hook installed
    Skipped,
    /// Hook exited with status 0
    Passed,
    /// Hook exited non-zero; -1 when killed by a signal
    Failed(i32),
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

impl GitRepo {
    /// Directory git looks for hooks in, honouring `core.hooksPath`
    pub fn hooks_dir(&self) -> PathBuf {
        let configured = self
            .repo
            .config()
            .and_then(|c| c.get_path("core.hooksPath"))
            .ok();

        match configured {
            Some(path) if path.is_absolute() => path,
            Some(path) => self.path().join(path),
            None => self.git_dir().join("hooks"),
        }
    }

    /// Run a hook by name from the working tree root
    #[instrument(skip(self))]
    pub fn run_hook(&self, name: &str) -> Result<HookOutcome> {
        let hook = self.hooks_dir().join(name);
        if !is_executable(&hook) {
            debug!(hook = %hook.display(), "no runnable hook");
            return Ok(HookOutcome::Skipped);
        }

        let status = Command::new(&hook)
            .current_dir(self.path())
            .env("GIT_INDEX_FILE", self.git_dir().join("index"))
            .status()
            .map_err(|e| GitError::HookExec {
                hook: name.to_string(),
                reason: e.to_string(),
            })?;

        let outcome = if status.success() {
            HookOutcome::Passed
        } else {
            HookOutcome::Failed(status.code().unwrap_or(-1))
        };
        info!(hook = name, ?outcome, "ran hook");
        Ok(outcome)
    }

    /// Run the pre-commit hook
    pub fn run_pre_commit_hook(&self) -> Result<HookOutcome> {
        self.run_hook(PRE_COMMIT)
    }
}
