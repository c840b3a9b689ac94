//! Git integration for committing manifest updates

use crate::error::GitError;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Stage and commit files
pub trait VersionControl: Send + Sync {
    /// Stage a file
    fn add(&self, path: &Path) -> Result<(), GitError>;

    /// Commit staged changes
    fn commit(&self, message: &str) -> Result<(), GitError>;
}

/// `git` binary wrapper
pub struct GitCli {
    working_dir: PathBuf,
}

impl GitCli {
    /// Create a wrapper running git in `working_dir`
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    fn run_git(&self, args: &[&str]) -> Result<Output, GitError> {
        tracing::debug!(args = %args.join(" "), "running git");
        Command::new("git")
            .current_dir(&self.working_dir)
            .args(args)
            .output()
            .map_err(|source| GitError::Spawn {
                command: args.join(" "),
                source,
            })
    }

    fn ensure_success(output: &Output, command: &str) -> Result<(), GitError> {
        if output.status.success() {
            return Ok(());
        }

        Err(GitError::CommandFailed {
            command: command.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

impl VersionControl for GitCli {
    fn add(&self, path: &Path) -> Result<(), GitError> {
        let path = path.to_string_lossy();
        let output = self.run_git(&["add", path.as_ref()])?;
        Self::ensure_success(&output, "add")
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        let output = self.run_git(&["commit", "-m", message])?;
        Self::ensure_success(&output, "commit")
    }
}
