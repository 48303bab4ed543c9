//! Subprocess plumbing for the external `git` binary.
//!
//! The sync engine never spawns processes directly; it drives a [`GitRunner`]
//! with one method per transition so each failure mode stays individually
//! nameable and the engine can be exercised against a mock.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

#[cfg(test)]
use mockall::automock;

/// The git operations the sync engine performs, one per transition.
#[cfg_attr(test, automock)]
pub trait GitRunner {
    /// `git clone --depth 1 --branch <branch> <url> <dest>`
    fn clone_repo(&self, url: &str, branch: &str, dest: &Path) -> Result<()>;

    /// `git fetch origin`, run inside `workdir`.
    fn fetch(&self, workdir: &Path) -> Result<()>;

    /// `git checkout <branch>`, run inside `workdir`.
    fn checkout(&self, workdir: &Path, branch: &str) -> Result<()>;

    /// `git checkout -b <branch> origin/<branch>`, run inside `workdir`.
    fn checkout_tracking(&self, workdir: &Path, branch: &str) -> Result<()>;

    /// `git pull origin <branch>`, run inside `workdir`.
    fn pull(&self, workdir: &Path, branch: &str) -> Result<()>;
}

/// Runs the real `git` binary, blocking until it exits.
///
/// The subprocess inherits this process's stdout and stderr, so git's own
/// progress and error output reaches the user directly. No timeout is
/// enforced; a hanging subprocess blocks the tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

impl SystemGit {
    fn run(&self, workdir: Option<&Path>, args: &[&str]) -> Result<()> {
        let rendered = args.join(" ");
        debug!(command = %rendered, workdir = ?workdir, "running git");

        let mut command = Command::new("git");
        command.args(args);
        if let Some(dir) = workdir {
            command.current_dir(dir);
        }

        let status = command.status().map_err(|err| Error::ExternalLaunch {
            command: rendered.clone(),
            source: err,
        })?;

        if !status.success() {
            return Err(Error::ExternalCommand {
                command: rendered,
                status,
            });
        }

        Ok(())
    }
}

impl GitRunner for SystemGit {
    fn clone_repo(&self, url: &str, branch: &str, dest: &Path) -> Result<()> {
        let dest = dest.to_string_lossy();
        self.run(
            None,
            &["clone", "--depth", "1", "--branch", branch, url, dest.as_ref()],
        )
    }

    fn fetch(&self, workdir: &Path) -> Result<()> {
        self.run(Some(workdir), &["fetch", "origin"])
    }

    fn checkout(&self, workdir: &Path, branch: &str) -> Result<()> {
        self.run(Some(workdir), &["checkout", branch])
    }

    fn checkout_tracking(&self, workdir: &Path, branch: &str) -> Result<()> {
        let upstream = format!("origin/{branch}");
        self.run(Some(workdir), &["checkout", "-b", branch, &upstream])
    }

    fn pull(&self, workdir: &Path, branch: &str) -> Result<()> {
        self.run(Some(workdir), &["pull", "origin", branch])
    }
}
