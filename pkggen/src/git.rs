//! Git adapter for generated packages.
//!
//! Each package gets its own repository with one initial commit. Author
//! identity is passed per invocation so the user's global config is not needed.

use std::path::PathBuf;
use std::process::{Command, Output};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument};

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
    identity: Option<(String, String)>,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            identity: None,
        }
    }

    /// Commit as `name <email>` regardless of git configuration.
    pub fn with_identity(mut self, name: &str, email: &str) -> Self {
        self.identity = Some((name.to_string(), email.to_string()));
        self
    }

    /// Create a repository whose first branch is `branch`.
    #[instrument(skip_all, fields(branch))]
    pub fn init(&self, branch: &str) -> Result<()> {
        debug!(workdir = %self.workdir.display(), "initialising repository");
        self.run_checked(&["init", "--quiet"])?;
        let head = format!("refs/heads/{branch}");
        self.run_checked(&["symbolic-ref", "HEAD", &head])?;
        Ok(())
    }

    /// Stage all changes (respects .gitignore).
    pub fn add_all(&self) -> Result<()> {
        self.run_checked(&["add", "-A"])?;
        Ok(())
    }

    /// True if there is anything staged for commit.
    pub fn has_staged_changes(&self) -> Result<bool> {
        let out = self.run(&["diff", "--cached", "--name-only"])?;
        Ok(!String::from_utf8_lossy(&out.stdout).trim().is_empty())
    }

    /// Commit staged changes with a message.
    ///
    /// If there are no staged changes, this returns Ok(false) and does nothing.
    #[instrument(skip_all)]
    pub fn commit_staged(&self, message: &str) -> Result<bool> {
        if !self.has_staged_changes()? {
            debug!("no staged changes, skipping commit");
            return Ok(false);
        }
        debug!("committing staged changes");
        self.run_checked(&["commit", "--quiet", "-m", message])?;
        Ok(true)
    }

    /// Short SHA of HEAD.
    pub fn head_short_sha(&self) -> Result<String> {
        let out = self.run_capture(&["rev-parse", "--short=12", "HEAD"])?;
        Ok(out.trim().to_string())
    }

    fn run_capture(&self, args: &[&str]) -> Result<String> {
        let output = self.run_checked(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn run_checked(&self, args: &[&str]) -> Result<Output> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git {} failed: {}", args.join(" "), stderr.trim()));
        }
        Ok(output)
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        let mut cmd = Command::new("git");
        if let Some((name, email)) = &self.identity {
            cmd.arg("-c")
                .arg(format!("user.name={name}"))
                .arg("-c")
                .arg(format!("user.email={email}"));
        }
        cmd.args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    #[test]
    fn init_and_commit_with_identity() {
        if !git_available() {
            return;
        }
        let temp = tempfile::tempdir().expect("tempdir");
        let git = Git::new(temp.path()).with_identity("Test Author", "author@example.com");
        git.init("trunk").expect("init");
        let branch = git
            .run_capture(&["symbolic-ref", "--short", "HEAD"])
            .expect("branch");
        assert_eq!(branch.trim(), "trunk");

        assert!(!git.commit_staged("empty").expect("commit"));

        fs::write(temp.path().join("README.md"), "hello\n").expect("write");
        git.add_all().expect("add");
        assert!(git.commit_staged("Initial commit").expect("commit"));

        let log = git
            .run_capture(&["log", "--format=%an <%ae> %s"])
            .expect("log");
        assert_eq!(log.trim(), "Test Author <author@example.com> Initial commit");
        assert_eq!(git.head_short_sha().expect("sha").len(), 12);
    }
}
