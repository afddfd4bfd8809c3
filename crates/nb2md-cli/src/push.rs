//! Commit and push of converted notebooks

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from the git follow-up step
#[derive(Debug, Error)]
pub enum PushError {
    #[error("Failed to run git {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("git {command} exited with code {code}: {output}")]
    Failed {
        command: String,
        code: i32,
        output: String,
    },
}

/// Runs git commands in a working directory
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Add `path`, commit it with `message`, then push
    pub fn commit_and_push(
        &self,
        path: &Path,
        message: &str,
        remote: Option<&str>,
    ) -> Result<(), PushError> {
        info!("Adding, committing and pushing to repository ...");

        let path = path.to_string_lossy().into_owned();
        self.run(&["add", path.as_str()])?;
        self.run(&["commit", "-m", message])?;

        let mut push = vec!["push"];
        push.extend(remote);
        self.run(&push)?;

        Ok(())
    }

    /// Run one git command, returning its standard output
    pub fn run(&self, args: &[&str]) -> Result<String, PushError> {
        let command = args.join(" ");
        debug!("Running git {} in {}", command, self.workdir.display());

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| PushError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PushError::Failed {
                command,
                code: output.status.code().unwrap_or(-1),
                output: format!("{}{}", stdout, stderr).trim().to_string(),
            });
        }

        if !stdout.trim().is_empty() {
            info!("{}", stdout.trim());
        }
        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_subcommand_fails() {
        let dir = tempfile::tempdir().unwrap();
        let git = Git::new(dir.path());
        // Spawn error without git installed, Failed otherwise
        assert!(git.run(&["no-such-subcommand-for-nb2md"]).is_err());
    }

    #[test]
    fn test_commit_outside_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Demo.nb.md");
        std::fs::write(&file, "# Demo").unwrap();

        let git = Git::new(dir.path());
        assert!(git.commit_and_push(&file, "Add notebook", None).is_err());
    }

    #[test]
    fn test_commit_and_push_to_bare_remote() {
        let root = tempfile::tempdir().unwrap();
        if Git::new(root.path()).run(&["--version"]).is_err() {
            return;
        }

        let remote_dir = root.path().join("remote.git");
        let work_dir = root.path().join("work");
        std::fs::create_dir_all(&work_dir).unwrap();

        let remote_path = remote_dir.to_string_lossy().into_owned();
        Git::new(root.path())
            .run(&["init", "--bare", "-b", "main", remote_path.as_str()])
            .unwrap();

        let git = Git::new(&work_dir);
        git.run(&["init", "-b", "main"]).unwrap();
        git.run(&["config", "user.name", "nb2md"]).unwrap();
        git.run(&["config", "user.email", "nb2md@example.org"]).unwrap();
        git.run(&["config", "commit.gpgsign", "false"]).unwrap();
        git.run(&["config", "push.default", "current"]).unwrap();
        git.run(&["remote", "add", "origin", remote_path.as_str()])
            .unwrap();

        let file = work_dir.join("Demo.nb.md");
        std::fs::write(&file, "# Demo\n").unwrap();
        git.commit_and_push(&file, "Add Demo notebook", Some("origin"))
            .unwrap();

        let local = git.run(&["log", "-1", "--format=%s"]).unwrap();
        assert_eq!(local.trim(), "Add Demo notebook");

        let pushed = Git::new(&remote_dir)
            .run(&["log", "-1", "--format=%s", "main"])
            .unwrap();
        assert_eq!(pushed.trim(), "Add Demo notebook");
    }
}
