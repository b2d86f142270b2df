//! `GitOps` backed by the `git` binary

use super::{GitOps, remote_ref};
use crate::config::GitConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs `git` subprocesses with a fixed committer identity
#[derive(Debug, Clone)]
pub struct GitCli {
    user_name: String,
    user_email: String,
    depth: u32,
}

impl GitCli {
    /// Create from the `[git]` configuration section
    pub fn new(config: &GitConfig) -> Self {
        Self {
            user_name: config.user_name.clone(),
            user_email: config.user_email.clone(),
            depth: config.clone_depth.max(1),
        }
    }

    fn command(&self, dir: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-c")
            .arg(format!("user.name={}", self.user_name))
            .arg("-c")
            .arg(format!("user.email={}", self.user_email))
            .args(args)
            .current_dir(dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true);
        cmd
    }

    /// Run git and return trimmed stdout; fails on a non-zero exit
    async fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        // Never log the full argument list: clone URLs carry credentials
        let subcommand = args.first().copied().unwrap_or_default();
        debug!(subcommand, dir = %dir.display(), "running git");

        let output = self
            .command(dir, args)
            .output()
            .await
            .map_err(|e| Error::Git(format!("failed to run git {subcommand}: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(format!(
                "git {subcommand} failed: {}",
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run git and report only whether it exited successfully
    async fn probe(&self, dir: &Path, args: &[&str]) -> Result<bool> {
        let output = self
            .command(dir, args)
            .output()
            .await
            .map_err(|e| Error::Git(format!("failed to run git: {e}")))?;
        Ok(output.status.success())
    }

    fn depth_arg(&self) -> String {
        format!("--depth={}", self.depth)
    }
}

fn tracking_refspec(branch: &str) -> String {
    format!("+refs/heads/{branch}:refs/remotes/origin/{branch}")
}

#[async_trait]
impl GitOps for GitCli {
    async fn clone_branch(&self, url: &str, dir: &Path, branch: &str) -> Result<()> {
        let depth = self.depth_arg();
        self.run(
            dir,
            &["clone", &depth, "--single-branch", "--branch", branch, url, "."],
        )
        .await?;
        Ok(())
    }

    async fn fetch(&self, dir: &Path, branch: &str) -> Result<()> {
        let depth = self.depth_arg();
        let refspec = tracking_refspec(branch);
        self.run(dir, &["fetch", &depth, "origin", &refspec]).await?;
        Ok(())
    }

    async fn fetch_until_merge_base(
        &self,
        dir: &Path,
        branch: &str,
        timeout: Duration,
    ) -> Result<()> {
        let base = remote_ref(branch);
        let deepen = format!("--deepen={}", self.depth);

        let search = async {
            let head_branch = self.run(dir, &["symbolic-ref", "--short", "HEAD"]).await?;
            let head_refspec = tracking_refspec(&head_branch);
            let base_refspec = tracking_refspec(branch);
            let mut rounds = 0u32;

            loop {
                if self.probe(dir, &["merge-base", "HEAD", &base]).await? {
                    debug!(rounds, base = %base, "found merge base");
                    return Ok(());
                }

                let shallow = self
                    .run(dir, &["rev-parse", "--is-shallow-repository"])
                    .await?;
                if shallow != "true" {
                    return Err(Error::Git(format!("HEAD and {base} share no history")));
                }

                rounds += 1;
                self.run(
                    dir,
                    &["fetch", &deepen, "origin", &head_refspec, &base_refspec],
                )
                .await?;
            }
        };

        tokio::time::timeout(timeout, search)
            .await
            .map_err(|_| Error::MergeBaseTimeout {
                base: branch.to_string(),
                timeout,
            })?
    }

    async fn head(&self, dir: &Path) -> Result<String> {
        self.sha(dir, "HEAD").await
    }

    async fn sha(&self, dir: &Path, rev: &str) -> Result<String> {
        let sha = self.run(dir, &["rev-parse", "--verify", rev]).await?;
        if sha.is_empty() {
            return Err(Error::Git(format!("git rev-parse {rev} returned empty output")));
        }
        Ok(sha)
    }

    async fn rebase(&self, dir: &Path, onto: &str) -> Result<()> {
        if let Err(e) = self.run(dir, &["rebase", onto]).await {
            if let Err(abort) = self.run(dir, &["rebase", "--abort"]).await {
                warn!(error = %abort, "failed to abort rebase");
            }
            return Err(e);
        }
        Ok(())
    }

    async fn push(&self, dir: &Path, force: bool, branch: &str) -> Result<()> {
        let target = format!("HEAD:refs/heads/{branch}");
        let mut args = vec!["push"];
        if force {
            args.push("--force");
        }
        args.extend(["origin", target.as_str()]);
        self.run(dir, &args).await?;
        Ok(())
    }
}
