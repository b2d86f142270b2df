//! Mock git operations and delay for testing

#![allow(dead_code)]

use async_trait::async_trait;
use autobase::error::{Error, Result};
use autobase::git::GitOps;
use autobase::update::Delay;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted `GitOps`
///
/// `head` answers from a queue (the last answer repeats), so a test can
/// describe "HEAD after clone" and "HEAD after rebase" separately.
pub struct MockGit {
    heads: Mutex<VecDeque<String>>,
    onto: String,
    calls: Mutex<Vec<String>>,
    dirs: Mutex<Vec<PathBuf>>,
    merge_base_timeout: Mutex<bool>,
    fail_rebase: Mutex<Option<String>>,
}

impl MockGit {
    /// HEAD reads return `heads` in order; `origin/<base>` resolves to `onto`
    pub fn new(heads: &[&str], onto: &str) -> Self {
        Self {
            heads: Mutex::new(heads.iter().map(ToString::to_string).collect()),
            onto: onto.to_string(),
            calls: Mutex::new(Vec::new()),
            dirs: Mutex::new(Vec::new()),
            merge_base_timeout: Mutex::new(false),
            fail_rebase: Mutex::new(None),
        }
    }

    /// Make `fetch_until_merge_base` time out
    pub fn time_out_merge_base(&self) {
        *self.merge_base_timeout.lock().unwrap() = true;
    }

    /// Make `rebase` fail
    pub fn fail_rebase(&self, msg: &str) {
        *self.fail_rebase.lock().unwrap() = Some(msg.to_string());
    }

    /// Recorded calls, e.g. `"clone feature"`, `"push --force feature"`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Working directories seen by `clone_branch`
    pub fn dirs(&self) -> Vec<PathBuf> {
        self.dirs.lock().unwrap().clone()
    }

    pub fn pushed(&self) -> bool {
        self.calls().iter().any(|c| c.starts_with("push"))
    }

    pub fn rebased(&self) -> bool {
        self.calls().iter().any(|c| c.starts_with("rebase"))
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl GitOps for MockGit {
    async fn clone_branch(&self, _url: &str, dir: &Path, branch: &str) -> Result<()> {
        assert!(dir.is_dir(), "work dir must exist while cloning");
        self.dirs.lock().unwrap().push(dir.to_path_buf());
        self.record(format!("clone {branch}"));
        Ok(())
    }

    async fn fetch(&self, _dir: &Path, branch: &str) -> Result<()> {
        self.record(format!("fetch {branch}"));
        Ok(())
    }

    async fn fetch_until_merge_base(
        &self,
        _dir: &Path,
        branch: &str,
        timeout: Duration,
    ) -> Result<()> {
        self.record(format!("merge-base {branch}"));
        if *self.merge_base_timeout.lock().unwrap() {
            return Err(Error::MergeBaseTimeout {
                base: branch.to_string(),
                timeout,
            });
        }
        Ok(())
    }

    async fn head(&self, _dir: &Path) -> Result<String> {
        self.record("head".to_string());
        let mut heads = self.heads.lock().unwrap();
        let head = if heads.len() > 1 {
            heads.pop_front()
        } else {
            heads.front().cloned()
        };
        head.ok_or_else(|| Error::Git("no HEAD scripted".to_string()))
    }

    async fn sha(&self, _dir: &Path, rev: &str) -> Result<String> {
        self.record(format!("sha {rev}"));
        Ok(self.onto.clone())
    }

    async fn rebase(&self, _dir: &Path, onto: &str) -> Result<()> {
        self.record(format!("rebase {onto}"));
        if let Some(msg) = self.fail_rebase.lock().unwrap().as_ref() {
            return Err(Error::Git(msg.clone()));
        }
        Ok(())
    }

    async fn push(&self, _dir: &Path, force: bool, branch: &str) -> Result<()> {
        let flag = if force { "--force " } else { "" };
        self.record(format!("push {flag}{branch}"));
        Ok(())
    }
}

/// Delay that records requested waits instead of sleeping
#[derive(Default)]
pub struct RecordingDelay {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn wait(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}
