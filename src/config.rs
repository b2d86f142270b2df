//! Process-wide configuration, loaded once from TOML.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name under the user config dir
const CONFIG_DIR: &str = "autobase";

/// Config filename
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Repository to process, as `owner/name`
    pub repository: String,
    /// GitHub Enterprise host (None for github.com)
    pub host: Option<String>,
    /// Label names and sets
    pub labels: LabelConfig,
    /// Delays, timeouts and page sizes
    pub timing: TimingConfig,
    /// Local git settings for rebases
    pub git: GitConfig,
}

/// Label configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelConfig {
    /// Label requesting a merge of base into head
    pub merge: String,
    /// Label requesting a rebase onto base
    pub rebase: String,
    /// Label that bypasses review stability validation
    pub skip_validation: String,
    /// Any of these vetoes processing
    pub blocking: Vec<String>,
    /// All of these must be present
    pub required: Vec<String>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            merge: "automerge".to_string(),
            rebase: "autorebase".to_string(),
            skip_validation: "skip-review-check".to_string(),
            blocking: vec!["do-not-merge".to_string()],
            required: Vec::new(),
        }
    }
}

impl LabelConfig {
    /// The action label names, merge first
    pub fn action_labels(&self) -> [&str; 2] {
        [self.merge.as_str(), self.rebase.as_str()]
    }
}

/// Timing configuration, in seconds where applicable
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Wait after pushing a branch update before moving on
    pub settle_delay_secs: u64,
    /// Upper bound for the merge-base search during a rebase
    pub merge_base_timeout_secs: u64,
    /// Extra fetches of the mergeable state while GitHub reports `unknown`
    pub mergeable_poll_attempts: u32,
    /// Wait between mergeable state fetches
    pub mergeable_poll_interval_secs: u64,
    /// Open PRs fetched per pass
    pub page_size: u8,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_delay_secs: 30,
            merge_base_timeout_secs: 60,
            mergeable_poll_attempts: 3,
            mergeable_poll_interval_secs: 2,
            page_size: 30,
        }
    }
}

impl TimingConfig {
    /// Settle delay as a `Duration`
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    /// Merge-base search deadline as a `Duration`
    pub const fn merge_base_timeout(&self) -> Duration {
        Duration::from_secs(self.merge_base_timeout_secs)
    }

    /// Interval between mergeable state polls
    pub const fn mergeable_poll_interval(&self) -> Duration {
        Duration::from_secs(self.mergeable_poll_interval_secs)
    }
}

/// Git settings used for local rebases
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Committer name for rebased commits
    pub user_name: String,
    /// Committer email for rebased commits
    pub user_email: String,
    /// Depth of the initial clone and of each deepening fetch
    pub clone_depth: u32,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            user_name: "autobase".to_string(),
            user_email: "autobase@users.noreply.github.com".to_string(),
            clone_depth: 50,
        }
    }
}

/// Default config path (`~/.config/autobase/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
}

impl Config {
    /// Load configuration from `path`, or the default location.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// explicitly requested file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(Error::Config(format!("{} does not exist", path.display())));
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Check the configuration is usable and split the repository identifier
    pub fn validate(&self) -> Result<(String, String)> {
        let (owner, repo) = parse_repository(&self.repository)?;

        if self.labels.merge.is_empty() || self.labels.rebase.is_empty() {
            return Err(Error::Config("action labels must not be empty".to_string()));
        }
        if self.labels.merge == self.labels.rebase {
            return Err(Error::Config(format!(
                "merge and rebase labels are both '{}'",
                self.labels.merge
            )));
        }
        if self.timing.page_size == 0 {
            return Err(Error::Config("page_size must be at least 1".to_string()));
        }

        Ok((owner, repo))
    }
}

/// Split `owner/name` into its parts
pub fn parse_repository(s: &str) -> Result<(String, String)> {
    let s = s.trim().trim_end_matches('/');
    match s.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.trim_end_matches(".git").to_string()))
        }
        _ if s.is_empty() => Err(Error::Config(
            "no repository configured (use --repo owner/name or set `repository`)".to_string(),
        )),
        _ => Err(Error::Config(format!(
            "repository '{s}' is not of the form owner/name"
        ))),
    }
}
