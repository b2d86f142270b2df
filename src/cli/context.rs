//! Shared command context for CLI commands
//!
//! Extracts the setup shared by `run` and `watch`.

use autobase::auth::get_github_auth;
use autobase::config::Config;
use autobase::error::Result;
use autobase::git::GitCli;
use autobase::platform::{GitHubService, PlatformService};
use autobase::update::{TokioDelay, UpdateContext};
use std::path::Path;
use tracing::debug;

/// Shared context for commands that talk to GitHub
///
/// Owns the collaborators so an [`UpdateContext`] can borrow them.
pub struct CommandContext {
    /// Effective configuration
    pub config: Config,
    /// GitHub service
    pub platform: Box<dyn PlatformService>,
    /// Git subprocess runner
    pub git: GitCli,
    /// Settle delay
    pub delay: TokioDelay,
}

impl CommandContext {
    /// Load config, resolve credentials and build the services
    pub async fn new(config_path: Option<&Path>, repo: Option<&str>) -> Result<Self> {
        let mut config = Config::load(config_path)?;
        if let Some(repo) = repo {
            config.repository = repo.to_string();
        }
        let (owner, name) = config.validate()?;

        let auth = get_github_auth(config.host.as_deref()).await?;
        debug!(source = ?auth.source, "resolved GitHub token");

        let platform = GitHubService::new(&auth.token, owner, name, config.host.clone())?;
        let git = GitCli::new(&config.git);

        Ok(Self {
            config,
            platform: Box::new(platform),
            git,
            delay: TokioDelay,
        })
    }

    /// Borrow everything as an engine context
    pub fn update_context(&self) -> UpdateContext<'_> {
        UpdateContext {
            config: &self.config,
            platform: self.platform.as_ref(),
            git: &self.git,
            delay: &self.delay,
        }
    }
}
