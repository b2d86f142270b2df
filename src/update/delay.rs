//! Settle delays
//!
//! Branch updates trigger asynchronous automation (status checks, other
//! bots). Executors wait after each real update so the next PR is not
//! evaluated against stale status. Tests inject a non-sleeping delay.

use async_trait::async_trait;
use std::time::Duration;

/// Something that can wait
#[async_trait]
pub trait Delay: Send + Sync {
    /// Wait for `duration`
    async fn wait(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
