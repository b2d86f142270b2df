//! Run and watch commands - process open pull requests

use crate::cli::context::CommandContext;
use crate::cli::style::{CHECK, Stylize};
use anstream::println;
use autobase::error::Result;
use autobase::update::{PassSummary, run_pass};
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

/// Run one pass; returns whether every PR was processed without error
pub async fn run_once(config_path: Option<&Path>, repo: Option<&str>) -> Result<bool> {
    let ctx = CommandContext::new(config_path, repo).await?;
    let summary = run_pass(&ctx.update_context()).await?;
    print_summary(&summary);
    Ok(summary.is_success())
}

/// Run passes every `interval_secs` seconds until Ctrl-C
pub async fn run_watch(
    config_path: Option<&Path>,
    repo: Option<&str>,
    interval_secs: u64,
) -> Result<bool> {
    let ctx = CommandContext::new(config_path, repo).await?;
    let interval = Duration::from_secs(interval_secs);

    loop {
        // A failed pass is retried on the next tick
        match run_pass(&ctx.update_context()).await {
            Ok(summary) => print_summary(&summary),
            Err(e) => error!(error = %e, "pass failed"),
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, stopping");
                return Ok(true);
            }
            () = tokio::time::sleep(interval) => {}
        }
    }
}

/// Print pass summary
fn print_summary(summary: &PassSummary) {
    if summary.total() == 0 {
        println!("{}", "No open pull requests.".muted());
        return;
    }

    for (number, sha) in &summary.updated {
        println!("  {} PR #{number} at {}", CHECK.success(), short_sha(sha).accent());
    }
    for (number, reason) in &summary.skipped {
        println!("  {}", format!("- PR #{number}: {reason}").muted());
    }
    for (number, message) in &summary.failed {
        println!("  {} PR #{number}: {message}", "✗".warn());
    }

    println!(
        "{} {} up to date, {} skipped, {} failed",
        "Pass complete:".emphasis(),
        summary.updated.len().accent(),
        summary.skipped.len().accent(),
        summary.failed.len().accent()
    );
}

fn short_sha(sha: &str) -> &str {
    sha.get(..12).unwrap_or(sha)
}
