//! autobase CLI

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Keep labeled pull requests up to date with their base branch
#[derive(Parser)]
#[command(name = "autobase", version, about)]
struct Cli {
    /// Path to the config file (default: ~/.config/autobase/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Repository to process as owner/name (overrides the config file)
    #[arg(long, global = true)]
    repo: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every open pull request once
    Run,
    /// Process open pull requests repeatedly until interrupted
    Watch {
        /// Seconds to wait between passes
        #[arg(long, default_value_t = 300)]
        interval: u64,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "autobase=info",
        1 => "autobase=debug",
        _ => "autobase=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run => cli::run_once(cli.config.as_deref(), cli.repo.as_deref()).await,
        Commands::Watch { interval } => {
            cli::run_watch(cli.config.as_deref(), cli.repo.as_deref(), interval).await
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            anstream::eprintln!("{} {e}", cli::style::error_prefix());
            ExitCode::FAILURE
        }
    }
}
