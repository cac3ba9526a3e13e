// ABOUTME: Entry point for the preview-wait CLI application.
// ABOUTME: Parses arguments, wires up logging and cancellation, and runs the waiters.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, WaitArgs};
use preview_wait::config::{self, Config};
use preview_wait::context::RunContext;
use preview_wait::error::{Error, Result};
use preview_wait::github::{GITHUB_API_BASE, GitHubClient};
use preview_wait::output::Output;
use preview_wait::preview::wait_for_preview;
use std::env;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise the verbose flag picks the level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("preview_wait=debug,warn")
        } else {
            EnvFilter::new("preview_wait=info,warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .init();

    let mut output = Output::new(cli.output_mode()).with_github_env();

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling");
            on_signal.cancel();
        }
    });

    let result = match cli.command {
        Commands::Init { force } => init(force, &output),
        Commands::Wait(args) => {
            if let Some(path) = &args.output_file {
                output = output.with_output_file(path);
            }
            output.start_timer();
            wait(args, &output, &cancel).await
        }
    };

    match result {
        Ok(()) => {}
        Err(Error::Cancelled) => {
            output.warning(&Error::Cancelled.to_string());
            std::process::exit(1);
        }
        Err(e) => {
            output.error(&e.to_string());
            std::process::exit(1);
        }
    }
}

fn init(force: bool, output: &Output) -> Result<()> {
    let cwd = env::current_dir()?;
    config::init_config(&cwd, force)?;
    output.success(&format!("Created {}", config::CONFIG_FILENAME));
    Ok(())
}

async fn wait(args: WaitArgs, output: &Output, cancel: &CancellationToken) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&env::current_dir()?)?,
    };
    let settings = config.with_overrides(args.overrides()).resolve()?;
    let context = RunContext::detect(args.context_overrides())?;

    let api_base = env::var("GITHUB_API_URL")
        .ok()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| GITHUB_API_BASE.to_string());
    let api = GitHubClient::builder(&settings.token)
        .base_url(api_base)
        .build()?;

    output.progress(&format!("Waiting for preview of {}", context.repo));
    let outcome = wait_for_preview(&api, &settings, &context, output, cancel).await?;

    output.success(&format!(
        "Preview ready at {} (HTTP {})",
        outcome.url,
        outcome.status.as_u16()
    ));
    Ok(())
}
