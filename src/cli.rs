// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Every wait option also reads its GitHub Actions INPUT_* variable.

use clap::{Args, Parser, Subcommand};
use preview_wait::config::Overrides;
use preview_wait::context::ContextOverrides;
use preview_wait::output::OutputMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "preview-wait")]
#[command(about = "Wait for a preview deployment to exist, succeed, and serve traffic")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a preview-wait.yml template to the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Wait for the preview deployment of a commit or pull request
    Wait(WaitArgs),
}

#[derive(Args)]
pub struct WaitArgs {
    /// Config file (defaults to preview-wait.yml in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// GitHub token used for the deployments API
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Password protecting the preview
    #[arg(long, env = "INPUT_VERCEL_PASSWORD", hide_env_values = true)]
    pub vercel_password: Option<String>,

    /// Protection bypass secret sent as x-vercel-protection-bypass
    #[arg(
        long,
        env = "INPUT_VERCEL_PROTECTION_BYPASS_HEADER",
        hide_env_values = true
    )]
    pub protection_bypass_header: Option<String>,

    /// Only consider deployments to this environment
    #[arg(long, env = "INPUT_ENVIRONMENT")]
    pub environment: Option<String>,

    /// Seconds each stage may wait
    #[arg(long, env = "INPUT_MAX_TIMEOUT")]
    pub max_timeout: Option<u64>,

    /// Seconds between attempts
    #[arg(long, env = "INPUT_CHECK_INTERVAL")]
    pub check_interval: Option<u64>,

    /// Accept an inactive deployment as ready
    #[arg(long, env = "INPUT_ALLOW_INACTIVE")]
    pub allow_inactive: Option<bool>,

    /// Path to request on the preview
    #[arg(long, env = "INPUT_PATH")]
    pub path: Option<String>,

    /// Login of the account that creates the deployments
    #[arg(long, env = "INPUT_ACTOR_NAME")]
    pub actor: Option<String>,

    /// Repository as owner/repo (defaults to GITHUB_REPOSITORY)
    #[arg(long)]
    pub repository: Option<String>,

    /// Commit to wait for (defaults to the event's commit)
    #[arg(long, conflicts_with = "pull_request")]
    pub sha: Option<String>,

    /// Pull request whose head commit to wait for
    #[arg(long)]
    pub pull_request: Option<u64>,

    /// File to append step outputs to (defaults to GITHUB_OUTPUT)
    #[arg(long)]
    pub output_file: Option<PathBuf>,
}

impl WaitArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            token: self.token.clone(),
            vercel_password: self.vercel_password.clone(),
            protection_bypass_header: self.protection_bypass_header.clone(),
            environment: self.environment.clone(),
            max_timeout: self.max_timeout,
            check_interval: self.check_interval,
            allow_inactive: self.allow_inactive,
            path: self.path.clone(),
            actor: self.actor.clone(),
        }
    }

    pub fn context_overrides(&self) -> ContextOverrides {
        ContextOverrides {
            repository: self.repository.clone(),
            sha: self.sha.clone(),
            pull_request: self.pull_request,
        }
    }
}
