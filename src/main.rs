//! radar - find colliding branches before you merge them

mod cli;

use anstream::eprintln;
use clap::{Args, Parser, Subcommand};
use cli::check::{CheckOptions, run_check};
use cli::context::Selection;
use cli::dry_merge::{DryMergeCommandOptions, run_dry_merge};
use cli::order::{OrderOptions, run_order};
use cli::style::Stylize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "radar")]
#[command(about = "Find files touched by parallel branches and plan a low-conflict merge order")]
#[command(version)]
struct Cli {
    /// Path to the repository (defaults to the current directory)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct BranchArgs {
    /// Branches to analyze (defaults to config, then worktree branches)
    branches: Vec<String>,

    /// Base branch to diff against (defaults to config, then origin/HEAD, main, master)
    #[arg(short, long)]
    base: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl BranchArgs {
    fn selection(&self, jobs: Option<usize>) -> Selection {
        Selection {
            branches: self.branches.clone(),
            base: self.base.clone(),
            jobs,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Report files changed by more than one branch
    Check {
        #[command(flatten)]
        args: BranchArgs,

        /// Also confirm real conflicts with simulated merges
        #[arg(long)]
        dry_merge: bool,

        /// With --dry-merge, check every pair instead of overlapping pairs only
        #[arg(long)]
        all_pairs: bool,

        /// Maximum simultaneous git operations
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Give up on the dry-merge batch after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Simulate pairwise merges without touching the working tree
    DryMerge {
        #[command(flatten)]
        args: BranchArgs,

        /// Check every pair instead of pairs sharing an overlapping file
        #[arg(long)]
        all_pairs: bool,

        /// Maximum simultaneous git operations
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Suggest a merge order that keeps remaining overlap low
    Order {
        #[command(flatten)]
        args: BranchArgs,

        /// Maximum simultaneous git operations
        #[arg(short, long)]
        jobs: Option<usize>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("merge_radar=debug,radar=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let path = cli.path.unwrap_or_else(|| PathBuf::from("."));

    let result = match cli.command {
        Commands::Check {
            args,
            dry_merge,
            all_pairs,
            jobs,
            timeout,
        } => {
            run_check(
                &path,
                args.selection(jobs),
                CheckOptions {
                    json: args.json,
                    dry_merge,
                    all_pairs,
                    timeout_secs: timeout,
                },
            )
            .await
        }
        Commands::DryMerge {
            args,
            all_pairs,
            jobs,
            timeout,
        } => {
            run_dry_merge(
                &path,
                args.selection(jobs),
                DryMergeCommandOptions {
                    json: args.json,
                    all_pairs,
                    timeout_secs: timeout,
                },
            )
            .await
        }
        Commands::Order { args, jobs } => {
            run_order(&path, args.selection(jobs), OrderOptions { json: args.json }).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "Error:".danger());
            ExitCode::FAILURE
        }
    }
}
