#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "git-recommend: suggest contributors for GitHub issues",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format. Defaults to pretty on a TTY, text when piped.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Recommend contributors for an issue",
        long_about = "Rank contributors for the issue in a JSON snapshot by fusing BM25 relevance \
                      over closed pull requests with recency-weighted commit activity.",
        after_help = "EXAMPLES:\n    # Recommend three contributors\n    git-recommend recommend --snapshot issue-42.json\n\n    # Pin the clock and widen the result\n    git-recommend recommend --snapshot issue-42.json --now 2025-01-20T00:00:00Z --top-n 5\n\n    # Emit machine-readable output\n    git-recommend recommend --snapshot issue-42.json --format json"
    )]
    Recommend(cmd::recommend::RecommendArgs),

    #[command(
        about = "Fuse ranked lists with Reciprocal Rank Fusion",
        after_help = "EXAMPLES:\n    # Fuse two rankings\n    git-recommend fuse by-text.json by-recency.json\n\n    # Sharper rank-1 advantage\n    git-recommend fuse a.json b.json --rrf-k 10"
    )]
    Fuse(cmd::fuse::FuseArgs),

    #[command(
        about = "Filter bot accounts out of a list of identifiers",
        after_help = "EXAMPLES:\n    # Classify arguments\n    git-recommend humans octocat 'dependabot[bot]'\n\n    # Classify stdin\n    cat logins.txt | git-recommend humans"
    )]
    Humans(cmd::humans::HumansArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    git-recommend completions bash\n\n    # Generate zsh completions\n    git-recommend completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("GIT_RECOMMEND_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "git_recommend=debug,recommend_core=debug,recommend_rank=debug,info"
        } else {
            "git_recommend=info,warn"
        })
    });

    let format = env::var("GIT_RECOMMEND_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let output = resolve_output_mode(cli.format);

    let command_result = match cli.command {
        Commands::Recommend(ref args) => {
            cmd::recommend::run_recommend(args, output, &project_root)
        }
        Commands::Fuse(ref args) => cmd::fuse::run_fuse(args, output),
        Commands::Humans(ref args) => cmd::humans::run_humans(args, output, &project_root),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    };

    if let Err(err) = command_result {
        render_error(output, &CliError::from_anyhow(&err))?;
        std::process::exit(1);
    }
    Ok(())
}
