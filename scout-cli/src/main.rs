use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scout_cli::repl::{self, DEFAULT_TOP_N};
use scout_cli::{Action, ConfigOverrides, Dashboard, OutputFormat, ScoutConfig};

/// Football scouting dashboard: season stats and scouting-report Q&A.
#[derive(Parser, Debug)]
#[command(name = "scout", version, about)]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Season stats CSV (overrides SCOUT_STATS_PATH)
    #[arg(long, global = true, value_name = "FILE")]
    stats: Option<PathBuf>,

    /// Directory of scouting reports (overrides SCOUT_REPORTS_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    reports: Option<PathBuf>,

    /// Use the offline backends even if an API key is set
    #[arg(long, global = true)]
    offline: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show stats for the first player whose name contains NAME
    Player {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Rank players by a metric such as Gls, xG or PrgC
    Top {
        metric: String,

        /// Number of players to show
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N, value_parser = repl::parse_top_n)]
        top: usize,
    },

    /// Ask the scouting reports a question
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// List the metrics the loaded table can be ranked by
    Metrics,

    /// Show what was loaded at startup
    Status,

    /// Start an interactive session (the default)
    Repl,
}

impl Commands {
    fn into_action(self) -> Option<Action> {
        match self {
            Commands::Player { name } => Some(Action::Player { name: name.join(" ") }),
            Commands::Top { metric, top } => Some(Action::Top { metric, top_n: top }),
            Commands::Ask { question } => Some(Action::Ask { question: question.join(" ") }),
            Commands::Metrics => Some(Action::Metrics),
            Commands::Status => Some(Action::Status),
            Commands::Repl => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.log_json {
        scout_telemetry::init_json("scout");
    } else if cli.verbose {
        scout_telemetry::init_with_level("scout", "debug");
    } else {
        scout_telemetry::init_with_level("scout", "warn");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("scout: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let flags = ConfigOverrides {
        stats_path: cli.stats,
        reports_dir: cli.reports,
        api_key: None,
        offline: cli.offline.then_some(true),
    };
    let config = ScoutConfig::resolve(cli.config.as_deref(), ConfigOverrides::from_env(), flags)
        .context("invalid configuration")?;
    let format = if cli.json { OutputFormat::Json } else { OutputFormat::Text };

    let dashboard = Dashboard::build(&config).await;
    if !dashboard.is_usable() {
        anyhow::bail!(
            "neither the stats table {} nor the reports in {} could be loaded",
            config.stats_path.display(),
            config.reports_dir.display()
        );
    }

    match cli.command.and_then(Commands::into_action) {
        Some(action) => println!("{}", dashboard.run(&action, format).await),
        None => repl::run(&dashboard, format).await?,
    }
    Ok(())
}
