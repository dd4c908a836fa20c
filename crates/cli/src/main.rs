//! ctxsync CLI - Incremental project indexing and semantic code search

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ctxsync::config::{Config, ConfigOverrides};

mod commands;
mod logging;

use commands::{cmd_config_show, cmd_index, cmd_search};
use logging::init_cli_logging;

#[derive(Parser)]
#[command(name = "ctxsync")]
#[command(about = "Incremental project indexing and semantic code search")]
#[command(after_help = "\
QUICK START:
  ctxsync index                   # Index the current directory
  ctxsync search \"query\"          # Re-index, then search
  ctxsync config show             # Show effective configuration

ENVIRONMENT:
  CTXSYNC_BASE_URL, CTXSYNC_TOKEN, CTXSYNC_BATCH_SIZE, CTXSYNC_MAX_LINES_PER_BLOB,
  CTXSYNC_DATA_DIR, CTXSYNC_DEFAULT_PROJECT, CTXSYNC_LOG_LEVEL, CTXSYNC_CONFIG")]
struct Cli {
  #[command(flatten)]
  global: GlobalArgs,

  #[command(subcommand)]
  command: Commands,
}

/// Settings that override the environment and the settings file
#[derive(Args)]
struct GlobalArgs {
  /// Remote service base URL
  #[arg(long, global = true)]
  base_url: Option<String>,
  /// Remote service bearer token
  #[arg(long, global = true)]
  token: Option<String>,
  /// Maximum blobs per upload request
  #[arg(long, global = true)]
  batch_size: Option<usize>,
  /// Maximum lines per blob before a file is chunked
  #[arg(long, global = true)]
  max_lines: Option<usize>,
  /// Directory holding the project index
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,
}

impl GlobalArgs {
  fn overrides(&self) -> ConfigOverrides {
    ConfigOverrides {
      base_url: self.base_url.clone(),
      token: self.token.clone(),
      batch_size: self.batch_size,
      max_lines_per_blob: self.max_lines,
      data_dir: self.data_dir.clone(),
      default_project: None,
    }
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Index a project (default: configured default project, then current directory)
  Index {
    /// Project root
    path: Option<PathBuf>,
    /// Output the result as JSON
    #[arg(long)]
    json: bool,
  },
  /// Re-index a project and search it
  Search {
    /// Natural-language query
    query: String,
    /// Project root (default: configured default project, then current directory)
    #[arg(short, long)]
    project: Option<PathBuf>,
  },
  /// Configuration management
  Config {
    #[command(subcommand)]
    command: ConfigCommand,
  },
}

#[derive(Subcommand)]
enum ConfigCommand {
  /// Show effective configuration
  Show,
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let config = Config::load(&cli.global.overrides()).context("Failed to load configuration")?;
  init_cli_logging(&config.log_level);

  match cli.command {
    Commands::Index { path, json } => cmd_index(config, path.as_deref(), json).await,
    Commands::Search { query, project } => cmd_search(config, &query, project.as_deref()).await,
    Commands::Config { command } => match command {
      ConfigCommand::Show => cmd_config_show(&config).await,
    },
  }
}
