//! Command line interface and web server for the folio publication archive.
//!
//! # Usage
//!
//! ```bash
//! # Write a configuration file and create the database
//! foliod init --database ./folio.db --uploads ./uploads --issues ./articles
//!
//! # Serve the archive (the default command)
//! foliod -vv serve --bind 0.0.0.0:5000
//!
//! # Remove the database
//! foliod clean
//! ```
//!
//! Options given on the command line take precedence over the configuration
//! file, which in turn overrides the built-in defaults.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use clap::{builder::ArgAction, Parser};
use console::style;
use folio::{Config, Folio};
use foliod::error::Result;
use tracing::{debug, trace};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

use crate::commands::*;

/// Prefix for information messages
static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for warning messages
static WARNING_PREFIX: &str = "⚠️ ";
/// Prefix for error messages
static ERROR_PREFIX: &str = "✗ ";

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Web server and CLI for the folio publication archive")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Configuration file. Defaults to the platform configuration directory.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// Database file, overriding the configuration
  #[arg(long, global = true)]
  database: Option<PathBuf>,

  /// Directory for uploaded PDFs, overriding the configuration
  #[arg(long, global = true)]
  uploads: Option<PathBuf>,

  /// Root of the curated issues tree, overriding the configuration
  #[arg(long, global = true)]
  issues: Option<PathBuf>,

  /// Address to serve on, overriding the configuration
  #[arg(long, global = true)]
  bind: Option<String>,

  /// Also write logs to a daily rotated file in this directory
  #[arg(long, global = true)]
  log_dir: Option<PathBuf>,

  /// The subcommand to execute, `serve` when omitted
  #[command(subcommand)]
  command: Option<Commands>,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

impl Cli {
  /// Path of the configuration file in use.
  fn config_path(&self) -> Result<PathBuf> {
    match &self.config {
      Some(path) => Ok(path.clone()),
      None => Ok(Config::default_path()?),
    }
  }

  /// Applies the per-field overrides given on the command line.
  fn apply_overrides(&self, mut config: Config) -> Config {
    if let Some(path) = &self.database {
      config = config.with_database_path(path);
    }
    if let Some(path) = &self.uploads {
      config = config.with_uploads_path(path);
    }
    if let Some(path) = &self.issues {
      config = config.with_issues_path(path);
    }
    if let Some(address) = &self.bind {
      config = config.with_bind_address(address);
    }
    config
  }

  /// Loads the configuration for commands that use an existing setup.
  ///
  /// An explicitly given file must exist; the default file is optional.
  fn load_config(&self) -> Result<Config> {
    let path = self.config_path()?;
    let config = if self.config.is_some() || path.exists() {
      debug!(path = %path.display(), "Loading configuration");
      Config::load(&path)?
    } else {
      debug!(path = %path.display(), "No configuration file, using defaults");
      Config::default()
    };
    Ok(self.apply_overrides(config))
  }
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
///
/// `RUST_LOG` takes precedence when set. With a `log_dir`, output is also
/// written to `foliod.log.<date>` in that directory; the returned guard must be
/// held until exit so buffered lines are flushed.
fn setup_logging(verbosity: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  let console = fmt::layer()
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true);

  let (file, guard) = match log_dir {
    Some(dir) => {
      let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "foliod.log"));
      let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true);
      (Some(layer), Some(guard))
    },
    None => (None, None),
  };

  tracing_subscriber::registry().with(filter).with(console).with(file).init();
  guard
}

/// Entry point for the foliod CLI application
///
/// Parses arguments, sets up logging and runs the requested command. Errors
/// are printed and turn into a non-zero exit code.
#[tokio::main]
async fn main() {
  let cli = Cli::parse();
  let guard = setup_logging(cli.verbose, cli.log_dir.as_deref());
  trace!("Parsed command line");

  let result = match cli.command.clone().unwrap_or(Commands::Serve) {
    Commands::Serve => serve(&cli).await,
    Commands::Init => init(&cli).await,
    Commands::Clean => clean(&cli).await,
  };

  if let Err(e) = result {
    eprintln!("{} {}", style(ERROR_PREFIX).red(), e);
    drop(guard);
    std::process::exit(1);
  }
}
