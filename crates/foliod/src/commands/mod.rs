//! Subcommands of the foliod CLI.

use clap::Subcommand;

use super::*;

/// Removal of the database files
pub mod clean;
/// First time setup
pub mod init;
/// The HTTP server
pub mod serve;

pub use clean::clean;
pub use init::init;
pub use serve::serve;

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Serve the archive over HTTP until interrupted (default when no command specified)
  Serve,

  /// Write a configuration file and create the database and uploads directory
  Init,

  /// Removes the database after confirmation
  Clean,
}
