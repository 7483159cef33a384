//! Module for the "clean" command.

use std::ffi::OsString;

use super::*;

/// Files SQLite may leave next to the database.
const AUXILIARY_SUFFIXES: [&str; 3] = ["-journal", "-wal", "-shm"];

/// Function for the [`Commands::Clean`] in the CLI.
pub async fn clean(cli: &Cli) -> Result<()> {
  let config = cli.load_config()?;
  let path = &config.database_path;

  if !path.exists() {
    println!(
      "{} No database found at: {}",
      style(WARNING_PREFIX).yellow(),
      style(path.display()).yellow()
    );
    return Ok(());
  }

  println!("{} Database found at: {}", style(WARNING_PREFIX).yellow(), style(path.display()).yellow());

  // Skip confirmations if force flag is set
  if !cli.accept_defaults {
    if !dialoguer::Confirm::new()
      .with_prompt("Are you sure you want to delete this database?")
      .default(false)
      .wait_for_newline(true)
      .interact()?
    {
      println!("{} Operation cancelled", style(ERROR_PREFIX).red());
      return Ok(());
    }

    // Require typing DELETE for final confirmation
    let input = dialoguer::Input::<String>::new()
      .with_prompt(format!(
        "{} Type {} to confirm deletion",
        style(WARNING_PREFIX).red(),
        style("DELETE").red().bold()
      ))
      .interact_text()?;

    if input != "DELETE" {
      println!("{} Operation cancelled", style(ERROR_PREFIX).red());
      return Ok(());
    }
  }

  println!("{} Removing database: {}", style(WARNING_PREFIX).yellow(), style(path.display()).yellow());
  std::fs::remove_file(path)?;

  for suffix in AUXILIARY_SUFFIXES {
    let mut auxiliary = OsString::from(path.as_os_str());
    auxiliary.push(suffix);
    let auxiliary = PathBuf::from(auxiliary);
    if auxiliary.exists() {
      std::fs::remove_file(&auxiliary)?;
    }
  }

  // Uploaded PDFs stay in place.
  println!("{} Database files cleaned", style(SUCCESS_PREFIX).green());
  Ok(())
}
