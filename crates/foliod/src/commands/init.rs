//! Module for setting up a [`folio`] archive.

use super::*;

/// Function for the [`Commands::Init`] in the CLI.
///
/// Writes the configuration file (built from the defaults plus any command
/// line overrides) and opens the archive once so the database and uploads
/// directory exist. An existing configuration file is only replaced after
/// confirmation.
pub async fn init(cli: &Cli) -> Result<()> {
  let path = cli.config_path()?;

  if path.exists() {
    println!(
      "{} Configuration already exists at: {}",
      style(WARNING_PREFIX).yellow(),
      style(path.display()).yellow()
    );
    let overwrite = !cli.accept_defaults
      && dialoguer::Confirm::new()
        .with_prompt("Do you want to overwrite this configuration?")
        .default(false)
        .interact()?;
    if !overwrite {
      println!("{} Keeping the existing configuration", style(INFO_PREFIX).cyan());
      return Ok(());
    }
  }

  let config = cli.apply_overrides(Config::default());
  config.save(&path)?;
  let folio = Folio::builder().with_config(config).build().await?;
  let config = folio.config();

  println!("{} Folio initialized successfully", style(SUCCESS_PREFIX).green());
  for (label, value) in [
    ("Config", path.display().to_string()),
    ("Database", config.database_path.display().to_string()),
    ("Uploads", config.uploads_path.display().to_string()),
    ("Issues", config.issues_path.display().to_string()),
    ("Address", config.bind_address.clone()),
  ] {
    println!("   {} {}", style(format!("{label:<9}")).bold(), style(value).yellow());
  }

  if !config.issues_path.exists() {
    println!(
      "{} Issues directory does not exist yet; create one folder per issue inside it",
      style(INFO_PREFIX).cyan()
    );
  }
  Ok(())
}
