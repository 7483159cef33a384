//! Module for the "serve" command.

use foliod::server;

use super::*;

/// Function for the [`Commands::Serve`] in the CLI.
pub async fn serve(cli: &Cli) -> Result<()> {
  let config = cli.load_config()?;
  let folio = Folio::builder().with_config(config).build().await?;

  println!(
    "{} Serving folio on {}",
    style(INFO_PREFIX).cyan(),
    style(format!("http://{}", folio.config().bind_address)).yellow()
  );
  server::serve(folio, server::shutdown_signal()).await?;
  println!("{} Server stopped", style(SUCCESS_PREFIX).green());
  Ok(())
}
