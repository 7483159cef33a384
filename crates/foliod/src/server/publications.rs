//! Browsing of the curated issues tree.

use axum::{
  extract::{Path, State},
  response::Response,
};

use super::{
  files::inline_file,
  flash::{self, Flash, FlashKind},
  pages::PageResult,
  *,
};

/// Route of the issues listing, also the target of failed lookups.
const PUBLICATIONS_ROUTE: &str = "/publications";

/// `GET /publications`: every issue and its articles.
pub async fn index(State(state): State<SharedState>, flash: Flash) -> PageResult {
  let issues = state.folio.catalog().issues().await?;
  let html = views::publications(&issues, flash.message());
  Ok(flash.render(html))
}

/// `GET /publications/view/{*path}`: viewer page for one publication.
///
/// Paths that do not lead to a file inside the issues root send the reader
/// back to the listing with a flash.
pub async fn view(
  State(state): State<SharedState>,
  Path(path): Path<String>,
  flash: Flash,
) -> PageResult {
  match state.folio.catalog().locate(&path).await {
    Ok(publication) => {
      let html = views::viewer(&publication, flash.message());
      Ok(flash.render(html))
    },
    Err(e) if e.is_not_found() => {
      debug!(%path, error = %e, "Publication not found");
      Ok(flash::redirect(PUBLICATIONS_ROUTE, FlashKind::Error, "Article not found"))
    },
    Err(e) => Err(e.into()),
  }
}

/// `GET /publications/pdf/{*path}`: raw bytes of one publication.
pub async fn pdf(State(state): State<SharedState>, Path(path): Path<String>) -> PageResult {
  let bytes = state.folio.catalog().open(&path).await?;
  Ok(inline_file(&path, bytes))
}
