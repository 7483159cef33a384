//! HTML pages over the article records.

use axum::{
  extract::{rejection::PathRejection, Path, Query, State},
  response::Response,
};

use super::{flash::Flash, *};

/// Result of an HTML handler.
pub type PageResult = std::result::Result<Response, PageError>;

/// `GET /`: the ten most recent uploads.
pub async fn index(State(state): State<SharedState>, flash: Flash) -> PageResult {
  let articles = state.folio.recent().await?;
  let html = views::index(&articles, flash.message());
  Ok(flash.render(html))
}

/// `GET /article/{id}`: one article, counted as a view.
pub async fn article(
  State(state): State<SharedState>,
  id: std::result::Result<Path<i64>, PathRejection>,
  flash: Flash,
) -> PageResult {
  let article = state.folio.view(article_id(id)?).await?;
  let html = views::article_detail(&article, flash.message());
  Ok(flash.render(html))
}

/// `GET /search`: the search form, with results when a filter was given.
pub async fn search(
  State(state): State<SharedState>,
  Query(filter): Query<SearchFilter>,
  flash: Flash,
) -> PageResult {
  let results = if filter.text().is_some() || filter.category().is_some() {
    Some(state.folio.search(filter.clone()).await?)
  } else {
    None
  };
  let html = views::search(&filter, results.as_deref(), flash.message());
  Ok(flash.render(html))
}
