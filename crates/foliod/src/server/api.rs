//! JSON API over the article records.

use axum::{
  extract::{rejection::PathRejection, Path, Query, State},
  Json,
};

use super::*;

/// `GET /api/articles`: every article, newest first.
pub async fn list_articles(State(state): State<SharedState>) -> Result<Json<Vec<Article>>> {
  Ok(Json(state.folio.articles().await?))
}

/// `GET /api/articles/{id}`: one article, counted as a view.
pub async fn get_article(
  State(state): State<SharedState>,
  id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Article>> {
  Ok(Json(state.folio.view(article_id(id)?).await?))
}

/// `GET /api/search?q=&category=`: articles matching the filter.
pub async fn search(
  State(state): State<SharedState>,
  Query(filter): Query<SearchFilter>,
) -> Result<Json<Vec<Article>>> {
  debug!(?filter, "Searching articles");
  Ok(Json(state.folio.search(filter).await?))
}
