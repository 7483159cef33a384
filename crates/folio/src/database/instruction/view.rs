use rusqlite::OptionalExtension;

use super::*;

/// Fetches one article and counts the fetch as a view.
///
/// The increment and the read happen in a single `UPDATE ... RETURNING`
/// statement, so concurrent viewers never lose each other's increments and
/// the returned record already includes this view. An unknown id yields
/// [`FolioError::NotFound`] and changes nothing.
pub struct RecordView {
  /// Article to view
  id: i64,
}

impl RecordView {
  /// Views the article with `id`.
  pub fn new(id: i64) -> Self { Self { id } }
}

#[async_trait]
impl DatabaseInstruction for RecordView {
  type Output = Article;

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let id = self.id;
    let article = db
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&format!(
          "UPDATE articles SET views = views + 1 WHERE id = ?1 RETURNING {ARTICLE_COLUMNS}"
        ))?;
        Ok(stmt.query_row([id], article_from_row).optional()?)
      })
      .await?;

    match article {
      Some(article) => {
        debug!(id, views = article.views, "Recorded article view");
        Ok(article)
      },
      None => Err(FolioError::NotFound),
    }
  }
}
