use super::*;

/// Inserts a new article and returns it with its assigned id.
///
/// `views` and `citations` always start at zero; the upload date defaults to
/// the time of execution.
pub struct Add {
  /// Record to insert
  article: NewArticle,
}

impl Add {
  /// Inserts `article`.
  pub fn new(article: NewArticle) -> Self { Self { article } }
}

#[async_trait]
impl DatabaseInstruction for Add {
  type Output = Article;

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let upload_date = self.article.upload_date.unwrap_or_else(Utc::now);
    let authors = encode_list(&self.article.authors)?;
    let keywords = encode_list(&self.article.keywords)?;

    let title = self.article.title.clone();
    let abstract_text = self.article.abstract_text.clone();
    let category = self.article.category.clone();
    let pdf_path = self.article.pdf_path.clone();
    let stored_date = format_timestamp(&upload_date);

    let id = db
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "INSERT INTO articles (
              title, authors, abstract, keywords, category,
              pdf_path, upload_date, views, citations
          ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, 0)
          RETURNING id",
        )?;
        let id = stmt.query_row(
          params![title, authors, abstract_text, keywords, category, pdf_path, stored_date],
          |row| row.get::<_, i64>(0),
        )?;
        Ok(id)
      })
      .await?;

    debug!(id, "Inserted article");
    // Reload the stored date so the returned record matches later reads exactly.
    let upload_date = DateTime::parse_from_rfc3339(&format_timestamp(&upload_date))
      .map(|dt| dt.with_timezone(&Utc))
      .unwrap_or(upload_date);

    Ok(Article {
      id,
      title: self.article.title.clone(),
      authors: self.article.authors.clone(),
      abstract_text: self.article.abstract_text.clone(),
      keywords: self.article.keywords.clone(),
      category: self.article.category.clone(),
      pdf_path: self.article.pdf_path.clone(),
      upload_date,
      views: 0,
      citations: 0,
    })
  }
}
