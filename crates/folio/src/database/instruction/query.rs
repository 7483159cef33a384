//! Listing, lookup and filtering of articles.
//!
//! A [`Query`] combines one [`QueryCriteria`] with optional ordering and a
//! row limit. Filtering happens in SQL:
//!
//! - category is an equality test
//! - free text is a case-sensitive substring test (`instr`) against the title,
//!   the abstract and the stored author list, OR-ed together
//! - both filters, when present, are AND-ed
//!
//! ```no_run
//! # use folio::database::*;
//! # use folio::prelude::*;
//! # async fn example(db: &Database) -> Result<(), FolioError> {
//! let filter = SearchFilter::new().with_text("Smith").with_category("history");
//! let hits = Query::matching(filter).order_by(OrderField::UploadDate).descending().execute(db).await?;
//! # Ok(())
//! # }
//! ```

use rusqlite::params_from_iter;

use super::*;

/// Optional text and category constraints for a search.
///
/// Empty strings mean "no constraint", matching what a blank search form
/// submits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchFilter {
  /// Substring to look for in title, abstract or authors
  #[serde(default, rename = "q")]
  pub text:     Option<String>,
  /// Exact category slug
  #[serde(default)]
  pub category: Option<String>,
}

impl SearchFilter {
  /// A filter that matches everything.
  pub fn new() -> Self { Self::default() }

  /// Requires `text` in the title, abstract or authors.
  pub fn with_text(mut self, text: impl Into<String>) -> Self {
    self.text = Some(text.into());
    self
  }

  /// Requires the exact category slug.
  pub fn with_category(mut self, category: impl Into<String>) -> Self {
    self.category = Some(category.into());
    self
  }

  /// The text constraint, if any. An empty string is no constraint.
  pub fn text(&self) -> Option<&str> { self.text.as_deref().filter(|t| !t.is_empty()) }

  /// The category constraint, if any. An empty string is no constraint.
  pub fn category(&self) -> Option<&str> { self.category.as_deref().filter(|c| !c.is_empty()) }
}

/// Represents different ways to select articles.
#[derive(Debug, Clone)]
pub enum QueryCriteria {
  /// Every article
  All,
  /// A single article by id
  Id(i64),
  /// Articles passing a search filter
  Matching(SearchFilter),
}

/// Available fields for ordering query results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
  /// Order by title
  Title,
  /// Order by upload date
  UploadDate,
}

impl OrderField {
  /// Column name to order by.
  fn as_sql_str(&self) -> &'static str {
    match self {
      OrderField::Title => "title",
      OrderField::UploadDate => "upload_date",
    }
  }
}

/// A query for retrieving articles from the database
#[derive(Debug, Clone)]
pub struct Query {
  /// Which articles to select
  criteria:   QueryCriteria,
  /// Sort column, insertion order when unset
  order_by:   Option<OrderField>,
  /// Whether to sort descending
  descending: bool,
  /// Row cap
  limit:      Option<usize>,
}

impl Query {
  /// Creates a new query with the given criteria
  pub fn new(criteria: QueryCriteria) -> Self {
    Self { criteria, order_by: None, descending: false, limit: None }
  }

  /// Creates a query that returns all articles
  pub fn list_all() -> Self { Self::new(QueryCriteria::All) }

  /// Creates a query for a single article. Does not count as a view.
  pub fn by_id(id: i64) -> Self { Self::new(QueryCriteria::Id(id)) }

  /// Creates a filtered query
  pub fn matching(filter: SearchFilter) -> Self { Self::new(QueryCriteria::Matching(filter)) }

  /// Sets the field to order results by
  pub fn order_by(mut self, field: OrderField) -> Self {
    self.order_by = Some(field);
    self
  }

  /// Sets the order to descending (default is ascending)
  pub fn descending(mut self) -> Self {
    self.descending = true;
    self
  }

  /// Caps the number of returned rows
  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }

  /// Builds the SQL text and its positional parameters.
  fn build_sql(&self) -> (String, Vec<rusqlite::types::Value>) {
    use rusqlite::types::Value;

    let mut sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles");
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    match &self.criteria {
      QueryCriteria::All => {},
      QueryCriteria::Id(id) => {
        params.push(Value::Integer(*id));
        clauses.push(format!("id = ?{}", params.len()));
      },
      QueryCriteria::Matching(filter) => {
        if let Some(category) = filter.category() {
          params.push(Value::Text(category.to_string()));
          clauses.push(format!("category = ?{}", params.len()));
        }
        if let Some(text) = filter.text() {
          params.push(Value::Text(text.to_string()));
          let n = params.len();
          clauses.push(format!(
            "(instr(title, ?{n}) > 0 OR instr(abstract, ?{n}) > 0 OR instr(authors, ?{n}) > 0)"
          ));
        }
      },
    }

    if !clauses.is_empty() {
      sql.push_str(" WHERE ");
      sql.push_str(&clauses.join(" AND "));
    }

    if let Some(order_field) = &self.order_by {
      let direction = if self.descending { "DESC" } else { "ASC" };
      // Ties fall back to insertion order in the same direction.
      sql.push_str(&format!(" ORDER BY {} {direction}, id {direction}", order_field.as_sql_str()));
    }

    if let Some(limit) = self.limit {
      sql.push_str(&format!(" LIMIT {limit}"));
    }

    (sql, params)
  }
}

#[async_trait]
impl DatabaseInstruction for Query {
  type Output = Vec<Article>;

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let (sql, params) = self.build_sql();
    trace!(%sql, "Running article query");

    let articles = db
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&sql)?;
        let articles = stmt
          .query_map(params_from_iter(params), article_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(articles)
      })
      .await?;

    Ok(articles)
  }
}
