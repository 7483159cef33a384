//! Local SQLite storage for article records.
//!
//! The [`Database`] handle wraps an async `tokio-rusqlite` connection. All
//! reads and writes go through [`DatabaseInstruction`] values:
//!
//! - [`Add`] inserts a new article
//! - [`Query`] lists, filters and orders articles
//! - [`RecordView`] fetches one article and counts the view
//!
//! ```no_run
//! # use folio::database::*;
//! # use folio::prelude::*;
//! # async fn example() -> Result<(), FolioError> {
//! let db = Database::open("folio.db").await?;
//! let recent = Query::list_all().order_by(OrderField::UploadDate).descending().limit(10);
//! for article in recent.execute(&db).await? {
//!   println!("{}: {}", article.id, article.title);
//! }
//! # Ok(())
//! # }
//! ```

use rusqlite::params;
use tokio_rusqlite::Connection;

use super::*;

pub mod instruction;
#[cfg(test)] mod tests;

pub use self::instruction::*;

/// Columns selected for a full [`Article`], in the order [`article_from_row`]
/// reads them.
pub(crate) const ARTICLE_COLUMNS: &str =
  "id, title, authors, abstract, keywords, category, pdf_path, upload_date, views, citations";

/// Handle to the article database.
///
/// Cloning is cheap: clones share the same background connection.
#[derive(Clone)]
pub struct Database {
  /// Async SQLite connection handle
  conn: Connection,
}

impl Database {
  /// Opens an existing database or creates a new one at the specified path.
  ///
  /// Missing parent directories are created and the schema is applied; the
  /// schema statements are idempotent so reopening is safe.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent).await?;
    }

    let conn = Connection::open(path).await?;
    Self::migrate(conn).await
  }

  /// Opens a private in-memory database, mostly useful in tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory().await?;
    Self::migrate(conn).await
  }

  /// Applies the schema to a fresh connection.
  async fn migrate(conn: Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(include_str!(concat!(
          env!("CARGO_MANIFEST_DIR"),
          "/migrations/init.sql"
        )))?;
        Ok(())
      })
      .await?;
    Ok(Self { conn })
  }

  /// Returns the default path for the database file.
  ///
  /// - On Unix: `~/.local/share/folio/folio.db`
  /// - On macOS: `~/Library/Application Support/folio/folio.db`
  /// - On Windows: `%APPDATA%\folio\folio.db`
  /// - Fallback: `./folio/folio.db`
  pub fn default_path() -> PathBuf { Config::default_database_path() }
}

/// Reads an [`Article`] from a row selected with [`ARTICLE_COLUMNS`].
pub(crate) fn article_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Article> {
  let authors: Option<String> = row.get(2)?;
  let keywords: Option<String> = row.get(4)?;
  let upload_date: String = row.get(7)?;

  Ok(Article {
    id:            row.get(0)?,
    title:         row.get(1)?,
    authors:       decode_list(authors.as_deref()).map_err(|e| conversion_failure(2, e))?,
    abstract_text: row.get(3)?,
    keywords:      decode_list(keywords.as_deref()).map_err(|e| conversion_failure(4, e))?,
    category:      row.get(5)?,
    pdf_path:      row.get(6)?,
    upload_date:   DateTime::parse_from_rfc3339(&upload_date)
      .map(|dt| dt.with_timezone(&Utc))
      .map_err(|e| conversion_failure(7, e))?,
    views:         row.get(8)?,
    citations:     row.get(9)?,
  })
}

/// Wraps a decoding error for a text column.
fn conversion_failure(
  column: usize,
  error: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
  rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(error))
}
