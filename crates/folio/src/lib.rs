//! Publication archive library.
//!
//! `folio` manages a small archive of PDF articles, providing:
//!
//! - Article records with authors, abstract, keywords and category
//! - Local SQLite storage with listing, lookup and substring search
//! - PDF blob storage with timestamped, sanitized filenames
//! - Browsing of a curated `issue/article.pdf` directory tree
//!
//! # Getting Started
//!
//! ```no_run
//! use folio::{
//!   database::{Query, SearchFilter},
//!   upload::{Submission, UploadedFile},
//!   Config, Folio,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let folio = Folio::builder().with_config(Config::default()).build().await?;
//!
//!   let submission = Submission {
//!     file: Some(UploadedFile::new("paper.pdf", std::fs::read("paper.pdf")?)),
//!     title: Some("On Marginalia".into()),
//!     authors: Some("Ada Smith, Ben Jones".into()),
//!     abstract_text: Some("Notes in the margins.".into()),
//!     keywords: Some(r#"["margins", "notes"]"#.into()),
//!     category: Some("literature".into()),
//!   };
//!   let article = folio.upload(submission).await?;
//!   println!("Stored {} as #{}", article.title, article.id);
//!
//!   let hits = folio.search(SearchFilter::new().with_text("Smith")).await?;
//!   println!("{} matching articles", hits.len());
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`article`]: The article record and its list encoding
//! - [`database`]: Database handle and composable instructions
//! - [`storage`]: Blob storage rooted at a directory
//! - [`upload`]: Validation and storage of submitted articles
//! - [`publications`]: Issue/article browsing over a directory tree
//! - [`config`]: Process configuration
//! - [`prelude`]: Common traits and types for ergonomic imports

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod article;
pub mod config;
pub mod database;
pub mod error;
pub mod publications;
pub mod storage;
pub mod upload;

pub use crate::config::Config;
use crate::{
  article::*,
  database::*,
  error::*,
  publications::{DirectoryCatalog, IssueCatalog},
  storage::{BlobStore, FilesystemStore},
  upload::Submission,
};

/// Number of articles shown on the home feed.
pub const RECENT_LIMIT: usize = 10;

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use folio::{database::Query, prelude::*, Config, Folio};
///
/// async fn example() -> Result<(), FolioError> {
///   let folio = Folio::builder().with_config(Config::default()).build().await?;
///   let all = Query::list_all().execute(folio.database()).await?;
///   println!("{} articles", all.len());
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{
    database::DatabaseInstruction, error::FolioError, publications::IssueCatalog,
    storage::BlobStore,
  };
}

/// The assembled archive: configuration, metadata store, upload storage and
/// the curated issue catalog.
///
/// Constructed once at process start and shared (it is cheap to clone) with
/// every request handler.
#[derive(Clone)]
pub struct Folio {
  /// Configuration this instance was built from
  config:   Config,
  /// Metadata store
  database: Database,
  /// Storage for user submitted PDFs
  uploads:  Arc<dyn BlobStore>,
  /// Browsable issue tree
  catalog:  Arc<dyn IssueCatalog>,
}

/// Builder for [`Folio`].
#[derive(Default)]
pub struct FolioBuilder {
  /// Configuration to use, defaults to [`Config::default`]
  config:  Option<Config>,
  /// Custom catalog, defaults to a [`DirectoryCatalog`] over `issues_path`
  catalog: Option<Arc<dyn IssueCatalog>>,
}

impl FolioBuilder {
  /// Use the given configuration.
  pub fn with_config(mut self, config: Config) -> Self {
    self.config = Some(config);
    self
  }

  /// Replace the directory-backed issue catalog.
  pub fn with_catalog(mut self, catalog: Arc<dyn IssueCatalog>) -> Self {
    self.catalog = Some(catalog);
    self
  }

  /// Opens the database and storage roots described by the configuration.
  ///
  /// The database file and the uploads directory are created if missing. The
  /// issues directory is only read, and may be absent.
  pub async fn build(self) -> Result<Folio> {
    let config = self.config.unwrap_or_default();
    if config.allowed_extensions.is_empty() {
      return Err(FolioError::Config("at least one allowed extension is required".into()));
    }

    let database = Database::open(&config.database_path).await?;
    tokio::fs::create_dir_all(&config.uploads_path).await?;
    let uploads: Arc<dyn BlobStore> = Arc::new(FilesystemStore::new(&config.uploads_path));
    let catalog = self
      .catalog
      .unwrap_or_else(|| Arc::new(DirectoryCatalog::new(&config.issues_path)));

    info!(
      database = %config.database_path.display(),
      uploads = %config.uploads_path.display(),
      issues = %config.issues_path.display(),
      "Opened folio archive"
    );
    Ok(Folio { config, database, uploads, catalog })
  }
}

impl Folio {
  /// Starts building a [`Folio`].
  pub fn builder() -> FolioBuilder { FolioBuilder::default() }

  /// The configuration this archive was opened with.
  pub fn config(&self) -> &Config { &self.config }

  /// The metadata store.
  pub fn database(&self) -> &Database { &self.database }

  /// Storage holding uploaded PDFs.
  pub fn uploads(&self) -> &dyn BlobStore { self.uploads.as_ref() }

  /// The curated issue catalog.
  pub fn catalog(&self) -> &dyn IssueCatalog { self.catalog.as_ref() }

  /// The most recently uploaded articles, newest first.
  pub async fn recent(&self) -> Result<Vec<Article>> {
    Query::list_all()
      .order_by(OrderField::UploadDate)
      .descending()
      .limit(RECENT_LIMIT)
      .execute(&self.database)
      .await
  }

  /// Every article, newest first.
  pub async fn articles(&self) -> Result<Vec<Article>> {
    Query::list_all().order_by(OrderField::UploadDate).descending().execute(&self.database).await
  }

  /// Fetches a single article, counting the fetch as a view.
  ///
  /// Returns [`FolioError::NotFound`] without touching the store when the id
  /// is unknown.
  pub async fn view(&self, id: i64) -> Result<Article> {
    RecordView::new(id).execute(&self.database).await
  }

  /// Articles matching the filter, newest first.
  pub async fn search(&self, filter: SearchFilter) -> Result<Vec<Article>> {
    Query::matching(filter)
      .order_by(OrderField::UploadDate)
      .descending()
      .execute(&self.database)
      .await
  }

  /// Validates a submission, stores its PDF and records the article.
  ///
  /// Nothing is written when validation fails. When the record cannot be
  /// inserted after the PDF was stored, the PDF is removed again before the
  /// error is returned.
  pub async fn upload(&self, submission: Submission) -> Result<Article> {
    let upload = submission.validate(&self.config)?;
    let blob_name = upload.stored_name(Utc::now(), self.uploads.root())?;

    let stored = self.uploads.put(&blob_name, upload.content()).await?;
    debug!(path = %stored.display(), "Stored uploaded PDF");

    let new_article = upload.into_article(stored.to_string_lossy().into_owned());
    match Add::new(new_article).execute(&self.database).await {
      Ok(article) => {
        info!(id = article.id, title = %article.title, "Recorded uploaded article");
        Ok(article)
      },
      Err(e) => {
        warn!(error = %e, path = %stored.display(), "Insert failed, removing stored PDF");
        if let Some(name) = stored.file_name().and_then(|n| n.to_str()) {
          if let Err(cleanup) = self.uploads.remove(name).await {
            warn!(error = %cleanup, "Could not remove orphaned PDF");
          }
        }
        Err(e)
      },
    }
  }
}
