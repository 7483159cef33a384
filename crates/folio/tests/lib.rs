use std::{error::Error, sync::Arc};

use folio::{
  article::{Article, MAX_PDF_PATH_LEN},
  database::{Query, SearchFilter},
  error::FolioError,
  prelude::*,
  upload::{Submission, UploadedFile},
  Config, Folio,
};
use tempfile::{tempdir, TempDir};
use tracing_test::traced_test;

mod workflows;

pub type TestResult<T> = Result<T, Box<dyn Error>>;

/// Builds an archive whose database, uploads and issues all live in one
/// temporary directory.
pub async fn create_test_folio() -> (Folio, TempDir) {
  let dir = tempdir().unwrap();
  let config = Config::default()
    .with_database_path(dir.path().join("folio.db"))
    .with_uploads_path(dir.path().join("uploads"))
    .with_issues_path(dir.path().join("articles"));
  let folio = Folio::builder().with_config(config).build().await.unwrap();
  (folio, dir)
}

/// A complete submission for `filename`.
pub fn create_test_submission(filename: &str) -> Submission {
  Submission {
    file:          Some(UploadedFile::new(filename, b"%PDF-1.4 test".to_vec())),
    title:         Some("Marginalia in Carolingian Manuscripts".into()),
    authors:       Some("Ada Smith, Ben Jones".into()),
    abstract_text: Some("A survey of notes left in the margins.".into()),
    keywords:      Some("manuscripts, marginalia".into()),
    category:      Some("history".into()),
  }
}

/// Names of the files currently in the uploads directory.
pub fn uploaded_files(folio: &Folio) -> Vec<String> {
  match std::fs::read_dir(&folio.config().uploads_path) {
    Ok(entries) =>
      entries.filter_map(|e| e.ok()).map(|e| e.file_name().to_string_lossy().into_owned()).collect(),
    Err(_) => Vec::new(),
  }
}
