use super::*;

#[traced_test]
#[tokio::test]
async fn test_upload_stores_blob_and_record() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;

  let article = folio.upload(create_test_submission("My Paper.pdf")).await?;

  assert!(article.id > 0);
  assert_eq!(article.views, 0);
  assert_eq!(article.citations, 0);
  assert_eq!(article.authors, vec!["Ada Smith", "Ben Jones"]);
  assert_eq!(article.keywords, vec!["manuscripts", "marginalia"]);

  // Stored as `YYYYMMDD_HHMMSS_<sanitized name>` inside the uploads root
  let name = article.pdf_filename();
  assert!(name.ends_with("_My_Paper.pdf"), "unexpected blob name {name}");
  assert_eq!(name.len(), "YYYYMMDD_HHMMSS_My_Paper.pdf".len());
  assert!(std::path::Path::new(&article.pdf_path).starts_with(&folio.config().uploads_path));
  assert_eq!(std::fs::read(&article.pdf_path)?, b"%PDF-1.4 test");

  let stored = Query::by_id(article.id).execute(folio.database()).await?;
  assert_eq!(stored, vec![article]);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_upload_rejects_non_pdf() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;

  let err = folio.upload(create_test_submission("notes.txt")).await.unwrap_err();
  assert!(matches!(err, FolioError::DisallowedExtension(_)));
  assert_eq!(err.to_string(), "Only PDF files are allowed");

  assert!(Query::list_all().execute(folio.database()).await?.is_empty());
  assert!(uploaded_files(&folio).is_empty());
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_upload_accepts_uppercase_extension() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;

  let article = folio.upload(create_test_submission("paper.PDF")).await?;
  assert!(article.pdf_filename().ends_with("_paper.PDF"));
  assert_eq!(uploaded_files(&folio).len(), 1);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_upload_missing_field_writes_nothing() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;
  let mut submission = create_test_submission("paper.pdf");
  submission.abstract_text = Some("  ".into());

  let err = folio.upload(submission).await.unwrap_err();
  assert!(matches!(err, FolioError::MissingField("abstract")));
  assert!(err.is_validation());
  assert!(uploaded_files(&folio).is_empty());
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_upload_list_fields_json_and_comma() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;

  let mut json = create_test_submission("a.pdf");
  json.authors = Some(r#"["Smith, Ada", " Jones, Ben "]"#.into());
  json.keywords = Some("[]".into());
  let json = folio.upload(json).await?;
  assert_eq!(json.authors, vec!["Smith, Ada", "Jones, Ben"]);
  assert!(json.keywords.is_empty());

  let mut comma = create_test_submission("b.pdf");
  comma.authors = Some("Smith, Ada".into());
  comma.keywords = None;
  let comma = folio.upload(comma).await?;
  assert_eq!(comma.authors, vec!["Smith", "Ada"]);
  assert!(comma.keywords.is_empty());
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_same_second_uploads_do_not_overwrite() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;

  let first = folio.upload(create_test_submission("paper.pdf")).await?;
  let second = folio.upload(create_test_submission("paper.pdf")).await?;

  assert_ne!(first.pdf_path, second.pdf_path);
  assert!(std::path::Path::new(&first.pdf_path).exists());
  assert!(std::path::Path::new(&second.pdf_path).exists());
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_long_filename_is_shortened_to_fit() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;
  let long_name = format!("{}.pdf", "a".repeat(250));

  let first = folio.upload(create_test_submission(&long_name)).await?;
  let second = folio.upload(create_test_submission(&long_name)).await?;

  for article in [&first, &second] {
    assert!(article.pdf_path.chars().count() <= MAX_PDF_PATH_LEN, "{}", article.pdf_path);
    assert!(article.pdf_filename().ends_with(".pdf"));
    assert_eq!(std::fs::read(&article.pdf_path)?, b"%PDF-1.4 test");
  }
  assert_ne!(first.pdf_path, second.pdf_path);
  assert_eq!(uploaded_files(&folio).len(), 2);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_failed_insert_removes_blob() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;

  // Break the store underneath the archive so the insert fails after the
  // blob was written.
  let conn = rusqlite::Connection::open(&folio.config().database_path)?;
  conn.execute_batch("DROP TABLE articles;")?;
  drop(conn);

  let result = folio.upload(create_test_submission("paper.pdf")).await;
  assert!(result.is_err());
  assert!(!result.unwrap_err().is_validation());
  assert!(uploaded_files(&folio).is_empty());
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_view_counts_each_fetch() -> TestResult<()> {
  let (folio, _dir) = create_test_folio().await;
  let article = folio.upload(create_test_submission("paper.pdf")).await?;

  folio.view(article.id).await?;
  let viewed = folio.view(article.id).await?;
  assert_eq!(viewed.views, article.views + 2);

  assert!(matches!(folio.view(999_999).await, Err(FolioError::NotFound)));
  let listed = folio.articles().await?;
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].views, 2);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_empty_extension_list_is_rejected() {
  let dir = tempdir().unwrap();
  let config = Config::default()
    .with_database_path(dir.path().join("folio.db"))
    .with_uploads_path(dir.path().join("uploads"))
    .with_allowed_extensions(Vec::<String>::new());

  let result = Folio::builder().with_config(config).build().await;
  assert!(matches!(result, Err(FolioError::Config(_))));
}
